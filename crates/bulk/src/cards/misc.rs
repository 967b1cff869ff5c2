//! Sets, eigensolution methods, tables, and parameters

use crate::cards::{expand_id_list, fail, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

/// A generic id set; what the ids mean is up to the consumer
#[derive(Debug, Clone, PartialEq)]
pub enum Set {
    Set1(Set1),
    Set3(Set3),
}

/// SET1: plain id list
#[derive(Debug, Clone, PartialEq)]
pub struct Set1 {
    pub sid: u32,
    pub ids: Vec<u32>,
}

/// SET3: id list with a declared description (GRID/ELEM/POINT/PROP)
#[derive(Debug, Clone, PartialEq)]
pub struct Set3 {
    pub sid: u32,
    pub desc: String,
    pub ids: Vec<u32>,
}

impl Set {
    pub fn sid(&self) -> u32 {
        match self {
            Set::Set1(s) => s.sid,
            Set::Set3(s) => s.sid,
        }
    }

    pub fn set_sid(&mut self, sid: u32) {
        match self {
            Set::Set1(s) => s.sid = sid,
            Set::Set3(s) => s.sid = sid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Set::Set1(_) => "SET1",
            Set::Set3(_) => "SET3",
        }
    }

    pub fn ids(&self) -> &[u32] {
        match self {
            Set::Set1(s) => &s.ids,
            Set::Set3(s) => &s.ids,
        }
    }

    pub fn ids_mut(&mut self) -> &mut Vec<u32> {
        match self {
            Set::Set1(s) => &mut s.ids,
            Set::Set3(s) => &mut s.ids,
        }
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        match name {
            "SET1" => Ok(Set::Set1(Set1 {
                sid: fields.uint(0)?,
                ids: expand_id_list(fields, 1)?,
            })),
            "SET3" => Ok(Set::Set3(Set3 {
                sid: fields.uint(0)?,
                desc: fields.string_or(1, "GRID"),
                ids: expand_id_list(fields, 2)?,
            })),
            _ => Err(fail(fields, 0, "set card")),
        }
    }

    pub fn write(&self) -> String {
        match self {
            Set::Set1(s) => {
                let mut fields: Vec<Field> = vec![s.sid.into()];
                fields.extend(s.ids.iter().map(|&v| Field::from(v)));
                write_card("SET1", fields)
            }
            Set::Set3(s) => {
                let mut fields: Vec<Field> = vec![s.sid.into(), s.desc.as_str().into()];
                fields.extend(s.ids.iter().map(|&v| Field::from(v)));
                write_card("SET3", fields)
            }
        }
    }
}

/// An eigensolution method card
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    Eigrl(Eigrl),
    Eigr(Eigr),
}

/// EIGRL: Lanczos extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Eigrl {
    pub sid: u32,
    pub v1: Option<f64>,
    pub v2: Option<f64>,
    pub nd: Option<u32>,
    pub msglvl: Option<u32>,
    pub maxset: Option<u32>,
    pub shfscl: Option<f64>,
    pub norm: Option<String>,
}

/// EIGR: other extraction methods
#[derive(Debug, Clone, PartialEq)]
pub struct Eigr {
    pub sid: u32,
    pub method: String,
    pub f1: Option<f64>,
    pub f2: Option<f64>,
    pub ne: Option<u32>,
    pub nd: Option<u32>,
    pub rest: Vec<Field>,
}

impl Method {
    pub fn sid(&self) -> u32 {
        match self {
            Method::Eigrl(m) => m.sid,
            Method::Eigr(m) => m.sid,
        }
    }

    pub fn set_sid(&mut self, sid: u32) {
        match self {
            Method::Eigrl(m) => m.sid = sid,
            Method::Eigr(m) => m.sid = sid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::Eigrl(_) => "EIGRL",
            Method::Eigr(_) => "EIGR",
        }
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        match name {
            "EIGRL" => Ok(Method::Eigrl(Eigrl {
                sid: fields.uint(0)?,
                v1: fields.real_opt(1)?,
                v2: fields.real_opt(2)?,
                nd: fields.uint_opt(3)?,
                msglvl: fields.uint_opt(4)?,
                maxset: fields.uint_opt(5)?,
                shfscl: fields.real_opt(6)?,
                norm: fields.string(7),
            })),
            "EIGR" => Ok(Method::Eigr(Eigr {
                sid: fields.uint(0)?,
                method: fields.string_or(1, "LAN"),
                f1: fields.real_opt(2)?,
                f2: fields.real_opt(3)?,
                ne: fields.uint_opt(4)?,
                nd: fields.uint_opt(5)?,
                rest: fields.rest(6),
            })),
            _ => Err(fail(fields, 0, "method card")),
        }
    }

    pub fn write(&self) -> String {
        match self {
            Method::Eigrl(m) => write_card(
                "EIGRL",
                vec![
                    m.sid.into(),
                    m.v1.into(),
                    m.v2.into(),
                    m.nd.into(),
                    m.msglvl.into(),
                    m.maxset.into(),
                    m.shfscl.into(),
                    m.norm.as_deref().into(),
                ],
            ),
            Method::Eigr(m) => {
                let mut fields = vec![
                    m.sid.into(),
                    m.method.as_str().into(),
                    m.f1.into(),
                    m.f2.into(),
                    m.ne.into(),
                    m.nd.into(),
                ];
                fields.extend(m.rest.clone());
                write_card("EIGR", fields)
            }
        }
    }
}

/// A lookup table card
#[derive(Debug, Clone, PartialEq)]
pub enum TableCard {
    Tabled1(Tabled1),
    Tablem1(Tablem1),
}

/// TABLED1: x-y table for dynamic loads
#[derive(Debug, Clone, PartialEq)]
pub struct Tabled1 {
    pub tid: u32,
    pub xaxis: Option<String>,
    pub yaxis: Option<String>,
    pub points: Vec<(f64, f64)>,
}

/// TABLEM1: x-y table for material dependence
#[derive(Debug, Clone, PartialEq)]
pub struct Tablem1 {
    pub tid: u32,
    pub points: Vec<(f64, f64)>,
}

impl TableCard {
    pub fn tid(&self) -> u32 {
        match self {
            TableCard::Tabled1(t) => t.tid,
            TableCard::Tablem1(t) => t.tid,
        }
    }

    pub fn set_tid(&mut self, tid: u32) {
        match self {
            TableCard::Tabled1(t) => t.tid = tid,
            TableCard::Tablem1(t) => t.tid = tid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableCard::Tabled1(_) => "TABLED1",
            TableCard::Tablem1(_) => "TABLEM1",
        }
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        match name {
            "TABLED1" => Ok(TableCard::Tabled1(Tabled1 {
                tid: fields.uint(0)?,
                xaxis: fields.string(1),
                yaxis: fields.string(2),
                points: parse_xy_pairs(fields, 8)?,
            })),
            "TABLEM1" => Ok(TableCard::Tablem1(Tablem1 {
                tid: fields.uint(0)?,
                points: parse_xy_pairs(fields, 8)?,
            })),
            _ => Err(fail(fields, 0, "table card")),
        }
    }

    pub fn write(&self) -> String {
        match self {
            TableCard::Tabled1(t) => {
                let mut fields: Vec<Field> = vec![
                    t.tid.into(),
                    t.xaxis.as_deref().into(),
                    t.yaxis.as_deref().into(),
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                ];
                push_xy_pairs(&mut fields, &t.points);
                write_card("TABLED1", fields)
            }
            TableCard::Tablem1(t) => {
                let mut fields: Vec<Field> = vec![
                    t.tid.into(),
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                ];
                push_xy_pairs(&mut fields, &t.points);
                write_card("TABLEM1", fields)
            }
        }
    }
}

/// x-y values from the table body, terminated by ENDT
fn parse_xy_pairs(fields: &Fields, start: usize) -> Result<Vec<(f64, f64)>> {
    let mut points = Vec::new();
    let mut index = start;
    while index < fields.len() {
        match fields.get(index) {
            Field::Blank => index += 1,
            Field::Str(text) if text == "ENDT" => break,
            _ => {
                points.push((fields.real(index)?, fields.real(index + 1)?));
                index += 2;
            }
        }
    }
    Ok(points)
}

fn push_xy_pairs(fields: &mut Vec<Field>, points: &[(f64, f64)]) {
    for &(x, y) in points {
        fields.push(x.into());
        fields.push(y.into());
    }
    fields.push("ENDT".into());
}

/// PARAM: solver parameter, keyed by name
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub key: String,
    pub values: Vec<Field>,
}

impl Param {
    pub(crate) fn parse(fields: &Fields) -> Result<Self> {
        let key = fields
            .string(0)
            .ok_or_else(|| fail(fields, 0, "parameter name"))?;
        Ok(Self {
            key,
            values: fields.rest(1),
        })
    }

    /// First value as a real, for parameters like WTMASS
    pub fn real(&self) -> Option<f64> {
        self.values.first().and_then(Field::as_real)
    }

    pub fn write(&self) -> String {
        let mut fields: Vec<Field> = vec![self.key.as_str().into()];
        fields.extend(self.values.clone());
        write_card("PARAM", fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    #[test]
    fn tabled1_endt() {
        let fields = lex_card(&[
            (1, "TABLED1      200"),
            (2, "              0.     1.0    10.0     2.5    ENDT"),
        ])
        .unwrap();
        let table = TableCard::parse("TABLED1", &fields).unwrap();
        let TableCard::Tabled1(ref t) = table else {
            panic!()
        };
        assert_eq!(t.points, vec![(0.0, 1.0), (10.0, 2.5)]);

        let text = table.write();
        let lines: Vec<(usize, &str)> =
            text.lines().enumerate().map(|(n, l)| (n + 1, l)).collect();
        let reparsed = TableCard::parse("TABLED1", &lex_card(&lines).unwrap()).unwrap();
        assert_eq!(table, reparsed);
    }

    #[test]
    fn param_wtmass() {
        let fields = lex_card(&[(1, "PARAM   WTMASS  0.00259")]).unwrap();
        let param = Param::parse(&fields).unwrap();
        assert_eq!(param.key, "WTMASS");
        assert_eq!(param.real(), Some(0.00259));
    }
}
