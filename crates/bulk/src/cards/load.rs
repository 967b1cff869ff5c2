//! Static and dynamic load cards

use crate::cards::{dof_field, expand_id_list, fail, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

/// A load card, keyed by set id in the model store
#[derive(Debug, Clone, PartialEq)]
pub enum Load {
    Force(Force),
    Moment(Moment),
    Pload(Pload),
    Pload2(Pload2),
    Pload4(Pload4),
    Grav(Grav),
    Combo(Combo),
    Rforce(Rforce),
    Temp(Temp),
    Tempd(Tempd),
    Rload1(Rload1),
    Rload2(Rload2),
    Tload1(Tload1),
    Tload2(Tload2),
    Darea(Darea),
    Dload(Dload),
}

/// FORCE: concentrated force at a node
#[derive(Debug, Clone, PartialEq)]
pub struct Force {
    pub sid: u32,
    pub node: u32,
    pub cid: Option<u32>,
    pub scale: f64,
    pub n: [f64; 3],
}

/// MOMENT: concentrated moment at a node
#[derive(Debug, Clone, PartialEq)]
pub struct Moment {
    pub sid: u32,
    pub node: u32,
    pub cid: Option<u32>,
    pub scale: f64,
    pub n: [f64; 3],
}

/// PLOAD: pressure on a three- or four-node face
#[derive(Debug, Clone, PartialEq)]
pub struct Pload {
    pub sid: u32,
    pub pressure: f64,
    pub nodes: Vec<u32>,
}

/// PLOAD2: pressure on shell elements
#[derive(Debug, Clone, PartialEq)]
pub struct Pload2 {
    pub sid: u32,
    pub pressure: f64,
    pub eids: Vec<u32>,
}

/// PLOAD4: pressure on element faces
#[derive(Debug, Clone, PartialEq)]
pub struct Pload4 {
    pub sid: u32,
    pub eid: u32,
    pub pressures: [Option<f64>; 4],
    pub g1: Option<u32>,
    pub g34: Option<u32>,
    pub cid: Option<u32>,
    pub n: Option<[f64; 3]>,
    pub rest: Vec<Field>,
}

/// GRAV: gravity or constant acceleration
#[derive(Debug, Clone, PartialEq)]
pub struct Grav {
    pub sid: u32,
    pub cid: Option<u32>,
    pub scale: f64,
    pub n: [f64; 3],
    pub mb: Option<i64>,
}

/// LOAD: scaled combination of other static load sets
#[derive(Debug, Clone, PartialEq)]
pub struct Combo {
    pub sid: u32,
    pub scale: f64,
    /// (scale, referenced load set id) pairs
    pub terms: Vec<(f64, u32)>,
}

/// RFORCE: rotational force about a node
#[derive(Debug, Clone, PartialEq)]
pub struct Rforce {
    pub sid: u32,
    pub node: u32,
    pub cid: Option<u32>,
    pub a: f64,
    pub r: [f64; 3],
    pub rest: Vec<Field>,
}

/// TEMP: nodal temperatures, up to three nodes per card
#[derive(Debug, Clone, PartialEq)]
pub struct Temp {
    pub sid: u32,
    pub pairs: Vec<(u32, f64)>,
}

/// TEMPD: default temperature for a set
#[derive(Debug, Clone, PartialEq)]
pub struct Tempd {
    pub sid: u32,
    pub temperature: f64,
}

/// RLOAD1: frequency response, tabular real/imaginary
#[derive(Debug, Clone, PartialEq)]
pub struct Rload1 {
    pub sid: u32,
    pub excite_id: u32,
    pub delay: Field,
    pub dphase: Field,
    pub tc: Option<u32>,
    pub td: Option<u32>,
    pub kind: Option<String>,
}

/// RLOAD2: frequency response, tabular magnitude/phase
#[derive(Debug, Clone, PartialEq)]
pub struct Rload2 {
    pub sid: u32,
    pub excite_id: u32,
    pub delay: Field,
    pub dphase: Field,
    pub tb: Option<u32>,
    pub tp: Option<u32>,
    pub kind: Option<String>,
}

/// TLOAD1: transient response, tabular
#[derive(Debug, Clone, PartialEq)]
pub struct Tload1 {
    pub sid: u32,
    pub excite_id: u32,
    pub delay: Field,
    pub kind: Option<String>,
    pub tid: Option<u32>,
    pub rest: Vec<Field>,
}

/// TLOAD2: transient response, analytic pulse
#[derive(Debug, Clone, PartialEq)]
pub struct Tload2 {
    pub sid: u32,
    pub excite_id: u32,
    pub delay: Field,
    pub kind: Option<String>,
    pub rest: Vec<Field>,
}

/// DAREA: scalar load distribution, up to two nodes per card
#[derive(Debug, Clone, PartialEq)]
pub struct Darea {
    pub sid: u32,
    pub entries: Vec<(u32, String, f64)>,
}

/// DLOAD: scaled combination of dynamic load sets
#[derive(Debug, Clone, PartialEq)]
pub struct Dload {
    pub sid: u32,
    pub scale: f64,
    pub terms: Vec<(f64, u32)>,
}

impl Load {
    pub fn sid(&self) -> u32 {
        match self {
            Load::Force(c) => c.sid,
            Load::Moment(c) => c.sid,
            Load::Pload(c) => c.sid,
            Load::Pload2(c) => c.sid,
            Load::Pload4(c) => c.sid,
            Load::Grav(c) => c.sid,
            Load::Combo(c) => c.sid,
            Load::Rforce(c) => c.sid,
            Load::Temp(c) => c.sid,
            Load::Tempd(c) => c.sid,
            Load::Rload1(c) => c.sid,
            Load::Rload2(c) => c.sid,
            Load::Tload1(c) => c.sid,
            Load::Tload2(c) => c.sid,
            Load::Darea(c) => c.sid,
            Load::Dload(c) => c.sid,
        }
    }

    pub fn set_sid(&mut self, sid: u32) {
        match self {
            Load::Force(c) => c.sid = sid,
            Load::Moment(c) => c.sid = sid,
            Load::Pload(c) => c.sid = sid,
            Load::Pload2(c) => c.sid = sid,
            Load::Pload4(c) => c.sid = sid,
            Load::Grav(c) => c.sid = sid,
            Load::Combo(c) => c.sid = sid,
            Load::Rforce(c) => c.sid = sid,
            Load::Temp(c) => c.sid = sid,
            Load::Tempd(c) => c.sid = sid,
            Load::Rload1(c) => c.sid = sid,
            Load::Rload2(c) => c.sid = sid,
            Load::Tload1(c) => c.sid = sid,
            Load::Tload2(c) => c.sid = sid,
            Load::Darea(c) => c.sid = sid,
            Load::Dload(c) => c.sid = sid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Load::Force(_) => "FORCE",
            Load::Moment(_) => "MOMENT",
            Load::Pload(_) => "PLOAD",
            Load::Pload2(_) => "PLOAD2",
            Load::Pload4(_) => "PLOAD4",
            Load::Grav(_) => "GRAV",
            Load::Combo(_) => "LOAD",
            Load::Rforce(_) => "RFORCE",
            Load::Temp(_) => "TEMP",
            Load::Tempd(_) => "TEMPD",
            Load::Rload1(_) => "RLOAD1",
            Load::Rload2(_) => "RLOAD2",
            Load::Tload1(_) => "TLOAD1",
            Load::Tload2(_) => "TLOAD2",
            Load::Darea(_) => "DAREA",
            Load::Dload(_) => "DLOAD",
        }
    }

    /// Node ids the load acts on directly
    pub fn nodes(&self) -> Vec<u32> {
        match self {
            Load::Force(c) => vec![c.node],
            Load::Moment(c) => vec![c.node],
            Load::Pload(c) => c.nodes.clone(),
            Load::Rforce(c) => vec![c.node],
            Load::Temp(c) => c.pairs.iter().map(|&(n, _)| n).collect(),
            Load::Darea(c) => c.entries.iter().map(|e| e.0).collect(),
            _ => Vec::new(),
        }
    }

    /// Element ids the load acts on directly
    pub fn eids(&self) -> Vec<u32> {
        match self {
            Load::Pload2(c) => c.eids.clone(),
            Load::Pload4(c) => vec![c.eid],
            _ => Vec::new(),
        }
    }

    /// A TEMPD card defines several sets; the parser expands each
    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Vec<Self>> {
        let single = match name {
            "FORCE" => Load::Force(Force {
                sid: fields.uint(0)?,
                node: fields.uint(1)?,
                cid: fields.uint_opt(2)?,
                scale: fields.real(3)?,
                n: [fields.real(4)?, fields.real(5)?, fields.real(6)?],
            }),
            "MOMENT" => Load::Moment(Moment {
                sid: fields.uint(0)?,
                node: fields.uint(1)?,
                cid: fields.uint_opt(2)?,
                scale: fields.real(3)?,
                n: [fields.real(4)?, fields.real(5)?, fields.real(6)?],
            }),
            "PLOAD" => Load::Pload(Pload {
                sid: fields.uint(0)?,
                pressure: fields.real(1)?,
                nodes: fields.id_list(2)?,
            }),
            "PLOAD2" => Load::Pload2(Pload2 {
                sid: fields.uint(0)?,
                pressure: fields.real(1)?,
                eids: expand_id_list(fields, 2)?,
            }),
            "PLOAD4" => {
                let n = match fields.real_opt(9)? {
                    Some(n1) => Some([n1, fields.real(10)?, fields.real(11)?]),
                    None => None,
                };
                Load::Pload4(Pload4 {
                    sid: fields.uint(0)?,
                    eid: fields.uint(1)?,
                    pressures: [
                        fields.real_opt(2)?,
                        fields.real_opt(3)?,
                        fields.real_opt(4)?,
                        fields.real_opt(5)?,
                    ],
                    g1: fields.uint_opt(6)?,
                    g34: fields.uint_opt(7)?,
                    cid: fields.uint_opt(8)?,
                    n,
                    rest: fields.rest(12),
                })
            }
            "GRAV" => Load::Grav(Grav {
                sid: fields.uint(0)?,
                cid: fields.uint_opt(1)?,
                scale: fields.real(2)?,
                n: [fields.real(3)?, fields.real(4)?, fields.real(5)?],
                mb: fields.int_opt(6)?,
            }),
            "LOAD" => Load::Combo(Combo {
                sid: fields.uint(0)?,
                scale: fields.real_or(1, 1.0)?,
                terms: parse_scale_pairs(fields, 2)?,
            }),
            "RFORCE" => Load::Rforce(Rforce {
                sid: fields.uint(0)?,
                node: fields.uint_opt(1)?.unwrap_or(0),
                cid: fields.uint_opt(2)?,
                a: fields.real(3)?,
                r: [fields.real(4)?, fields.real(5)?, fields.real(6)?],
                rest: fields.rest(7),
            }),
            "TEMP" => {
                let mut pairs = Vec::new();
                let mut index = 1;
                while index < fields.len() && !fields.get(index).is_blank() {
                    pairs.push((fields.uint(index)?, fields.real(index + 1)?));
                    index += 2;
                }
                Load::Temp(Temp {
                    sid: fields.uint(0)?,
                    pairs,
                })
            }
            "TEMPD" => {
                // One card can default several sets: SID1 T1 SID2 T2 ...
                let mut cards = Vec::new();
                let mut index = 0;
                while index < fields.len() && !fields.get(index).is_blank() {
                    cards.push(Load::Tempd(Tempd {
                        sid: fields.uint(index)?,
                        temperature: fields.real(index + 1)?,
                    }));
                    index += 2;
                }
                return Ok(cards);
            }
            "RLOAD1" => Load::Rload1(Rload1 {
                sid: fields.uint(0)?,
                excite_id: fields.uint(1)?,
                delay: fields.get(2).clone(),
                dphase: fields.get(3).clone(),
                tc: fields.uint_opt(4)?,
                td: fields.uint_opt(5)?,
                kind: fields.string(6),
            }),
            "RLOAD2" => Load::Rload2(Rload2 {
                sid: fields.uint(0)?,
                excite_id: fields.uint(1)?,
                delay: fields.get(2).clone(),
                dphase: fields.get(3).clone(),
                tb: fields.uint_opt(4)?,
                tp: fields.uint_opt(5)?,
                kind: fields.string(6),
            }),
            "TLOAD1" => Load::Tload1(Tload1 {
                sid: fields.uint(0)?,
                excite_id: fields.uint(1)?,
                delay: fields.get(2).clone(),
                kind: fields.string(3),
                tid: fields.uint_opt(4)?,
                rest: fields.rest(5),
            }),
            "TLOAD2" => Load::Tload2(Tload2 {
                sid: fields.uint(0)?,
                excite_id: fields.uint(1)?,
                delay: fields.get(2).clone(),
                kind: fields.string(3),
                rest: fields.rest(4),
            }),
            "DAREA" => {
                let mut entries = vec![(
                    fields.uint(1)?,
                    fields.dof(2)?,
                    fields.real(3)?,
                )];
                if !fields.get(4).is_blank() {
                    entries.push((fields.uint(4)?, fields.dof(5)?, fields.real(6)?));
                }
                Load::Darea(Darea {
                    sid: fields.uint(0)?,
                    entries,
                })
            }
            "DLOAD" => Load::Dload(Dload {
                sid: fields.uint(0)?,
                scale: fields.real_or(1, 1.0)?,
                terms: parse_scale_pairs(fields, 2)?,
            }),
            _ => return Err(fail(fields, 0, "load card")),
        };
        Ok(vec![single])
    }

    pub fn write(&self) -> String {
        match self {
            Load::Force(c) => write_card(
                "FORCE",
                vec![
                    c.sid.into(),
                    c.node.into(),
                    c.cid.into(),
                    c.scale.into(),
                    c.n[0].into(),
                    c.n[1].into(),
                    c.n[2].into(),
                ],
            ),
            Load::Moment(c) => write_card(
                "MOMENT",
                vec![
                    c.sid.into(),
                    c.node.into(),
                    c.cid.into(),
                    c.scale.into(),
                    c.n[0].into(),
                    c.n[1].into(),
                    c.n[2].into(),
                ],
            ),
            Load::Pload(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into(), c.pressure.into()];
                fields.extend(c.nodes.iter().map(|&n| Field::from(n)));
                write_card("PLOAD", fields)
            }
            Load::Pload2(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into(), c.pressure.into()];
                fields.extend(c.eids.iter().map(|&e| Field::from(e)));
                write_card("PLOAD2", fields)
            }
            Load::Pload4(c) => {
                let mut fields: Vec<Field> = vec![
                    c.sid.into(),
                    c.eid.into(),
                    c.pressures[0].into(),
                    c.pressures[1].into(),
                    c.pressures[2].into(),
                    c.pressures[3].into(),
                    c.g1.into(),
                    c.g34.into(),
                ];
                if c.cid.is_some() || c.n.is_some() || !c.rest.is_empty() {
                    fields.push(c.cid.into());
                    match &c.n {
                        Some(n) => {
                            fields.push(n[0].into());
                            fields.push(n[1].into());
                            fields.push(n[2].into());
                        }
                        None => fields.extend([Field::Blank, Field::Blank, Field::Blank]),
                    }
                    fields.extend(c.rest.clone());
                }
                write_card("PLOAD4", fields)
            }
            Load::Grav(c) => write_card(
                "GRAV",
                vec![
                    c.sid.into(),
                    c.cid.into(),
                    c.scale.into(),
                    c.n[0].into(),
                    c.n[1].into(),
                    c.n[2].into(),
                    c.mb.into(),
                ],
            ),
            Load::Combo(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into(), c.scale.into()];
                for (scale, set) in &c.terms {
                    fields.push((*scale).into());
                    fields.push((*set).into());
                }
                write_card("LOAD", fields)
            }
            Load::Rforce(c) => {
                let mut fields = vec![
                    c.sid.into(),
                    c.node.into(),
                    c.cid.into(),
                    c.a.into(),
                    c.r[0].into(),
                    c.r[1].into(),
                    c.r[2].into(),
                ];
                fields.extend(c.rest.clone());
                write_card("RFORCE", fields)
            }
            Load::Temp(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into()];
                for (node, temperature) in &c.pairs {
                    fields.push((*node).into());
                    fields.push((*temperature).into());
                }
                write_card("TEMP", fields)
            }
            Load::Tempd(c) => {
                write_card("TEMPD", vec![c.sid.into(), c.temperature.into()])
            }
            Load::Rload1(c) => write_card(
                "RLOAD1",
                vec![
                    c.sid.into(),
                    c.excite_id.into(),
                    c.delay.clone(),
                    c.dphase.clone(),
                    c.tc.into(),
                    c.td.into(),
                    c.kind.as_deref().into(),
                ],
            ),
            Load::Rload2(c) => write_card(
                "RLOAD2",
                vec![
                    c.sid.into(),
                    c.excite_id.into(),
                    c.delay.clone(),
                    c.dphase.clone(),
                    c.tb.into(),
                    c.tp.into(),
                    c.kind.as_deref().into(),
                ],
            ),
            Load::Tload1(c) => {
                let mut fields = vec![
                    c.sid.into(),
                    c.excite_id.into(),
                    c.delay.clone(),
                    c.kind.as_deref().into(),
                    c.tid.into(),
                ];
                fields.extend(c.rest.clone());
                write_card("TLOAD1", fields)
            }
            Load::Tload2(c) => {
                let mut fields = vec![
                    c.sid.into(),
                    c.excite_id.into(),
                    c.delay.clone(),
                    c.kind.as_deref().into(),
                ];
                fields.extend(c.rest.clone());
                write_card("TLOAD2", fields)
            }
            Load::Darea(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into()];
                for (node, component, scale) in &c.entries {
                    fields.push((*node).into());
                    fields.push(dof_field(component));
                    fields.push((*scale).into());
                }
                write_card("DAREA", fields)
            }
            Load::Dload(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into(), c.scale.into()];
                for (scale, set) in &c.terms {
                    fields.push((*scale).into());
                    fields.push((*set).into());
                }
                write_card("DLOAD", fields)
            }
        }
    }
}

/// (scale, set id) pairs of the LOAD/DLOAD combination cards
fn parse_scale_pairs(fields: &Fields, start: usize) -> Result<Vec<(f64, u32)>> {
    let mut terms = Vec::new();
    let mut index = start;
    while index < fields.len() {
        if fields.get(index).is_blank() && fields.get(index + 1).is_blank() {
            index += 2;
            continue;
        }
        terms.push((fields.real(index)?, fields.uint(index + 1)?));
        index += 2;
    }
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    #[test]
    fn force_roundtrip() {
        let fields =
            lex_card(&[(1, "FORCE         20       3       0    100.      0.      0.     -1.")]).unwrap();
        let loads = Load::parse("FORCE", &fields).unwrap();
        let Load::Force(ref force) = loads[0] else {
            panic!()
        };
        assert_eq!(force.node, 3);
        assert_eq!(force.scale, 100.0);
        assert_eq!(force.n, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn load_combo_terms() {
        let fields = lex_card(&[(1, "LOAD         100     1.0     1.0      20     2.0      30")]).unwrap();
        let loads = Load::parse("LOAD", &fields).unwrap();
        let Load::Combo(ref combo) = loads[0] else {
            panic!()
        };
        assert_eq!(combo.terms, vec![(1.0, 20), (2.0, 30)]);
    }

    #[test]
    fn tempd_expands() {
        let fields = lex_card(&[(1, "TEMPD        300    20.0     301    25.0")]).unwrap();
        let loads = Load::parse("TEMPD", &fields).unwrap();
        assert_eq!(loads.len(), 2);
        assert_eq!(loads[1].sid(), 301);
    }
}
