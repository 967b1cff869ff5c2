//! Mass element cards

use crate::cards::{dof_field, fail, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

/// A mass element
#[derive(Debug, Clone, PartialEq)]
pub enum MassElement {
    Conm1(Conm1),
    Conm2(Conm2),
    Cmass1(Cmass1),
    Cmass2(Cmass2),
    Cmass3(Cmass3),
    Cmass4(Cmass4),
}

/// CONM1: general 6x6 mass matrix at a grid (upper triangle, 21 terms)
#[derive(Debug, Clone, PartialEq)]
pub struct Conm1 {
    pub eid: u32,
    pub nid: u32,
    pub cid: Option<u32>,
    pub m: Vec<f64>,
}

/// CONM2: concentrated mass with offset and inertia
#[derive(Debug, Clone, PartialEq)]
pub struct Conm2 {
    pub eid: u32,
    pub nid: u32,
    /// -1 selects the basic frame about the grid itself
    pub cid: Option<i64>,
    pub mass: f64,
    pub offset: [f64; 3],
    /// I11, I21, I22, I31, I32, I33
    pub inertia: [f64; 6],
}

/// CMASS1: scalar mass referencing a PMASS property
#[derive(Debug, Clone, PartialEq)]
pub struct Cmass1 {
    pub eid: u32,
    pub pid: u32,
    pub g1: u32,
    pub c1: String,
    pub g2: Option<u32>,
    pub c2: String,
}

/// CMASS2: scalar mass with the value on the card
#[derive(Debug, Clone, PartialEq)]
pub struct Cmass2 {
    pub eid: u32,
    pub mass: f64,
    pub g1: u32,
    pub c1: String,
    pub g2: Option<u32>,
    pub c2: String,
}

/// CMASS3: scalar mass between scalar points, property-backed
#[derive(Debug, Clone, PartialEq)]
pub struct Cmass3 {
    pub eid: u32,
    pub pid: u32,
    pub s1: u32,
    pub s2: Option<u32>,
}

/// CMASS4: scalar mass between scalar points, value on card
#[derive(Debug, Clone, PartialEq)]
pub struct Cmass4 {
    pub eid: u32,
    pub mass: f64,
    pub s1: u32,
    pub s2: Option<u32>,
}

impl MassElement {
    pub fn eid(&self) -> u32 {
        match self {
            MassElement::Conm1(e) => e.eid,
            MassElement::Conm2(e) => e.eid,
            MassElement::Cmass1(e) => e.eid,
            MassElement::Cmass2(e) => e.eid,
            MassElement::Cmass3(e) => e.eid,
            MassElement::Cmass4(e) => e.eid,
        }
    }

    pub fn set_eid(&mut self, eid: u32) {
        match self {
            MassElement::Conm1(e) => e.eid = eid,
            MassElement::Conm2(e) => e.eid = eid,
            MassElement::Cmass1(e) => e.eid = eid,
            MassElement::Cmass2(e) => e.eid = eid,
            MassElement::Cmass3(e) => e.eid = eid,
            MassElement::Cmass4(e) => e.eid = eid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MassElement::Conm1(_) => "CONM1",
            MassElement::Conm2(_) => "CONM2",
            MassElement::Cmass1(_) => "CMASS1",
            MassElement::Cmass2(_) => "CMASS2",
            MassElement::Cmass3(_) => "CMASS3",
            MassElement::Cmass4(_) => "CMASS4",
        }
    }

    /// Attached node ids (grid or scalar points)
    pub fn nodes(&self) -> Vec<u32> {
        let all: Vec<u32> = match self {
            MassElement::Conm1(e) => vec![e.nid],
            MassElement::Conm2(e) => vec![e.nid],
            MassElement::Cmass1(e) => {
                let mut nodes = vec![e.g1];
                nodes.extend(e.g2);
                nodes
            }
            MassElement::Cmass2(e) => {
                let mut nodes = vec![e.g1];
                nodes.extend(e.g2);
                nodes
            }
            MassElement::Cmass3(e) => {
                let mut nodes = vec![e.s1];
                nodes.extend(e.s2);
                nodes
            }
            MassElement::Cmass4(e) => {
                let mut nodes = vec![e.s1];
                nodes.extend(e.s2);
                nodes
            }
        };
        all.into_iter().filter(|&n| n > 0).collect()
    }

    /// Scalar mass value, for the kinds that carry one on the card
    pub fn mass(&self) -> Option<f64> {
        match self {
            MassElement::Conm2(e) => Some(e.mass),
            MassElement::Cmass2(e) => Some(e.mass),
            MassElement::Cmass4(e) => Some(e.mass),
            _ => None,
        }
    }

    /// Scale the mass content in place: scalar mass, inertia tensor, and
    /// the full CONM1 matrix
    pub fn scale_mass(&mut self, factor: f64) {
        match self {
            MassElement::Conm2(e) => {
                e.mass *= factor;
                for term in &mut e.inertia {
                    *term *= factor;
                }
            }
            MassElement::Conm1(e) => {
                for term in &mut e.m {
                    *term *= factor;
                }
            }
            MassElement::Cmass2(e) => e.mass *= factor,
            MassElement::Cmass4(e) => e.mass *= factor,
            // Property-backed scalar masses hold no value on the card
            MassElement::Cmass1(_) | MassElement::Cmass3(_) => {}
        }
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        let element = match name {
            "CONM1" => {
                let mut m = Vec::with_capacity(21);
                for n in 0..21 {
                    m.push(fields.real(3 + n)?);
                }
                MassElement::Conm1(Conm1 {
                    eid: fields.uint(0)?,
                    nid: fields.uint(1)?,
                    cid: fields.uint_opt(2)?,
                    m,
                })
            }
            "CONM2" => MassElement::Conm2(Conm2 {
                eid: fields.uint(0)?,
                nid: fields.uint(1)?,
                cid: fields.int_opt(2)?,
                mass: fields.real(3)?,
                offset: [fields.real(4)?, fields.real(5)?, fields.real(6)?],
                inertia: [
                    fields.real(8)?,
                    fields.real(9)?,
                    fields.real(10)?,
                    fields.real(11)?,
                    fields.real(12)?,
                    fields.real(13)?,
                ],
            }),
            "CMASS1" => MassElement::Cmass1(Cmass1 {
                eid: fields.uint(0)?,
                pid: fields.uint(1)?,
                g1: fields.uint(2)?,
                c1: fields.dof(3)?,
                g2: fields.uint_opt(4)?,
                c2: fields.dof(5)?,
            }),
            "CMASS2" => MassElement::Cmass2(Cmass2 {
                eid: fields.uint(0)?,
                mass: fields.real(1)?,
                g1: fields.uint(2)?,
                c1: fields.dof(3)?,
                g2: fields.uint_opt(4)?,
                c2: fields.dof(5)?,
            }),
            "CMASS3" => MassElement::Cmass3(Cmass3 {
                eid: fields.uint(0)?,
                pid: fields.uint(1)?,
                s1: fields.uint(2)?,
                s2: fields.uint_opt(3)?,
            }),
            "CMASS4" => MassElement::Cmass4(Cmass4 {
                eid: fields.uint(0)?,
                mass: fields.real(1)?,
                s1: fields.uint(2)?,
                s2: fields.uint_opt(3)?,
            }),
            _ => return Err(fail(fields, 0, "mass element card")),
        };
        Ok(element)
    }

    pub fn write(&self) -> String {
        match self {
            MassElement::Conm1(e) => {
                let mut fields: Vec<Field> =
                    vec![e.eid.into(), e.nid.into(), e.cid.into()];
                fields.extend(e.m.iter().map(|&v| Field::from(v)));
                write_card("CONM1", fields)
            }
            MassElement::Conm2(e) => write_card(
                "CONM2",
                vec![
                    e.eid.into(),
                    e.nid.into(),
                    e.cid.into(),
                    e.mass.into(),
                    e.offset[0].into(),
                    e.offset[1].into(),
                    e.offset[2].into(),
                    Field::Blank,
                    e.inertia[0].into(),
                    e.inertia[1].into(),
                    e.inertia[2].into(),
                    e.inertia[3].into(),
                    e.inertia[4].into(),
                    e.inertia[5].into(),
                ],
            ),
            MassElement::Cmass1(e) => write_card(
                "CMASS1",
                vec![
                    e.eid.into(),
                    e.pid.into(),
                    e.g1.into(),
                    dof_field(&e.c1),
                    e.g2.into(),
                    dof_field(&e.c2),
                ],
            ),
            MassElement::Cmass2(e) => write_card(
                "CMASS2",
                vec![
                    e.eid.into(),
                    e.mass.into(),
                    e.g1.into(),
                    dof_field(&e.c1),
                    e.g2.into(),
                    dof_field(&e.c2),
                ],
            ),
            MassElement::Cmass3(e) => write_card(
                "CMASS3",
                vec![e.eid.into(), e.pid.into(), e.s1.into(), e.s2.into()],
            ),
            MassElement::Cmass4(e) => write_card(
                "CMASS4",
                vec![e.eid.into(), e.mass.into(), e.s1.into(), e.s2.into()],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    #[test]
    fn conm2_roundtrip() {
        let fields = lex_card(&[
            (1, "CONM2,500,10,,10."),
            (2, ",0.1,,0.1,,,0.1"),
        ])
        .unwrap();
        let element = MassElement::parse("CONM2", &fields).unwrap();
        let MassElement::Conm2(ref conm2) = element else {
            panic!()
        };
        assert_eq!(conm2.mass, 10.0);
        assert_eq!(conm2.inertia, [0.1, 0.0, 0.1, 0.0, 0.0, 0.1]);

        let text = element.write();
        let lines: Vec<(usize, &str)> =
            text.lines().enumerate().map(|(n, l)| (n + 1, l)).collect();
        let reparsed = MassElement::parse("CONM2", &lex_card(&lines).unwrap()).unwrap();
        assert_eq!(element, reparsed);
    }

    #[test]
    fn conm2_scaling() {
        let fields = lex_card(&[(1, "CONM2        500      10             10.")]).unwrap();
        let mut element = MassElement::parse("CONM2", &fields).unwrap();
        element.scale_mass(0.5);
        assert_eq!(element.mass(), Some(5.0));
    }
}
