//! Constraint cards
//!
//! Cards sharing a set id accumulate under that id in the model store;
//! the union of their content is the constraint set.

use crate::cards::{dof_field, expand_id_list, fail, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

/// A single-point constraint card
#[derive(Debug, Clone, PartialEq)]
pub enum SpcCard {
    Spc(Spc),
    Spc1(Spc1),
    SpcAdd(SpcAdd),
}

/// One enforced node entry of an SPC card
#[derive(Debug, Clone, PartialEq)]
pub struct SpcEntry {
    pub node: u32,
    pub components: String,
    pub value: f64,
}

/// SPC: enforced constraints, up to two nodes per card
#[derive(Debug, Clone, PartialEq)]
pub struct Spc {
    pub sid: u32,
    pub entries: Vec<SpcEntry>,
}

/// SPC1: one component mask over a node list
#[derive(Debug, Clone, PartialEq)]
pub struct Spc1 {
    pub sid: u32,
    pub components: String,
    pub nodes: Vec<u32>,
}

/// SPCADD: union of other SPC sets
#[derive(Debug, Clone, PartialEq)]
pub struct SpcAdd {
    pub sid: u32,
    pub sets: Vec<u32>,
}

/// A multi-point constraint card
#[derive(Debug, Clone, PartialEq)]
pub enum MpcCard {
    Mpc(Mpc),
    MpcAdd(MpcAdd),
}

/// One weighted term of an MPC equation
#[derive(Debug, Clone, PartialEq)]
pub struct MpcTerm {
    pub node: u32,
    pub component: String,
    pub coefficient: f64,
}

/// MPC: linear constraint equation over node components
#[derive(Debug, Clone, PartialEq)]
pub struct Mpc {
    pub sid: u32,
    pub terms: Vec<MpcTerm>,
}

/// MPCADD: union of other MPC sets
#[derive(Debug, Clone, PartialEq)]
pub struct MpcAdd {
    pub sid: u32,
    pub sets: Vec<u32>,
}

impl SpcCard {
    pub fn sid(&self) -> u32 {
        match self {
            SpcCard::Spc(c) => c.sid,
            SpcCard::Spc1(c) => c.sid,
            SpcCard::SpcAdd(c) => c.sid,
        }
    }

    pub fn set_sid(&mut self, sid: u32) {
        match self {
            SpcCard::Spc(c) => c.sid = sid,
            SpcCard::Spc1(c) => c.sid = sid,
            SpcCard::SpcAdd(c) => c.sid = sid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpcCard::Spc(_) => "SPC",
            SpcCard::Spc1(_) => "SPC1",
            SpcCard::SpcAdd(_) => "SPCADD",
        }
    }

    /// Constrained node ids; empty for SPCADD
    pub fn nodes(&self) -> Vec<u32> {
        match self {
            SpcCard::Spc(c) => c.entries.iter().map(|e| e.node).collect(),
            SpcCard::Spc1(c) => c.nodes.clone(),
            SpcCard::SpcAdd(_) => Vec::new(),
        }
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        match name {
            "SPC" => {
                let mut entries = vec![SpcEntry {
                    node: fields.uint(1)?,
                    components: fields.dof(2)?,
                    value: fields.real(3)?,
                }];
                if !fields.get(4).is_blank() {
                    entries.push(SpcEntry {
                        node: fields.uint(4)?,
                        components: fields.dof(5)?,
                        value: fields.real(6)?,
                    });
                }
                Ok(SpcCard::Spc(Spc {
                    sid: fields.uint(0)?,
                    entries,
                }))
            }
            "SPC1" => Ok(SpcCard::Spc1(Spc1 {
                sid: fields.uint(0)?,
                components: fields.dof(1)?,
                nodes: expand_id_list(fields, 2)?,
            })),
            "SPCADD" => Ok(SpcCard::SpcAdd(SpcAdd {
                sid: fields.uint(0)?,
                sets: fields.id_list(1)?,
            })),
            _ => Err(fail(fields, 0, "spc card")),
        }
    }

    pub fn write(&self) -> String {
        match self {
            SpcCard::Spc(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into()];
                for entry in &c.entries {
                    fields.push(entry.node.into());
                    fields.push(dof_field(&entry.components));
                    fields.push(entry.value.into());
                }
                write_card("SPC", fields)
            }
            SpcCard::Spc1(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into(), dof_field(&c.components)];
                fields.extend(c.nodes.iter().map(|&n| Field::from(n)));
                write_card("SPC1", fields)
            }
            SpcCard::SpcAdd(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into()];
                fields.extend(c.sets.iter().map(|&s| Field::from(s)));
                write_card("SPCADD", fields)
            }
        }
    }
}

impl MpcCard {
    pub fn sid(&self) -> u32 {
        match self {
            MpcCard::Mpc(c) => c.sid,
            MpcCard::MpcAdd(c) => c.sid,
        }
    }

    pub fn set_sid(&mut self, sid: u32) {
        match self {
            MpcCard::Mpc(c) => c.sid = sid,
            MpcCard::MpcAdd(c) => c.sid = sid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MpcCard::Mpc(_) => "MPC",
            MpcCard::MpcAdd(_) => "MPCADD",
        }
    }

    pub fn nodes(&self) -> Vec<u32> {
        match self {
            MpcCard::Mpc(c) => c.terms.iter().map(|t| t.node).collect(),
            MpcCard::MpcAdd(_) => Vec::new(),
        }
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        match name {
            "MPC" => {
                // Terms are (node, component, coefficient) triples; blanks
                // between them come from the card layout
                let mut terms = Vec::new();
                let mut index = 1;
                while index < fields.len() {
                    if fields.get(index).is_blank() {
                        index += 1;
                        continue;
                    }
                    terms.push(MpcTerm {
                        node: fields.uint(index)?,
                        component: fields.dof(index + 1)?,
                        coefficient: fields.real(index + 2)?,
                    });
                    index += 3;
                }
                Ok(MpcCard::Mpc(Mpc {
                    sid: fields.uint(0)?,
                    terms,
                }))
            }
            "MPCADD" => Ok(MpcCard::MpcAdd(MpcAdd {
                sid: fields.uint(0)?,
                sets: fields.id_list(1)?,
            })),
            _ => Err(fail(fields, 0, "mpc card")),
        }
    }

    pub fn write(&self) -> String {
        match self {
            MpcCard::Mpc(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into()];
                for (n, term) in c.terms.iter().enumerate() {
                    // Rows hold two triples; the first slot of each
                    // continuation row stays blank
                    if n > 0 && n % 2 == 0 {
                        fields.push(Field::Blank);
                        fields.push(Field::Blank);
                    }
                    fields.push(term.node.into());
                    fields.push(dof_field(&term.component));
                    fields.push(term.coefficient.into());
                }
                write_card("MPC", fields)
            }
            MpcCard::MpcAdd(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into()];
                fields.extend(c.sets.iter().map(|&s| Field::from(s)));
                write_card("MPCADD", fields)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    #[test]
    fn spc1_thru() {
        let fields = lex_card(&[(1, "SPC1          10  123456       1    THRU       4")]).unwrap();
        let card = SpcCard::parse("SPC1", &fields).unwrap();
        assert_eq!(card.nodes(), vec![1, 2, 3, 4]);
        assert_eq!(card.sid(), 10);
    }

    #[test]
    fn mpc_triples_roundtrip() {
        let fields = lex_card(&[
            (1, "MPC           30     101       3     1.0     102       3    -1.0"),
            (2, "                     103       1     0.5"),
        ])
        .unwrap();
        let card = MpcCard::parse("MPC", &fields).unwrap();
        let MpcCard::Mpc(ref mpc) = card else { panic!() };
        assert_eq!(mpc.terms.len(), 3);
        assert_eq!(mpc.terms[2].node, 103);

        let text = card.write();
        let lines: Vec<(usize, &str)> =
            text.lines().enumerate().map(|(n, l)| (n + 1, l)).collect();
        let reparsed = MpcCard::parse("MPC", &lex_card(&lines).unwrap()).unwrap();
        assert_eq!(card, reparsed);
    }
}
