//! Rigid element cards

use crate::cards::{dof_field, fail, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

/// A rigid element
#[derive(Debug, Clone, PartialEq)]
pub enum RigidElement {
    Rbe2(Rbe2),
    Rbe3(Rbe3),
    Rbar(Rbar),
}

/// RBE2: one independent node driving a set of dependent nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Rbe2 {
    pub eid: u32,
    /// Independent node
    pub gn: u32,
    /// Dependent components
    pub cm: String,
    /// Dependent nodes
    pub gmi: Vec<u32>,
    pub alpha: Option<f64>,
}

/// One weighted independent group of an RBE3
#[derive(Debug, Clone, PartialEq)]
pub struct Rbe3Group {
    pub weight: f64,
    pub components: String,
    pub nodes: Vec<u32>,
}

/// RBE3: dependent reference node tied to weighted independent groups
#[derive(Debug, Clone, PartialEq)]
pub struct Rbe3 {
    pub eid: u32,
    /// Dependent reference node
    pub refgrid: u32,
    pub refc: String,
    pub groups: Vec<Rbe3Group>,
    /// UM / ALPHA tail, verbatim
    pub tail: Vec<Field>,
}

/// RBAR: rigid bar between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Rbar {
    pub eid: u32,
    pub ga: u32,
    pub gb: u32,
    pub cna: String,
    pub cnb: String,
    pub cma: String,
    pub cmb: String,
    pub alpha: Option<f64>,
}

impl RigidElement {
    pub fn eid(&self) -> u32 {
        match self {
            RigidElement::Rbe2(e) => e.eid,
            RigidElement::Rbe3(e) => e.eid,
            RigidElement::Rbar(e) => e.eid,
        }
    }

    pub fn set_eid(&mut self, eid: u32) {
        match self {
            RigidElement::Rbe2(e) => e.eid = eid,
            RigidElement::Rbe3(e) => e.eid = eid,
            RigidElement::Rbar(e) => e.eid = eid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RigidElement::Rbe2(_) => "RBE2",
            RigidElement::Rbe3(_) => "RBE3",
            RigidElement::Rbar(_) => "RBAR",
        }
    }

    /// Every node the element touches
    pub fn nodes(&self) -> Vec<u32> {
        match self {
            RigidElement::Rbe2(e) => {
                let mut nodes = vec![e.gn];
                nodes.extend(&e.gmi);
                nodes
            }
            RigidElement::Rbe3(e) => {
                let mut nodes = vec![e.refgrid];
                for group in &e.groups {
                    nodes.extend(&group.nodes);
                }
                nodes
            }
            RigidElement::Rbar(e) => vec![e.ga, e.gb],
        }
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        match name {
            "RBE2" => {
                // Body is dependent node ids; a trailing real is ALPHA
                let mut gmi = Vec::new();
                let mut alpha = None;
                for index in 3..fields.len() {
                    match fields.get(index) {
                        Field::Blank => continue,
                        Field::Int(node) if *node > 0 => gmi.push(*node as u32),
                        Field::Real(value) => {
                            alpha = Some(*value);
                            break;
                        }
                        _ => return Err(fail(fields, index, "dependent node")),
                    }
                }
                Ok(RigidElement::Rbe2(Rbe2 {
                    eid: fields.uint(0)?,
                    gn: fields.uint(1)?,
                    cm: fields.dof(2)?,
                    gmi,
                    alpha,
                }))
            }
            "RBE3" => {
                let eid = fields.uint(0)?;
                let refgrid = fields.uint(2)?;
                let refc = fields.dof(3)?;

                // Scan weighted groups: WT, C, then nodes until the next
                // real or the UM tail
                let mut groups: Vec<Rbe3Group> = Vec::new();
                let mut tail = Vec::new();
                let mut index = 4;
                while index < fields.len() {
                    match fields.get(index) {
                        Field::Blank => index += 1,
                        Field::Real(weight) => {
                            let components = fields.dof(index + 1)?;
                            let mut nodes = Vec::new();
                            let mut cursor = index + 2;
                            while cursor < fields.len() {
                                match fields.get(cursor) {
                                    Field::Int(node) if *node > 0 => {
                                        nodes.push(*node as u32);
                                        cursor += 1;
                                    }
                                    Field::Blank => cursor += 1,
                                    _ => break,
                                }
                            }
                            groups.push(Rbe3Group {
                                weight: *weight,
                                components,
                                nodes,
                            });
                            index = cursor;
                        }
                        Field::Str(_) => {
                            // UM or ALPHA section: keep the remainder verbatim
                            tail = fields.rest(index);
                            break;
                        }
                        _ => return Err(fail(fields, index, "weight group")),
                    }
                }
                Ok(RigidElement::Rbe3(Rbe3 {
                    eid,
                    refgrid,
                    refc,
                    groups,
                    tail,
                }))
            }
            "RBAR" => Ok(RigidElement::Rbar(Rbar {
                eid: fields.uint(0)?,
                ga: fields.uint(1)?,
                gb: fields.uint(2)?,
                cna: fields.dof(3)?,
                cnb: fields.dof(4)?,
                cma: fields.dof(5)?,
                cmb: fields.dof(6)?,
                alpha: fields.real_opt(7)?,
            })),
            _ => Err(fail(fields, 0, "rigid element card")),
        }
    }

    pub fn write(&self) -> String {
        match self {
            RigidElement::Rbe2(e) => {
                let mut fields: Vec<Field> =
                    vec![e.eid.into(), e.gn.into(), dof_field(&e.cm)];
                fields.extend(e.gmi.iter().map(|&n| Field::from(n)));
                fields.push(e.alpha.into());
                write_card("RBE2", fields)
            }
            RigidElement::Rbe3(e) => {
                let mut fields: Vec<Field> = vec![
                    e.eid.into(),
                    Field::Blank,
                    e.refgrid.into(),
                    dof_field(&e.refc),
                ];
                for group in &e.groups {
                    fields.push(group.weight.into());
                    fields.push(dof_field(&group.components));
                    fields.extend(group.nodes.iter().map(|&n| Field::from(n)));
                }
                fields.extend(e.tail.clone());
                write_card("RBE3", fields)
            }
            RigidElement::Rbar(e) => write_card(
                "RBAR",
                vec![
                    e.eid.into(),
                    e.ga.into(),
                    e.gb.into(),
                    dof_field(&e.cna),
                    dof_field(&e.cnb),
                    dof_field(&e.cma),
                    dof_field(&e.cmb),
                    e.alpha.into(),
                ],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    fn reparse(element: &RigidElement) -> RigidElement {
        let text = element.write();
        let lines: Vec<(usize, &str)> =
            text.lines().enumerate().map(|(n, l)| (n + 1, l)).collect();
        RigidElement::parse(element.name(), &lex_card(&lines).unwrap()).unwrap()
    }

    #[test]
    fn rbe2_roundtrip() {
        let fields = lex_card(&[
            (1, "RBE2         100     501  123456     301     302     303     304     305"),
            (2, "             306"),
        ])
        .unwrap();
        let element = RigidElement::parse("RBE2", &fields).unwrap();
        let RigidElement::Rbe2(ref rbe2) = element else {
            panic!()
        };
        assert_eq!(rbe2.gn, 501);
        assert_eq!(rbe2.gmi.len(), 6);
        assert_eq!(rbe2.cm, "123456");
        assert_eq!(element, reparse(&element));
    }

    #[test]
    fn rbe3_groups() {
        let fields = lex_card(&[
            (1, "RBE3         200             501  123456     1.0     123     301     302"),
            (2, "             303     2.0     123     401     402"),
        ])
        .unwrap();
        let element = RigidElement::parse("RBE3", &fields).unwrap();
        let RigidElement::Rbe3(ref rbe3) = element else {
            panic!()
        };
        assert_eq!(rbe3.refgrid, 501);
        assert_eq!(rbe3.groups.len(), 2);
        assert_eq!(rbe3.groups[0].nodes, vec![301, 302, 303]);
        assert_eq!(rbe3.groups[1].weight, 2.0);
        assert_eq!(element, reparse(&element));
    }
}
