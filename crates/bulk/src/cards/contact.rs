//! Contact cards
//!
//! The surface and pairing cards are fully typed since the partition
//! engine walks them; the parameter cards keep their bodies verbatim.

use crate::cards::{expand_id_list, fail, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

/// A contact card
#[derive(Debug, Clone, PartialEq)]
pub enum Contact {
    Bsurf(Bsurf),
    Bsurfs(Bsurfs),
    Bctset(Bctset),
    Bctadd(Bctadd),
    Bconp(Bconp),
    Bcbody(Bcbody),
    Bctpara(Bctpara),
    Bctparm(Bctparm),
    Blseg(Blseg),
    Bfric(Bfric),
}

/// BSURF: contact surface as a shell element list
#[derive(Debug, Clone, PartialEq)]
pub struct Bsurf {
    pub sid: u32,
    pub eids: Vec<u32>,
}

/// BSURFS: contact surface as solid faces (EID + three corner grids)
#[derive(Debug, Clone, PartialEq)]
pub struct Bsurfs {
    pub sid: u32,
    pub entries: Vec<[u32; 4]>,
}

/// One source/target row of a BCTSET
#[derive(Debug, Clone, PartialEq)]
pub struct BctsetRow {
    pub source: u32,
    pub target: u32,
    pub friction: Option<f64>,
    pub min_distance: Option<f64>,
    pub max_distance: Option<f64>,
}

/// BCTSET: pairs of contact surfaces
#[derive(Debug, Clone, PartialEq)]
pub struct Bctset {
    pub csid: u32,
    pub rows: Vec<BctsetRow>,
}

/// BCTADD: union of contact sets
#[derive(Debug, Clone, PartialEq)]
pub struct Bctadd {
    pub csid: u32,
    pub sets: Vec<u32>,
}

/// BCONP: slideline contact
#[derive(Debug, Clone, PartialEq)]
pub struct Bconp {
    pub id: u32,
    pub slave: Option<u32>,
    pub master: Option<u32>,
    pub sfac: Option<f64>,
    pub friction: Option<u32>,
    pub ptype: Option<i64>,
    pub cid: Option<u32>,
}

/// BCBODY: contact body
#[derive(Debug, Clone, PartialEq)]
pub struct Bcbody {
    pub bid: u32,
    pub dim: Option<String>,
    pub behav: Option<String>,
    pub bsid: Option<u32>,
    pub rest: Vec<Field>,
}

/// BCTPARA: contact parameters (body verbatim)
#[derive(Debug, Clone, PartialEq)]
pub struct Bctpara {
    pub csid: u32,
    pub rest: Vec<Field>,
}

/// BCTPARM: contact parameters, newer form (body verbatim)
#[derive(Debug, Clone, PartialEq)]
pub struct Bctparm {
    pub csid: u32,
    pub rest: Vec<Field>,
}

/// BLSEG: slideline node path
#[derive(Debug, Clone, PartialEq)]
pub struct Blseg {
    pub id: u32,
    pub nodes: Vec<u32>,
}

/// BFRIC: friction for slideline contact
#[derive(Debug, Clone, PartialEq)]
pub struct Bfric {
    pub fid: u32,
    pub rest: Vec<Field>,
}

impl Contact {
    pub fn sid(&self) -> u32 {
        match self {
            Contact::Bsurf(c) => c.sid,
            Contact::Bsurfs(c) => c.sid,
            Contact::Bctset(c) => c.csid,
            Contact::Bctadd(c) => c.csid,
            Contact::Bconp(c) => c.id,
            Contact::Bcbody(c) => c.bid,
            Contact::Bctpara(c) => c.csid,
            Contact::Bctparm(c) => c.csid,
            Contact::Blseg(c) => c.id,
            Contact::Bfric(c) => c.fid,
        }
    }

    pub fn set_sid(&mut self, sid: u32) {
        match self {
            Contact::Bsurf(c) => c.sid = sid,
            Contact::Bsurfs(c) => c.sid = sid,
            Contact::Bctset(c) => c.csid = sid,
            Contact::Bctadd(c) => c.csid = sid,
            Contact::Bconp(c) => c.id = sid,
            Contact::Bcbody(c) => c.bid = sid,
            Contact::Bctpara(c) => c.csid = sid,
            Contact::Bctparm(c) => c.csid = sid,
            Contact::Blseg(c) => c.id = sid,
            Contact::Bfric(c) => c.fid = sid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Contact::Bsurf(_) => "BSURF",
            Contact::Bsurfs(_) => "BSURFS",
            Contact::Bctset(_) => "BCTSET",
            Contact::Bctadd(_) => "BCTADD",
            Contact::Bconp(_) => "BCONP",
            Contact::Bcbody(_) => "BCBODY",
            Contact::Bctpara(_) => "BCTPARA",
            Contact::Bctparm(_) => "BCTPARM",
            Contact::Blseg(_) => "BLSEG",
            Contact::Bfric(_) => "BFRIC",
        }
    }

    /// Element ids referenced by a surface card
    pub fn eids(&self) -> Vec<u32> {
        match self {
            Contact::Bsurf(c) => c.eids.clone(),
            Contact::Bsurfs(c) => c.entries.iter().map(|e| e[0]).collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Self> {
        let card = match name {
            "BSURF" => Contact::Bsurf(Bsurf {
                sid: fields.uint(0)?,
                eids: expand_id_list(fields, 1)?,
            }),
            "BSURFS" => {
                let mut entries = Vec::new();
                // Body is EID G1 G2 G3 quadruples; slots 2-3 of the first
                // row are reserved blanks
                let mut index = 3;
                while index < fields.len() {
                    if fields.get(index).is_blank() {
                        index += 1;
                        continue;
                    }
                    entries.push([
                        fields.uint(index)?,
                        fields.uint(index + 1)?,
                        fields.uint(index + 2)?,
                        fields.uint(index + 3)?,
                    ]);
                    index += 4;
                }
                Contact::Bsurfs(Bsurfs {
                    sid: fields.uint(0)?,
                    entries,
                })
            }
            "BCTSET" => {
                let mut rows = Vec::new();
                let mut index = 1;
                while index < fields.len() {
                    if fields.get(index).is_blank() {
                        index += 1;
                        continue;
                    }
                    rows.push(BctsetRow {
                        source: fields.uint(index)?,
                        target: fields.uint(index + 1)?,
                        friction: fields.real_opt(index + 2)?,
                        min_distance: fields.real_opt(index + 3)?,
                        max_distance: fields.real_opt(index + 4)?,
                    });
                    index += 5;
                }
                Contact::Bctset(Bctset {
                    csid: fields.uint(0)?,
                    rows,
                })
            }
            "BCTADD" => Contact::Bctadd(Bctadd {
                csid: fields.uint(0)?,
                sets: fields.id_list(1)?,
            }),
            "BCONP" => Contact::Bconp(Bconp {
                id: fields.uint(0)?,
                slave: fields.uint_opt(1)?,
                master: fields.uint_opt(2)?,
                sfac: fields.real_opt(4)?,
                friction: fields.uint_opt(5)?,
                ptype: fields.int_opt(6)?,
                cid: fields.uint_opt(7)?,
            }),
            "BCBODY" => Contact::Bcbody(Bcbody {
                bid: fields.uint(0)?,
                dim: fields.string(1),
                behav: fields.string(2),
                bsid: fields.uint_opt(3)?,
                rest: fields.rest(4),
            }),
            "BCTPARA" => Contact::Bctpara(Bctpara {
                csid: fields.uint(0)?,
                rest: fields.rest(1),
            }),
            "BCTPARM" => Contact::Bctparm(Bctparm {
                csid: fields.uint(0)?,
                rest: fields.rest(1),
            }),
            "BLSEG" => Contact::Blseg(Blseg {
                id: fields.uint(0)?,
                nodes: expand_id_list(fields, 1)?,
            }),
            "BFRIC" => Contact::Bfric(Bfric {
                fid: fields.uint(0)?,
                rest: fields.rest(1),
            }),
            _ => return Err(fail(fields, 0, "contact card")),
        };
        Ok(card)
    }

    pub fn write(&self) -> String {
        match self {
            Contact::Bsurf(c) => {
                let mut fields: Vec<Field> = vec![c.sid.into()];
                fields.extend(c.eids.iter().map(|&e| Field::from(e)));
                write_card("BSURF", fields)
            }
            Contact::Bsurfs(c) => {
                let mut fields: Vec<Field> =
                    vec![c.sid.into(), Field::Blank, Field::Blank];
                for entry in &c.entries {
                    fields.extend(entry.iter().map(|&v| Field::from(v)));
                }
                write_card("BSURFS", fields)
            }
            Contact::Bctset(c) => {
                let mut fields: Vec<Field> = vec![c.csid.into()];
                for (n, row) in c.rows.iter().enumerate() {
                    if n > 0 {
                        while fields.len() % 8 != 1 {
                            fields.push(Field::Blank);
                        }
                    }
                    fields.push(row.source.into());
                    fields.push(row.target.into());
                    fields.push(row.friction.into());
                    fields.push(row.min_distance.into());
                    fields.push(row.max_distance.into());
                }
                write_card("BCTSET", fields)
            }
            Contact::Bctadd(c) => {
                let mut fields: Vec<Field> = vec![c.csid.into()];
                fields.extend(c.sets.iter().map(|&s| Field::from(s)));
                write_card("BCTADD", fields)
            }
            Contact::Bconp(c) => write_card(
                "BCONP",
                vec![
                    c.id.into(),
                    c.slave.into(),
                    c.master.into(),
                    Field::Blank,
                    c.sfac.into(),
                    c.friction.into(),
                    c.ptype.into(),
                    c.cid.into(),
                ],
            ),
            Contact::Bcbody(c) => {
                let mut fields = vec![
                    c.bid.into(),
                    c.dim.as_deref().into(),
                    c.behav.as_deref().into(),
                    c.bsid.into(),
                ];
                fields.extend(c.rest.clone());
                write_card("BCBODY", fields)
            }
            Contact::Bctpara(c) => {
                let mut fields = vec![c.csid.into()];
                fields.extend(c.rest.clone());
                write_card("BCTPARA", fields)
            }
            Contact::Bctparm(c) => {
                let mut fields = vec![c.csid.into()];
                fields.extend(c.rest.clone());
                write_card("BCTPARM", fields)
            }
            Contact::Blseg(c) => {
                let mut fields: Vec<Field> = vec![c.id.into()];
                fields.extend(c.nodes.iter().map(|&n| Field::from(n)));
                write_card("BLSEG", fields)
            }
            Contact::Bfric(c) => {
                let mut fields = vec![c.fid.into()];
                fields.extend(c.rest.clone());
                write_card("BFRIC", fields)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    #[test]
    fn bctset_rows() {
        let fields = lex_card(&[
            (1, "BCTSET         5       1       2    0.15"),
            (2, "               3       4"),
        ])
        .unwrap();
        let card = Contact::parse("BCTSET", &fields).unwrap();
        let Contact::Bctset(ref set) = card else {
            panic!()
        };
        assert_eq!(set.rows.len(), 2);
        assert_eq!((set.rows[0].source, set.rows[0].target), (1, 2));
        assert_eq!((set.rows[1].source, set.rows[1].target), (3, 4));

        let text = card.write();
        let lines: Vec<(usize, &str)> =
            text.lines().enumerate().map(|(n, l)| (n + 1, l)).collect();
        let reparsed = Contact::parse("BCTSET", &lex_card(&lines).unwrap()).unwrap();
        assert_eq!(card, reparsed);
    }

    #[test]
    fn bsurf_thru() {
        let fields = lex_card(&[(1, "BSURF         10     100    THRU     103")]).unwrap();
        let card = Contact::parse("BSURF", &fields).unwrap();
        assert_eq!(card.eids(), vec![100, 101, 102, 103]);
    }
}
