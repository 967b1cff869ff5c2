//! Property cards
//!
//! The wide section-library cards (PBARL, PBEAML, PBEAM) keep their
//! essential slots typed and the remaining body verbatim, so decks using
//! exotic stations still round-trip.

use crate::cards::{fail, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

/// An element property
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Shell(Pshell),
    Comp(Pcomp),
    CompG(Pcompg),
    Solid(Psolid),
    LSolid(Plsolid),
    Bar(Pbar),
    BarL(Pbarl),
    Beam(Pbeam),
    BeamL(Pbeaml),
    Rod(Prod),
    Bush(Pbush),
    BushT(Pbusht),
    Elas(Pelas),
    Damp(Pdamp),
    Gap(Pgap),
    Shear(Pshear),
    Weld(Pweld),
    Fast(Pfast),
    Visc(Pvisc),
}

/// PSHELL: isotropic shell
#[derive(Debug, Clone, PartialEq)]
pub struct Pshell {
    pub pid: u32,
    pub mid1: Option<u32>,
    pub t: Option<f64>,
    pub mid2: Option<u32>,
    /// Bending inertia ratio 12I/T^3
    pub bmir: Option<f64>,
    pub mid3: Option<u32>,
    pub ts_t: Option<f64>,
    pub nsm: f64,
    pub z1: Option<f64>,
    pub z2: Option<f64>,
    pub mid4: Option<u32>,
}

/// One composite ply
#[derive(Debug, Clone, PartialEq)]
pub struct Ply {
    /// Global ply id (PCOMPG only)
    pub gplyid: Option<u32>,
    pub mid: u32,
    pub t: f64,
    pub theta: f64,
    pub sout: Option<String>,
}

/// PCOMP: composite shell
#[derive(Debug, Clone, PartialEq)]
pub struct Pcomp {
    pub pid: u32,
    pub z0: Option<f64>,
    pub nsm: f64,
    pub sb: Option<f64>,
    pub ft: Option<String>,
    pub tref: Option<f64>,
    pub ge: Option<f64>,
    /// Symmetry/membrane flag
    pub lam: Option<String>,
    pub plies: Vec<Ply>,
}

/// PCOMPG: composite shell with global ply ids
#[derive(Debug, Clone, PartialEq)]
pub struct Pcompg {
    pub pid: u32,
    pub z0: Option<f64>,
    pub nsm: f64,
    pub sb: Option<f64>,
    pub ft: Option<String>,
    pub tref: Option<f64>,
    pub ge: Option<f64>,
    pub lam: Option<String>,
    pub plies: Vec<Ply>,
}

/// PSOLID: solid property
#[derive(Debug, Clone, PartialEq)]
pub struct Psolid {
    pub pid: u32,
    pub mid: u32,
    /// Material frame: integer coordinate id or -1 for element frame
    pub cordm: Option<i64>,
    pub rest: Vec<Field>,
}

/// PLSOLID: hyperelastic solid property
#[derive(Debug, Clone, PartialEq)]
pub struct Plsolid {
    pub pid: u32,
    pub mid: u32,
    pub str_loc: Option<String>,
}

/// PBAR: simple beam property by section constants
#[derive(Debug, Clone, PartialEq)]
pub struct Pbar {
    pub pid: u32,
    pub mid: u32,
    pub a: f64,
    pub i1: f64,
    pub i2: f64,
    pub j: f64,
    pub nsm: f64,
    pub rest: Vec<Field>,
}

/// PBARL: bar property from the section library
#[derive(Debug, Clone, PartialEq)]
pub struct Pbarl {
    pub pid: u32,
    pub mid: u32,
    pub group: Option<String>,
    pub section: String,
    pub dims: Vec<f64>,
    pub nsm: f64,
}

/// PBEAM: beam property by station
#[derive(Debug, Clone, PartialEq)]
pub struct Pbeam {
    pub pid: u32,
    pub mid: u32,
    /// First-station section constants
    pub a: f64,
    pub i1: f64,
    pub i2: f64,
    pub i12: f64,
    pub j: f64,
    pub nsm: f64,
    pub rest: Vec<Field>,
}

/// PBEAML: beam property from the section library
#[derive(Debug, Clone, PartialEq)]
pub struct Pbeaml {
    pub pid: u32,
    pub mid: u32,
    pub group: Option<String>,
    pub section: String,
    /// First-station dimensions
    pub dims: Vec<f64>,
    pub nsm: f64,
    /// Further stations, verbatim
    pub rest: Vec<Field>,
}

/// PROD: rod property
#[derive(Debug, Clone, PartialEq)]
pub struct Prod {
    pub pid: u32,
    pub mid: u32,
    pub a: f64,
    pub j: Option<f64>,
    pub c: Option<f64>,
    pub nsm: f64,
}

/// PBUSH: generalized spring-damper property
///
/// The card is a sequence of flagged value groups (`K`, `B`, `GE`, `RCV`,
/// `M`), each at most six wide. Groups are kept in card order.
#[derive(Debug, Clone, PartialEq)]
pub struct Pbush {
    pub pid: u32,
    pub groups: Vec<(String, Vec<Field>)>,
}

/// PBUSHT: frequency/load dependent bush property
#[derive(Debug, Clone, PartialEq)]
pub struct Pbusht {
    pub pid: u32,
    pub groups: Vec<(String, Vec<Field>)>,
}

/// PELAS: scalar spring property
#[derive(Debug, Clone, PartialEq)]
pub struct Pelas {
    pub pid: u32,
    pub k: f64,
    pub ge: Option<f64>,
    pub s: Option<f64>,
}

/// PDAMP: scalar damper property
#[derive(Debug, Clone, PartialEq)]
pub struct Pdamp {
    pub pid: u32,
    pub b: f64,
}

/// PGAP: gap property
#[derive(Debug, Clone, PartialEq)]
pub struct Pgap {
    pub pid: u32,
    pub rest: Vec<Field>,
}

/// PSHEAR: shear panel property
#[derive(Debug, Clone, PartialEq)]
pub struct Pshear {
    pub pid: u32,
    pub mid: u32,
    pub t: f64,
    pub nsm: f64,
    pub f1: Option<f64>,
    pub f2: Option<f64>,
}

/// PWELD: weld property
#[derive(Debug, Clone, PartialEq)]
pub struct Pweld {
    pub pid: u32,
    pub mid: u32,
    pub d: f64,
    pub rest: Vec<Field>,
}

/// PFAST: fastener property
#[derive(Debug, Clone, PartialEq)]
pub struct Pfast {
    pub pid: u32,
    pub d: f64,
    pub rest: Vec<Field>,
}

/// PVISC: viscous damper property
#[derive(Debug, Clone, PartialEq)]
pub struct Pvisc {
    pub pid: u32,
    pub ce: f64,
    pub cr: Option<f64>,
}

/// Dimension count for a section-library type
///
/// Shared by PBARL and PBEAML; anything unknown reports `None` and the
/// card body stays verbatim.
fn section_ndims(section: &str) -> Option<usize> {
    let n = match section {
        "ROD" => 1,
        "TUBE" | "BAR" => 2,
        "HEXA" => 3,
        "L" | "CHAN" | "CHAN1" | "CHAN2" | "T" | "T1" | "T2" | "BOX" | "CROSS" | "H" | "I1"
        | "Z" | "HAT" => 4,
        "HAT1" => 5,
        "I" | "BOX1" => 6,
        "DBOX" => 10,
        _ => return None,
    };
    Some(n)
}

impl Property {
    pub fn pid(&self) -> u32 {
        match self {
            Property::Shell(p) => p.pid,
            Property::Comp(p) => p.pid,
            Property::CompG(p) => p.pid,
            Property::Solid(p) => p.pid,
            Property::LSolid(p) => p.pid,
            Property::Bar(p) => p.pid,
            Property::BarL(p) => p.pid,
            Property::Beam(p) => p.pid,
            Property::BeamL(p) => p.pid,
            Property::Rod(p) => p.pid,
            Property::Bush(p) => p.pid,
            Property::BushT(p) => p.pid,
            Property::Elas(p) => p.pid,
            Property::Damp(p) => p.pid,
            Property::Gap(p) => p.pid,
            Property::Shear(p) => p.pid,
            Property::Weld(p) => p.pid,
            Property::Fast(p) => p.pid,
            Property::Visc(p) => p.pid,
        }
    }

    pub fn set_pid(&mut self, pid: u32) {
        match self {
            Property::Shell(p) => p.pid = pid,
            Property::Comp(p) => p.pid = pid,
            Property::CompG(p) => p.pid = pid,
            Property::Solid(p) => p.pid = pid,
            Property::LSolid(p) => p.pid = pid,
            Property::Bar(p) => p.pid = pid,
            Property::BarL(p) => p.pid = pid,
            Property::Beam(p) => p.pid = pid,
            Property::BeamL(p) => p.pid = pid,
            Property::Rod(p) => p.pid = pid,
            Property::Bush(p) => p.pid = pid,
            Property::BushT(p) => p.pid = pid,
            Property::Elas(p) => p.pid = pid,
            Property::Damp(p) => p.pid = pid,
            Property::Gap(p) => p.pid = pid,
            Property::Shear(p) => p.pid = pid,
            Property::Weld(p) => p.pid = pid,
            Property::Fast(p) => p.pid = pid,
            Property::Visc(p) => p.pid = pid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Property::Shell(_) => "PSHELL",
            Property::Comp(_) => "PCOMP",
            Property::CompG(_) => "PCOMPG",
            Property::Solid(_) => "PSOLID",
            Property::LSolid(_) => "PLSOLID",
            Property::Bar(_) => "PBAR",
            Property::BarL(_) => "PBARL",
            Property::Beam(_) => "PBEAM",
            Property::BeamL(_) => "PBEAML",
            Property::Rod(_) => "PROD",
            Property::Bush(_) => "PBUSH",
            Property::BushT(_) => "PBUSHT",
            Property::Elas(_) => "PELAS",
            Property::Damp(_) => "PDAMP",
            Property::Gap(_) => "PGAP",
            Property::Shear(_) => "PSHEAR",
            Property::Weld(_) => "PWELD",
            Property::Fast(_) => "PFAST",
            Property::Visc(_) => "PVISC",
        }
    }

    /// Referenced material ids
    pub fn mids(&self) -> Vec<u32> {
        match self {
            Property::Shell(p) => [p.mid1, p.mid2, p.mid3, p.mid4]
                .into_iter()
                .flatten()
                .collect(),
            Property::Comp(p) => p.plies.iter().map(|ply| ply.mid).collect(),
            Property::CompG(p) => p.plies.iter().map(|ply| ply.mid).collect(),
            Property::Solid(p) => vec![p.mid],
            Property::LSolid(p) => vec![p.mid],
            Property::Bar(p) => vec![p.mid],
            Property::BarL(p) => vec![p.mid],
            Property::Beam(p) => vec![p.mid],
            Property::BeamL(p) => vec![p.mid],
            Property::Rod(p) => vec![p.mid],
            Property::Shear(p) => vec![p.mid],
            Property::Weld(p) => vec![p.mid],
            _ => Vec::new(),
        }
    }

    /// Non-structural mass, for the kinds that declare one
    pub fn nsm(&self) -> Option<f64> {
        match self {
            Property::Shell(p) => Some(p.nsm),
            Property::Comp(p) => Some(p.nsm),
            Property::CompG(p) => Some(p.nsm),
            Property::Bar(p) => Some(p.nsm),
            Property::BarL(p) => Some(p.nsm),
            Property::Beam(p) => Some(p.nsm),
            Property::BeamL(p) => Some(p.nsm),
            Property::Rod(p) => Some(p.nsm),
            _ => None,
        }
    }

    pub fn nsm_mut(&mut self) -> Option<&mut f64> {
        match self {
            Property::Shell(p) => Some(&mut p.nsm),
            Property::Comp(p) => Some(&mut p.nsm),
            Property::CompG(p) => Some(&mut p.nsm),
            Property::Bar(p) => Some(&mut p.nsm),
            Property::BarL(p) => Some(&mut p.nsm),
            Property::Beam(p) => Some(&mut p.nsm),
            Property::BeamL(p) => Some(&mut p.nsm),
            Property::Rod(p) => Some(&mut p.nsm),
            _ => None,
        }
    }

    /// Section area, where the property defines one directly
    pub fn area(&self) -> Option<f64> {
        match self {
            Property::Bar(p) => Some(p.a),
            Property::Beam(p) => Some(p.a),
            Property::Rod(p) => Some(p.a),
            _ => None,
        }
    }

    /// Total laminate or shell thickness
    pub fn thickness(&self) -> Option<f64> {
        match self {
            Property::Shell(p) => p.t,
            Property::Comp(p) => {
                let total: f64 = p.plies.iter().map(|ply| ply.t).sum();
                let symmetric = p.lam.as_deref() == Some("SYM");
                Some(if symmetric { 2.0 * total } else { total })
            }
            Property::CompG(p) => Some(p.plies.iter().map(|ply| ply.t).sum()),
            Property::Shear(p) => Some(p.t),
            _ => None,
        }
    }

    /// Parse a property card; PELAS and PDAMP may define several per card
    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Vec<Self>> {
        let single = match name {
            "PSHELL" => Property::Shell(Pshell {
                pid: fields.uint(0)?,
                mid1: fields.uint_opt(1)?,
                t: fields.real_opt(2)?,
                mid2: fields.uint_opt(3)?,
                bmir: fields.real_opt(4)?,
                mid3: fields.uint_opt(5)?,
                ts_t: fields.real_opt(6)?,
                nsm: fields.real(7)?,
                z1: fields.real_opt(8)?,
                z2: fields.real_opt(9)?,
                mid4: fields.uint_opt(10)?,
            }),
            "PCOMP" => {
                let plies = parse_plies(fields, false)?;
                Property::Comp(Pcomp {
                    pid: fields.uint(0)?,
                    z0: fields.real_opt(1)?,
                    nsm: fields.real(2)?,
                    sb: fields.real_opt(3)?,
                    ft: fields.string(4),
                    tref: fields.real_opt(5)?,
                    ge: fields.real_opt(6)?,
                    lam: fields.string(7),
                    plies,
                })
            }
            "PCOMPG" => {
                let plies = parse_plies(fields, true)?;
                Property::CompG(Pcompg {
                    pid: fields.uint(0)?,
                    z0: fields.real_opt(1)?,
                    nsm: fields.real(2)?,
                    sb: fields.real_opt(3)?,
                    ft: fields.string(4),
                    tref: fields.real_opt(5)?,
                    ge: fields.real_opt(6)?,
                    lam: fields.string(7),
                    plies,
                })
            }
            "PSOLID" => Property::Solid(Psolid {
                pid: fields.uint(0)?,
                mid: fields.uint(1)?,
                cordm: fields.int_opt(2)?,
                rest: fields.rest(3),
            }),
            "PLSOLID" => Property::LSolid(Plsolid {
                pid: fields.uint(0)?,
                mid: fields.uint(1)?,
                str_loc: fields.string(2),
            }),
            "PBAR" => Property::Bar(Pbar {
                pid: fields.uint(0)?,
                mid: fields.uint(1)?,
                a: fields.real(2)?,
                i1: fields.real(3)?,
                i2: fields.real(4)?,
                j: fields.real(5)?,
                nsm: fields.real(6)?,
                rest: fields.rest(7),
            }),
            "PBARL" => {
                let section = fields
                    .string(3)
                    .ok_or_else(|| fail(fields, 3, "section type"))?;
                let dims_start = 8;
                let ndims = section_ndims(&section).unwrap_or(0);
                let mut dims = Vec::with_capacity(ndims);
                for n in 0..ndims {
                    dims.push(fields.real(dims_start + n)?);
                }
                Property::BarL(Pbarl {
                    pid: fields.uint(0)?,
                    mid: fields.uint(1)?,
                    group: fields.string(2),
                    section,
                    dims,
                    nsm: fields.real(dims_start + ndims)?,
                })
            }
            "PBEAM" => Property::Beam(Pbeam {
                pid: fields.uint(0)?,
                mid: fields.uint(1)?,
                a: fields.real(2)?,
                i1: fields.real(3)?,
                i2: fields.real(4)?,
                i12: fields.real(5)?,
                j: fields.real(6)?,
                nsm: fields.real(7)?,
                rest: fields.rest(8),
            }),
            "PBEAML" => {
                let section = fields
                    .string(3)
                    .ok_or_else(|| fail(fields, 3, "section type"))?;
                let dims_start = 8;
                let ndims = section_ndims(&section).unwrap_or(0);
                let mut dims = Vec::with_capacity(ndims);
                for n in 0..ndims {
                    dims.push(fields.real(dims_start + n)?);
                }
                Property::BeamL(Pbeaml {
                    pid: fields.uint(0)?,
                    mid: fields.uint(1)?,
                    group: fields.string(2),
                    section,
                    dims,
                    nsm: fields.real(dims_start + ndims)?,
                    rest: fields.rest(dims_start + ndims + 1),
                })
            }
            "PROD" => Property::Rod(Prod {
                pid: fields.uint(0)?,
                mid: fields.uint(1)?,
                a: fields.real(2)?,
                j: fields.real_opt(3)?,
                c: fields.real_opt(4)?,
                nsm: fields.real(5)?,
            }),
            "PBUSH" => Property::Bush(Pbush {
                pid: fields.uint(0)?,
                groups: parse_flag_groups(fields)?,
            }),
            "PBUSHT" => Property::BushT(Pbusht {
                pid: fields.uint(0)?,
                groups: parse_flag_groups(fields)?,
            }),
            "PELAS" | "PDAMP" => return parse_scalar_props(name, fields),
            "PGAP" => Property::Gap(Pgap {
                pid: fields.uint(0)?,
                rest: fields.rest(1),
            }),
            "PSHEAR" => Property::Shear(Pshear {
                pid: fields.uint(0)?,
                mid: fields.uint(1)?,
                t: fields.real(2)?,
                nsm: fields.real(3)?,
                f1: fields.real_opt(4)?,
                f2: fields.real_opt(5)?,
            }),
            "PWELD" => Property::Weld(Pweld {
                pid: fields.uint(0)?,
                mid: fields.uint(1)?,
                d: fields.real(2)?,
                rest: fields.rest(3),
            }),
            "PFAST" => Property::Fast(Pfast {
                pid: fields.uint(0)?,
                d: fields.real(1)?,
                rest: fields.rest(2),
            }),
            "PVISC" => Property::Visc(Pvisc {
                pid: fields.uint(0)?,
                ce: fields.real(1)?,
                cr: fields.real_opt(2)?,
            }),
            _ => return Err(fail(fields, 0, "property card")),
        };
        Ok(vec![single])
    }

    pub fn write(&self) -> String {
        match self {
            Property::Shell(p) => write_card(
                "PSHELL",
                vec![
                    p.pid.into(),
                    p.mid1.into(),
                    p.t.into(),
                    p.mid2.into(),
                    p.bmir.into(),
                    p.mid3.into(),
                    p.ts_t.into(),
                    p.nsm.into(),
                    p.z1.into(),
                    p.z2.into(),
                    p.mid4.into(),
                ],
            ),
            Property::Comp(p) => {
                let mut fields = composite_header(p.pid, p.z0, p.nsm, p.sb, &p.ft, p.tref, p.ge, &p.lam);
                for ply in &p.plies {
                    fields.push(ply.mid.into());
                    fields.push(ply.t.into());
                    fields.push(ply.theta.into());
                    fields.push(ply.sout.as_deref().into());
                }
                write_card("PCOMP", fields)
            }
            Property::CompG(p) => {
                let mut fields = composite_header(p.pid, p.z0, p.nsm, p.sb, &p.ft, p.tref, p.ge, &p.lam);
                for ply in &p.plies {
                    fields.push(ply.gplyid.into());
                    fields.push(ply.mid.into());
                    fields.push(ply.t.into());
                    fields.push(ply.theta.into());
                    fields.push(ply.sout.as_deref().into());
                    fields.extend([Field::Blank, Field::Blank, Field::Blank]);
                }
                write_card("PCOMPG", fields)
            }
            Property::Solid(p) => {
                let mut fields = vec![p.pid.into(), p.mid.into(), p.cordm.into()];
                fields.extend(p.rest.clone());
                write_card("PSOLID", fields)
            }
            Property::LSolid(p) => write_card(
                "PLSOLID",
                vec![p.pid.into(), p.mid.into(), p.str_loc.as_deref().into()],
            ),
            Property::Bar(p) => {
                let mut fields = vec![
                    p.pid.into(),
                    p.mid.into(),
                    p.a.into(),
                    p.i1.into(),
                    p.i2.into(),
                    p.j.into(),
                    p.nsm.into(),
                ];
                fields.extend(p.rest.clone());
                write_card("PBAR", fields)
            }
            Property::BarL(p) => {
                let mut fields = vec![
                    p.pid.into(),
                    p.mid.into(),
                    p.group.as_deref().into(),
                    p.section.as_str().into(),
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                ];
                fields.extend(p.dims.iter().map(|&d| Field::from(d)));
                fields.push(p.nsm.into());
                write_card("PBARL", fields)
            }
            Property::Beam(p) => {
                let mut fields = vec![
                    p.pid.into(),
                    p.mid.into(),
                    p.a.into(),
                    p.i1.into(),
                    p.i2.into(),
                    p.i12.into(),
                    p.j.into(),
                    p.nsm.into(),
                ];
                fields.extend(p.rest.clone());
                write_card("PBEAM", fields)
            }
            Property::BeamL(p) => {
                let mut fields = vec![
                    p.pid.into(),
                    p.mid.into(),
                    p.group.as_deref().into(),
                    p.section.as_str().into(),
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                    Field::Blank,
                ];
                fields.extend(p.dims.iter().map(|&d| Field::from(d)));
                fields.push(p.nsm.into());
                fields.extend(p.rest.clone());
                write_card("PBEAML", fields)
            }
            Property::Rod(p) => write_card(
                "PROD",
                vec![
                    p.pid.into(),
                    p.mid.into(),
                    p.a.into(),
                    p.j.into(),
                    p.c.into(),
                    p.nsm.into(),
                ],
            ),
            Property::Bush(p) => write_card("PBUSH", flag_group_fields(p.pid, &p.groups)),
            Property::BushT(p) => write_card("PBUSHT", flag_group_fields(p.pid, &p.groups)),
            Property::Elas(p) => write_card(
                "PELAS",
                vec![p.pid.into(), p.k.into(), p.ge.into(), p.s.into()],
            ),
            Property::Damp(p) => write_card("PDAMP", vec![p.pid.into(), p.b.into()]),
            Property::Gap(p) => {
                let mut fields = vec![p.pid.into()];
                fields.extend(p.rest.clone());
                write_card("PGAP", fields)
            }
            Property::Shear(p) => write_card(
                "PSHEAR",
                vec![
                    p.pid.into(),
                    p.mid.into(),
                    p.t.into(),
                    p.nsm.into(),
                    p.f1.into(),
                    p.f2.into(),
                ],
            ),
            Property::Weld(p) => {
                let mut fields = vec![p.pid.into(), p.mid.into(), p.d.into()];
                fields.extend(p.rest.clone());
                write_card("PWELD", fields)
            }
            Property::Fast(p) => {
                let mut fields = vec![p.pid.into(), p.d.into()];
                fields.extend(p.rest.clone());
                write_card("PFAST", fields)
            }
            Property::Visc(p) => {
                write_card("PVISC", vec![p.pid.into(), p.ce.into(), p.cr.into()])
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn composite_header(
    pid: u32,
    z0: Option<f64>,
    nsm: f64,
    sb: Option<f64>,
    ft: &Option<String>,
    tref: Option<f64>,
    ge: Option<f64>,
    lam: &Option<String>,
) -> Vec<Field> {
    vec![
        pid.into(),
        z0.into(),
        nsm.into(),
        sb.into(),
        ft.as_deref().into(),
        tref.into(),
        ge.into(),
        lam.as_deref().into(),
    ]
}

/// PCOMP plies are 4-wide groups; PCOMPG plies are 8-wide rows led by the
/// global ply id. A blank ply material inherits the previous ply's.
fn parse_plies(fields: &Fields, global: bool) -> Result<Vec<Ply>> {
    let mut plies: Vec<Ply> = Vec::new();
    let stride = if global { 8 } else { 4 };
    let mut index = 8;

    while index < fields.len() {
        let offset = if global { 1 } else { 0 };
        let mid = match fields.uint_opt(index + offset)? {
            Some(mid) => mid,
            None => match plies.last() {
                Some(previous) => previous.mid,
                None => return Err(fail(fields, index + offset, "ply material")),
            },
        };
        let t = match fields.real_opt(index + offset + 1)? {
            Some(t) => t,
            None => plies.last().map(|p| p.t).unwrap_or(0.0),
        };
        plies.push(Ply {
            gplyid: if global { fields.uint_opt(index)? } else { None },
            mid,
            t,
            theta: fields.real(index + offset + 2)?,
            sout: fields.string(index + offset + 3),
        });
        index += stride;
    }
    Ok(plies)
}

/// Scan `K`/`B`/`GE`/`RCV`/`M` flagged value groups
fn parse_flag_groups(fields: &Fields) -> Result<Vec<(String, Vec<Field>)>> {
    let mut groups: Vec<(String, Vec<Field>)> = Vec::new();
    for index in 1..fields.len() {
        match fields.get(index) {
            Field::Str(flag) => groups.push((flag.clone(), Vec::new())),
            field => {
                if let Some(group) = groups.last_mut() {
                    group.1.push(field.clone());
                }
            }
        }
    }
    // Trailing blanks inside a group carry no information
    for group in &mut groups {
        while group.1.last().is_some_and(Field::is_blank) {
            group.1.pop();
        }
    }
    Ok(groups)
}

/// Each group goes on its own row so the flag lands in the second field
fn flag_group_fields(pid: u32, groups: &[(String, Vec<Field>)]) -> Vec<Field> {
    let mut fields: Vec<Field> = vec![pid.into()];
    for (n, (flag, values)) in groups.iter().enumerate() {
        if n > 0 {
            // Pad to the start of the next 8-wide row
            while fields.len() % 8 != 0 {
                fields.push(Field::Blank);
            }
        }
        fields.push(flag.as_str().into());
        fields.extend(values.iter().cloned());
    }
    fields
}

/// PELAS defines up to two properties per card, PDAMP up to four
fn parse_scalar_props(name: &str, fields: &Fields) -> Result<Vec<Property>> {
    let mut props = Vec::new();
    let stride = if name == "PELAS" { 4 } else { 2 };
    let mut index = 0;
    while index < fields.len() {
        if fields.get(index).is_blank() {
            break;
        }
        props.push(match name {
            "PELAS" => Property::Elas(Pelas {
                pid: fields.uint(index)?,
                k: fields.real(index + 1)?,
                ge: fields.real_opt(index + 2)?,
                s: fields.real_opt(index + 3)?,
            }),
            _ => Property::Damp(Pdamp {
                pid: fields.uint(index)?,
                b: fields.real(index + 1)?,
            }),
        });
        index += stride;
    }
    Ok(props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    fn reparse(property: &Property) -> Property {
        let text = property.write();
        let lines: Vec<(usize, &str)> =
            text.lines().enumerate().map(|(n, l)| (n + 1, l)).collect();
        let fields = lex_card(&lines).unwrap();
        Property::parse(property.name(), &fields).unwrap().remove(0)
    }

    #[test]
    fn pshell_roundtrip() {
        let fields = lex_card(&[(1, "PSHELL         1       1   0.005")]).unwrap();
        let property = Property::parse("PSHELL", &fields).unwrap().remove(0);
        let Property::Shell(ref p) = property else {
            panic!()
        };
        assert_eq!(p.t, Some(0.005));
        assert_eq!(p.nsm, 0.0);
        assert_eq!(property, reparse(&property));
    }

    #[test]
    fn pcomp_ply_inheritance() {
        let fields = lex_card(&[
            (1, "PCOMP,100,,,,,,,SYM"),
            (2, ",201,0.125,45.,YES,,0.125,-45.,YES"),
        ])
        .unwrap();
        let property = Property::parse("PCOMP", &fields).unwrap().remove(0);
        let Property::Comp(ref p) = property else {
            panic!()
        };
        assert_eq!(p.plies.len(), 2);
        assert_eq!(p.plies[1].mid, 201);
        assert_eq!(p.plies[1].theta, -45.0);
        assert_eq!(property.thickness(), Some(0.5));
    }

    #[test]
    fn pbush_groups() {
        let fields = lex_card(&[
            (1, "PBUSH        900       K   1.0+6   1.0+6   1.0+6"),
            (2, "              GE    0.06"),
        ])
        .unwrap();
        let property = Property::parse("PBUSH", &fields).unwrap().remove(0);
        let Property::Bush(ref p) = property else {
            panic!()
        };
        assert_eq!(p.groups.len(), 2);
        assert_eq!(p.groups[0].0, "K");
        assert_eq!(p.groups[0].1.len(), 3);
        assert_eq!(property, reparse(&property));
    }

    #[test]
    fn pelas_two_per_card() {
        let fields = lex_card(&[(1, "PELAS          7   100.0                       8   200.0")]).unwrap();
        let props = Property::parse("PELAS", &fields).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props[1].pid(), 8);
    }
}
