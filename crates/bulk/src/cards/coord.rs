//! Coordinate system cards
//!
//! Type-1 systems anchor on three grid points; type-2 systems carry three
//! explicit points in a reference frame. Id 0 is the basic frame and never
//! appears as a card.

use crate::cards::{fail, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

use nalgebra::{Matrix3, Vector3};

/// Geometry kind of a coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordKind {
    Rectangular,
    Cylindrical,
    Spherical,
}

/// How the frame is anchored
#[derive(Debug, Clone, PartialEq)]
pub enum CoordDef {
    /// CORD1R/C/S: three grid points
    Points { g1: u32, g2: u32, g3: u32 },
    /// CORD2R/C/S: origin A, z-axis point B, xz-plane point C in frame `rid`
    Frame {
        rid: u32,
        a: [f64; 3],
        b: [f64; 3],
        c: [f64; 3],
    },
}

/// One coordinate system card
#[derive(Debug, Clone, PartialEq)]
pub struct Coord {
    pub cid: u32,
    pub kind: CoordKind,
    pub def: CoordDef,
}

impl Coord {
    pub fn name(&self) -> &'static str {
        match (&self.def, self.kind) {
            (CoordDef::Points { .. }, CoordKind::Rectangular) => "CORD1R",
            (CoordDef::Points { .. }, CoordKind::Cylindrical) => "CORD1C",
            (CoordDef::Points { .. }, CoordKind::Spherical) => "CORD1S",
            (CoordDef::Frame { .. }, CoordKind::Rectangular) => "CORD2R",
            (CoordDef::Frame { .. }, CoordKind::Cylindrical) => "CORD2C",
            (CoordDef::Frame { .. }, CoordKind::Spherical) => "CORD2S",
        }
    }

    /// Reference coordinate id of a type-2 system
    pub fn rid(&self) -> Option<u32> {
        match &self.def {
            CoordDef::Frame { rid, .. } => Some(*rid),
            CoordDef::Points { .. } => None,
        }
    }

    /// Origin and rotation matrix of a type-2 system, columns = local axes
    ///
    /// Anchors are taken as already being in the basic frame; chained
    /// reference systems resolve through the store, not here. Degenerate
    /// anchor points give `None`.
    pub fn axes(&self) -> Option<(Vector3<f64>, Matrix3<f64>)> {
        let CoordDef::Frame { a, b, c, .. } = &self.def else {
            return None;
        };
        let origin = Vector3::from(*a);
        let z = (Vector3::from(*b) - origin).normalize();
        let in_plane = Vector3::from(*c) - origin;
        let y = z.cross(&in_plane);
        if !y.norm().is_normal() {
            return None;
        }
        let y = y.normalize();
        let x = y.cross(&z);
        Some((origin, Matrix3::from_columns(&[x, y, z])))
    }

    /// A CORD1 card defines up to two systems; CORD2 exactly one
    pub(crate) fn parse(name: &str, fields: &Fields) -> Result<Vec<Self>> {
        let kind = match name {
            "CORD1R" | "CORD2R" => CoordKind::Rectangular,
            "CORD1C" | "CORD2C" => CoordKind::Cylindrical,
            "CORD1S" | "CORD2S" => CoordKind::Spherical,
            _ => return Err(fail(fields, 0, "coordinate card")),
        };

        if name.starts_with("CORD1") {
            let mut coords = vec![Self {
                cid: fields.uint(0)?,
                kind,
                def: CoordDef::Points {
                    g1: fields.uint(1)?,
                    g2: fields.uint(2)?,
                    g3: fields.uint(3)?,
                },
            }];
            if !fields.get(4).is_blank() {
                coords.push(Self {
                    cid: fields.uint(4)?,
                    kind,
                    def: CoordDef::Points {
                        g1: fields.uint(5)?,
                        g2: fields.uint(6)?,
                        g3: fields.uint(7)?,
                    },
                });
            }
            return Ok(coords);
        }

        Ok(vec![Self {
            cid: fields.uint(0)?,
            kind,
            def: CoordDef::Frame {
                rid: fields.uint_opt(1)?.unwrap_or(0),
                a: [fields.real(2)?, fields.real(3)?, fields.real(4)?],
                b: [fields.real(5)?, fields.real(6)?, fields.real(7)?],
                c: [fields.real(8)?, fields.real(9)?, fields.real(10)?],
            },
        }])
    }

    pub fn write(&self) -> String {
        match &self.def {
            CoordDef::Points { g1, g2, g3 } => write_card(
                self.name(),
                vec![self.cid.into(), (*g1).into(), (*g2).into(), (*g3).into()],
            ),
            CoordDef::Frame { rid, a, b, c } => {
                let rid = if *rid == 0 {
                    Field::Blank
                } else {
                    Field::from(*rid)
                };
                write_card(
                    self.name(),
                    vec![
                        self.cid.into(),
                        rid,
                        a[0].into(),
                        a[1].into(),
                        a[2].into(),
                        b[0].into(),
                        b[1].into(),
                        b[2].into(),
                        c[0].into(),
                        c[1].into(),
                        c[2].into(),
                    ],
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    #[test]
    fn cord2r_roundtrip() {
        let fields = lex_card(&[
            (1, "CORD2R         5              0.      0.      0.      0.      0.      1."),
            (2, "              1.      0.      0."),
        ])
        .unwrap();
        let coords = Coord::parse("CORD2R", &fields).unwrap();
        assert_eq!(coords.len(), 1);
        assert_eq!(coords[0].cid, 5);

        let (origin, axes) = coords[0].axes().unwrap();
        assert_eq!(origin, Vector3::zeros());
        assert!((axes.column(0) - Vector3::x()).norm() < 1e-12);
    }

    #[test]
    fn cord1r_pair() {
        let fields = lex_card(&[(1, "CORD1R        11       1       2       3      12       4       5       6")]).unwrap();
        let coords = Coord::parse("CORD1R", &fields).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1].cid, 12);
    }
}
