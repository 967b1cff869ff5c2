//! Grid and scalar point cards

use crate::cards::{dof_field, write_card};
use crate::error::Result;
use crate::field::{Field, Fields};

/// A node: either a grid point or a scalar point
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Grid(Grid),
    Spoint(Spoint),
}

/// GRID: a structural grid point
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub nid: u32,
    /// Input coordinate system for the position
    pub cp: Option<u32>,
    pub xyz: [f64; 3],
    /// Displacement output coordinate system
    pub cd: Option<u32>,
    /// Permanent single-point constraint components
    pub ps: String,
    pub seid: Option<u32>,
}

/// SPOINT: a scalar point
///
/// One card can define many scalar points; the parser expands each id to
/// its own entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Spoint {
    pub nid: u32,
}

impl Node {
    pub fn nid(&self) -> u32 {
        match self {
            Node::Grid(grid) => grid.nid,
            Node::Spoint(spoint) => spoint.nid,
        }
    }

    pub fn set_nid(&mut self, nid: u32) {
        match self {
            Node::Grid(grid) => grid.nid = nid,
            Node::Spoint(spoint) => spoint.nid = nid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Node::Grid(_) => "GRID",
            Node::Spoint(_) => "SPOINT",
        }
    }

    /// Position of a grid point; scalar points have none
    pub fn xyz(&self) -> Option<[f64; 3]> {
        match self {
            Node::Grid(grid) => Some(grid.xyz),
            Node::Spoint(_) => None,
        }
    }

    pub fn write(&self) -> String {
        match self {
            Node::Grid(grid) => write_card(
                "GRID",
                vec![
                    grid.nid.into(),
                    grid.cp.into(),
                    grid.xyz[0].into(),
                    grid.xyz[1].into(),
                    grid.xyz[2].into(),
                    grid.cd.into(),
                    dof_field(&grid.ps),
                    grid.seid.into(),
                ],
            ),
            Node::Spoint(spoint) => write_card("SPOINT", vec![spoint.nid.into()]),
        }
    }
}

impl Grid {
    pub(crate) fn parse(fields: &Fields) -> Result<Self> {
        Ok(Self {
            nid: fields.uint(0)?,
            cp: fields.uint_opt(1)?,
            xyz: [fields.real(2)?, fields.real(3)?, fields.real(4)?],
            cd: fields.uint_opt(5)?,
            ps: fields.dof(6)?,
            seid: fields.uint_opt(7)?,
        })
    }
}

impl Spoint {
    /// One SPOINT card may list several ids (THRU accepted)
    pub(crate) fn parse(fields: &Fields) -> Result<Vec<Self>> {
        let ids = crate::cards::expand_id_list(fields, 0)?;
        Ok(ids.into_iter().map(|nid| Spoint { nid }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::lex_card;

    #[test]
    fn grid_roundtrip() {
        let fields = lex_card(&[(1, "GRID          42       0     1.5    -2.0     0.0")]).unwrap();
        let grid = Grid::parse(&fields).unwrap();
        assert_eq!(grid.nid, 42);
        assert_eq!(grid.cp, Some(0));
        assert_eq!(grid.xyz, [1.5, -2.0, 0.0]);

        let text = Node::Grid(grid.clone()).write();
        let reparsed = Grid::parse(&lex_card(&[(1, text.trim_end())]).unwrap()).unwrap();
        assert_eq!(grid, reparsed);
    }

    #[test]
    fn spoint_expansion() {
        let fields = lex_card(&[(1, "SPOINT       101    THRU     104")]).unwrap();
        let spoints = Spoint::parse(&fields).unwrap();
        assert_eq!(spoints.len(), 4);
        assert_eq!(spoints[3].nid, 104);
    }
}
