//! Static registry of known bulk data cards
//!
//! One process-lifetime table maps every supported card name onto the
//! entity family that owns its primary id. The writer ordering groups and
//! the case control keyword table live here too, so there is exactly one
//! place that enumerates what the toolkit understands.

use serde::{Deserialize, Serialize};

/// The twelve top-level id families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Family {
    /// Grid points and scalar points
    Node,
    /// Structural, rigid, and mass elements (one shared id space)
    Element,
    /// Element properties
    Property,
    /// Materials
    Material,
    /// Coordinate systems
    Coord,
    /// Single-point constraint sets
    Spc,
    /// Multi-point constraint sets
    Mpc,
    /// Static and dynamic load sets
    Load,
    /// Contact surfaces, sets, and parameters
    Contact,
    /// Generic id sets
    Set,
    /// Eigensolution methods
    Method,
    /// Lookup tables
    Table,
    /// Parameters, keyed by name rather than id
    Param,
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Family::Node => "node",
            Family::Element => "element",
            Family::Property => "property",
            Family::Material => "material",
            Family::Coord => "coord",
            Family::Spc => "spc",
            Family::Mpc => "mpc",
            Family::Load => "load",
            Family::Contact => "contact",
            Family::Set => "set",
            Family::Method => "method",
            Family::Table => "table",
            Family::Param => "param",
        };
        write!(f, "{label}")
    }
}

/// Entity family for a card name, or `None` for an unregistered card
///
/// Unregistered cards are passed through as verbatim text everywhere.
pub fn family(name: &str) -> Option<Family> {
    let family = match name {
        "GRID" | "SPOINT" => Family::Node,

        "CQUAD4" | "CQUAD8" | "CQUADR" | "CTRIA3" | "CTRIA6" | "CTRIAR" | "CHEXA" | "CPENTA"
        | "CTETRA" | "CBAR" | "CBEAM" | "CROD" | "CONROD" | "CBUSH" | "CELAS1" | "CELAS2"
        | "CELAS3" | "CELAS4" | "CDAMP1" | "CDAMP2" | "CDAMP3" | "CDAMP4" | "CGAP" | "CSHEAR"
        | "CWELD" | "CFAST" | "CVISC" | "PLOTEL" | "CHBDYG" | "CHBDYE" | "RBE2" | "RBE3"
        | "RBAR" | "CONM1" | "CONM2" | "CMASS1" | "CMASS2" | "CMASS3" | "CMASS4" => {
            Family::Element
        }

        "PSHELL" | "PCOMP" | "PCOMPG" | "PSOLID" | "PLSOLID" | "PBAR" | "PBARL" | "PBEAM"
        | "PBEAML" | "PROD" | "PBUSH" | "PBUSHT" | "PELAS" | "PDAMP" | "PGAP" | "PSHEAR"
        | "PWELD" | "PFAST" | "PVISC" => Family::Property,

        "MAT1" | "MAT2" | "MAT8" | "MAT9" | "MAT10" => Family::Material,

        "CORD1R" | "CORD1C" | "CORD1S" | "CORD2R" | "CORD2C" | "CORD2S" => Family::Coord,

        "SPC" | "SPC1" | "SPCADD" => Family::Spc,
        "MPC" | "MPCADD" => Family::Mpc,

        "FORCE" | "MOMENT" | "PLOAD" | "PLOAD2" | "PLOAD4" | "GRAV" | "LOAD" | "RFORCE"
        | "TEMP" | "TEMPD" | "RLOAD1" | "RLOAD2" | "TLOAD1" | "TLOAD2" | "DAREA" | "DLOAD" => {
            Family::Load
        }

        "BSURF" | "BSURFS" | "BCTSET" | "BCTADD" | "BCONP" | "BCBODY" | "BCTPARA" | "BCTPARM"
        | "BLSEG" | "BFRIC" => Family::Contact,

        "SET1" | "SET3" => Family::Set,
        "EIGRL" | "EIGR" => Family::Method,
        "TABLED1" | "TABLEM1" => Family::Table,
        "PARAM" => Family::Param,

        _ => return None,
    };
    Some(family)
}

/// Canonical writer emission order
///
/// Cards are written per file group by group: coords, nodes, structural
/// elements, rigid elements, mass elements, properties, materials, loads,
/// load combinations, dynamic loads, constraints, contact, sets, methods,
/// tables. Parameters and passthrough text follow.
pub(crate) const WRITE_ORDER: &[&[&str]] = &[
    &["CORD2R", "CORD2C", "CORD2S", "CORD1R", "CORD1C", "CORD1S"],
    &["GRID", "SPOINT"],
    &[
        "CHEXA", "CPENTA", "CTETRA", "CQUAD4", "CQUAD8", "CTRIA3", "CTRIA6", "CQUADR", "CTRIAR",
        "CSHEAR", "CBAR", "CBEAM", "CROD", "CONROD", "CBUSH", "CELAS1", "CELAS2", "CELAS3",
        "CELAS4", "CDAMP1", "CDAMP2", "CDAMP3", "CDAMP4", "CGAP", "CWELD", "CFAST", "CVISC",
        "PLOTEL", "CHBDYG", "CHBDYE",
    ],
    &["RBE2", "RBE3", "RBAR"],
    &["CONM1", "CONM2", "CMASS1", "CMASS2", "CMASS3", "CMASS4"],
    &[
        "PSHELL", "PCOMP", "PCOMPG", "PSOLID", "PLSOLID", "PBAR", "PBARL", "PBEAM", "PBEAML",
        "PROD", "PBUSH", "PBUSHT", "PELAS", "PDAMP", "PGAP", "PSHEAR", "PWELD", "PFAST", "PVISC",
    ],
    &["MAT1", "MAT2", "MAT8", "MAT9", "MAT10"],
    &[
        "FORCE", "MOMENT", "PLOAD", "PLOAD2", "PLOAD4", "GRAV", "RFORCE", "TEMP", "TEMPD",
        "DAREA",
    ],
    &["LOAD", "DLOAD"],
    &["RLOAD1", "RLOAD2", "TLOAD1", "TLOAD2"],
    &["SPC", "SPC1", "SPCADD", "MPC", "MPCADD"],
    &[
        "BSURF", "BSURFS", "BCTSET", "BCTADD", "BCONP", "BCBODY", "BCTPARA", "BCTPARM", "BLSEG",
        "BFRIC",
    ],
    &["SET1", "SET3"],
    &["EIGRL", "EIGR"],
    &["TABLED1", "TABLEM1"],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_order_is_registered() {
        for group in WRITE_ORDER {
            for name in *group {
                assert!(family(name).is_some(), "{name} missing from registry");
            }
        }
    }

    #[test]
    fn families() {
        assert_eq!(family("CONROD"), Some(Family::Element));
        assert_eq!(family("RBE2"), Some(Family::Element));
        assert_eq!(family("PBUSH"), Some(Family::Property));
        assert_eq!(family("BCPROPS"), None);
    }
}
