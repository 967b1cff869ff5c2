//! Typed card definitions for every registered bulk data card
//!
//! Each family is a tagged variant enum over plain-data structs. Cards
//! always hold integer ids, never references; resolution lives in the
//! `Xref` view. Parsers take the lexed [Fields](crate::Fields) of one
//! logical card and writers emit canonical 8-column small-field text.
//!
//! Very wide cards keep their essential slots as named fields and carry
//! any trailing body verbatim in a `rest` vector, which round-trips
//! without the writer having to understand every station of a PBEAM.

// crate modules
use crate::error::{Error, Result};
use crate::field::{Field, Fields};

// external crates
use fetools_utils::FieldExt;

// Card modules
mod constraint;
mod contact;
mod coord;
mod element;
mod load;
mod mass;
mod material;
mod misc;
mod node;
mod property;
mod rigid;

// Flatten
pub use constraint::{Mpc, MpcAdd, MpcCard, MpcTerm, Spc, Spc1, SpcAdd, SpcCard, SpcEntry};
pub use contact::{
    Bcbody, Bconp, Bctadd, Bctpara, Bctparm, Bctset, BctsetRow, Bfric, Blseg, Bsurf, Bsurfs,
    Contact,
};
pub use coord::{Coord, CoordDef, CoordKind};
pub use element::{
    Bar, Bush, BushOrient, Conrod, Damper, DamperKind, Element, Fast, Gap, HeatBoundary,
    Orientation, Plotel, Rod, ShearPanel, Shell, ShellKind, Solid, SolidKind, Spring, SpringKind,
    Visc, Weld,
};
pub use load::{
    Combo, Darea, Dload, Force, Grav, Load, Moment, Pload, Pload2, Pload4, Rforce, Rload1,
    Rload2, Temp, Tempd, Tload1, Tload2,
};
pub use mass::{Cmass1, Cmass2, Cmass3, Cmass4, Conm1, Conm2, MassElement};
pub use material::{Mat1, Mat2, Mat8, Mat9, Mat10, Material};
pub use misc::{Eigr, Eigrl, Method, Param, Set, Set1, Set3, Tabled1, Tablem1, TableCard};
pub use node::{Grid, Node, Spoint};
pub use rigid::{Rbar, Rbe2, Rbe3, Rbe3Group, RigidElement};
pub use property::{
    Pbar, Pbarl, Pbeam, Pbeaml, Pbush, Pbusht, Pcomp, Pcompg, Pdamp, Pelas, Pfast, Pgap,
    Plsolid, Ply, Prod, Property, Pshear, Pshell, Psolid, Pvisc, Pweld,
};

/// Shell material orientation: a real angle or an integer coordinate id
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThetaMcid {
    /// Material angle in degrees
    Angle(f64),
    /// Material coordinate system id
    Cid(u32),
}

impl ThetaMcid {
    pub(crate) fn parse(fields: &Fields, index: usize) -> Result<Option<Self>> {
        match fields.get(index) {
            Field::Blank => Ok(None),
            Field::Int(cid) if *cid >= 0 => Ok(Some(ThetaMcid::Cid(*cid as u32))),
            Field::Real(theta) => Ok(Some(ThetaMcid::Angle(*theta))),
            _ => Err(Error::UnexpectedField {
                card: fields.name.clone(),
                id: fields.id(),
                index,
                expected: "angle or coordinate id",
                found: format!("{:?}", fields.get(index)),
            }),
        }
    }

    pub(crate) fn field(this: &Option<Self>) -> Field {
        match this {
            None => Field::Blank,
            Some(ThetaMcid::Angle(theta)) => Field::Real(*theta),
            Some(ThetaMcid::Cid(cid)) => Field::Int(*cid as i64),
        }
    }
}

// ! ------------------------------------------------------------------------
// !                         Field conversion helpers
// ! ------------------------------------------------------------------------

impl From<u32> for Field {
    fn from(value: u32) -> Self {
        Field::Int(value as i64)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Int(value)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Real(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Field::Blank
        } else {
            Field::Str(value.to_uppercase())
        }
    }
}

impl<T> From<Option<T>> for Field
where
    Field: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Field::Blank,
        }
    }
}

/// A component mask field: the empty mask is a blank slot
pub(crate) fn dof_field(mask: &str) -> Field {
    if mask.is_empty() {
        Field::Blank
    } else {
        Field::Int(mask.parse::<i64>().unwrap_or(0))
    }
}

// ! ------------------------------------------------------------------------
// !                           Card serialisation
// ! ------------------------------------------------------------------------

/// Serialise one card into canonical 8-column small-field lines
///
/// Integers and reals are right-justified, character fields left-justified,
/// and continuations are implicit (blank labels). Trailing blank rows are
/// dropped.
pub(crate) fn write_card(name: &str, fields: Vec<Field>) -> String {
    let mut rows: Vec<&[Field]> = fields.chunks(8).collect();
    while rows.last().is_some_and(|row| row.iter().all(Field::is_blank)) {
        rows.pop();
    }

    let mut out = String::new();
    if rows.is_empty() {
        out.push_str(name);
        out.push('\n');
        return out;
    }

    for (n, row) in rows.iter().enumerate() {
        let lead = if n == 0 { name } else { "" };
        let mut line = format!("{lead:<8}");
        for field in *row {
            line.push_str(&format_field(field));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn format_field(field: &Field) -> String {
    match field {
        Field::Blank => " ".repeat(8),
        Field::Int(value) => format!("{value:>8}"),
        Field::Real(value) => format!("{:>8}", value.field8()),
        Field::Str(text) => format!("{text:<8}"),
    }
}

/// Expand `A THRU B` ranges while collecting an id list
///
/// Used by the cards whose bodies are open-ended id lists (SPC1, SET1,
/// PLOAD2, BSURF). Blanks are skipped; anything else is an error.
pub(crate) fn expand_id_list(fields: &Fields, start: usize) -> Result<Vec<u32>> {
    let mut ids: Vec<u32> = Vec::new();
    let mut pending_thru = false;

    for index in start..fields.len() {
        match fields.get(index) {
            Field::Blank => continue,
            Field::Int(value) if *value > 0 => {
                let value = *value as u32;
                if pending_thru {
                    let from = *ids.last().unwrap_or(&value);
                    ids.extend(from + 1..=value);
                    pending_thru = false;
                } else {
                    ids.push(value);
                }
            }
            Field::Str(text) if text == "THRU" && !ids.is_empty() => pending_thru = true,
            Field::Str(text) if text == "BY" || text == "EXCEPT" => {
                // Strided and exception lists are rare enough to reject
                return Err(fail(fields, index, "plain id or THRU"));
            }
            _ => return Err(fail(fields, index, "id list")),
        }
    }
    Ok(ids)
}

pub(crate) fn fail(fields: &Fields, index: usize, expected: &'static str) -> Error {
    Error::UnexpectedField {
        card: fields.name.clone(),
        id: fields.id(),
        index,
        expected,
        found: format!("{:?}", fields.get(index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialise_small_field() {
        let text = write_card(
            "GRID",
            vec![
                1u32.into(),
                Field::Blank,
                0.0.into(),
                1.5.into(),
                (-2.0).into(),
            ],
        );
        assert_eq!(text, "GRID           1              0.     1.5     -2.\n");
    }

    #[test]
    fn serialise_continuation() {
        let fields: Vec<Field> = (1..=10u32).map(Field::from).collect();
        let text = write_card("SPC1", fields);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("        "));
        assert!(lines[1].ends_with("10"));
    }

    #[test]
    fn thru_expansion() {
        let fields = Fields::new(
            "SET1",
            vec![
                Field::Int(5),
                Field::Int(1),
                Field::Str("THRU".to_string()),
                Field::Int(4),
                Field::Int(9),
            ],
        );
        assert_eq!(expand_id_list(&fields, 1).unwrap(), vec![1, 2, 3, 4, 9]);
    }
}
