//! Case control handling
//!
//! The only transform the core applies to case control is rewriting
//! integer set-id references through an active id remap. Lines are
//! parsed once with a small grammar instead of per-keyword patterns, so
//! `SPCFORCES = ALL` never matches the `SPC` keyword.

// crate modules
use crate::registry::Family;
use crate::remap::IdMaps;

// external crates
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, space0};
use nom::combinator::opt;
use nom::sequence::delimited;
use nom::IResult;

/// Case control section of the main file
#[derive(Debug, Clone, Default)]
pub struct CaseControl {
    pub lines: Vec<String>,
}

impl CaseControl {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Rewrite every id-valued keyword reference through the maps
    pub fn rewrite(&self, maps: &IdMaps) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| rewrite_line(line, maps))
            .collect()
    }
}

/// The id-valued case control keywords and the family each references
fn keyword_family(keyword: &str, options: Option<&str>) -> Option<Family> {
    let family = match keyword {
        "LOAD" | "DLOAD" | "DEFORM" => Family::Load,
        "SPC" => Family::Spc,
        "MPC" => Family::Mpc,
        "METHOD" | "CMETHOD" => Family::Method,
        "FREQ" | "TSTEP" | "SDAMP" => Family::Table,
        "SUPORT1" => Family::Set,
        "TEMPERATURE" => {
            let options = options.unwrap_or("").trim().to_uppercase();
            if options.is_empty() || options == "LOAD" || options == "INITIAL" {
                Family::Load
            } else {
                return None;
            }
        }
        _ => return None,
    };
    Some(family)
}

/// Rewrite `KEYWORD = N` / `KEYWORD(opts) = N`, preserving everything else
pub(crate) fn rewrite_line(line: &str, maps: &IdMaps) -> String {
    let Ok((value_text, (keyword, options))) = line_header(line) else {
        return line.to_string();
    };
    let Some(family) = keyword_family(&keyword.to_uppercase(), options) else {
        return line.to_string();
    };

    let digits: String = value_text
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let Ok(old_id) = digits.parse::<u32>() else {
        return line.to_string();
    };

    let new_id = maps.get(family, old_id);
    let prefix_len = line.len() - value_text.len();
    format!(
        "{}{}{}",
        &line[..prefix_len],
        new_id,
        &value_text[digits.len()..]
    )
}

/// `KEYWORD ( opts ) = ` up to the value
fn line_header(i: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (i, _) = space0(i)?;
    let (i, keyword) = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(i)?;
    let (i, _) = space0(i)?;
    let (i, options) = opt(delimited(
        char('('),
        take_while(|c: char| c != ')'),
        char(')'),
    ))(i)?;
    let (i, _) = space0(i)?;
    let (i, _) = tag("=")(i)?;
    let (i, _) = space0(i)?;
    Ok((i, (keyword, options)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maps() -> IdMaps {
        let mut maps = IdMaps::new();
        maps.spcs.insert(10, 110);
        maps.loads.insert(20, 220);
        maps.methods.insert(30, 330);
        maps
    }

    #[test]
    fn rewrites_known_keywords() {
        let maps = maps();
        assert_eq!(rewrite_line("  SPC = 10", &maps), "  SPC = 110");
        assert_eq!(rewrite_line("LOAD=20", &maps), "LOAD=220");
        assert_eq!(rewrite_line("METHOD(STRUCTURE) = 30", &maps), "METHOD(STRUCTURE) = 330");
        assert_eq!(
            rewrite_line("TEMPERATURE(LOAD) = 20", &maps),
            "TEMPERATURE(LOAD) = 220"
        );
    }

    #[test]
    fn leaves_everything_else_alone() {
        let maps = maps();
        assert_eq!(rewrite_line("SPCFORCES = ALL", &maps), "SPCFORCES = ALL");
        assert_eq!(rewrite_line("DISPLACEMENT = ALL", &maps), "DISPLACEMENT = ALL");
        assert_eq!(rewrite_line("SUBCASE 1", &maps), "SUBCASE 1");
        assert_eq!(rewrite_line("SPC = 99", &maps), "SPC = 99");
    }
}
