//! Text-only include walk and card ownership catalog
//!
//! The full parser merges every include file into one model, which loses
//! file-of-origin. This pass reads the raw text instead, mapping each
//! card's `(family, primary id)` to the file it came from so the writer
//! and the transforms can preserve the original include structure.
//!
//! The catalog never fails on an unknown card. Anything not in the
//! registry is collected as verbatim passthrough text, continuations
//! included.

// standard library
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

// crate modules
use crate::error::Result;
use crate::registry::{family, Family};

// external crates
use log::warn;
use nom::bytes::complete::{tag_no_case, take_till};
use nom::character::complete::{char, space1};
use nom::combinator::opt;
use nom::IResult;

/// Ownership record for one physical file
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Primary ids owned by this file, per family
    pub ids: HashMap<Family, BTreeSet<u32>>,
    /// Parameter names owned by this file
    pub params: BTreeSet<String>,
    /// Verbatim lines of unregistered cards, in encounter order
    pub passthrough: Vec<String>,
    /// Child include paths in encounter order
    pub includes: Vec<PathBuf>,
}

impl FileCatalog {
    /// Does this file own `(family, id)`?
    pub fn owns(&self, fam: Family, id: u32) -> bool {
        self.ids.get(&fam).is_some_and(|set| set.contains(&id))
    }

    /// (count, min, max) for one family, or `None` when empty
    pub fn span(&self, fam: Family) -> Option<(usize, u32, u32)> {
        let ids = self.ids.get(&fam)?;
        let min = *ids.first()?;
        let max = *ids.last()?;
        Some((ids.len(), min, max))
    }
}

/// Card ownership catalog for a deck and its transitive includes
///
/// Files are held in depth-first encounter order with the main file first,
/// mirroring how the solver itself reads the deck.
#[derive(Debug, Clone, Default)]
pub struct IncludeCatalog {
    /// Per-file ownership records, main file at index 0
    pub files: Vec<FileCatalog>,
}

impl IncludeCatalog {
    /// Walk `main` and every include, building the ownership catalog
    pub fn parse<P: AsRef<Path>>(main: P) -> Result<Self> {
        let mut catalog = Self::default();
        let main = absolute(main.as_ref());
        catalog.parse_file(&main, true)?;
        Ok(catalog)
    }

    /// Index of the file that owns `(family, id)`
    pub fn owner(&self, fam: Family, id: u32) -> Option<usize> {
        self.files.iter().position(|file| file.owns(fam, id))
    }

    /// Index of a file by its absolute path
    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.files.iter().position(|file| file.path == path)
    }

    fn parse_file(&mut self, path: &Path, is_main: bool) -> Result<()> {
        // A file already walked is never re-entered
        if self.index_of(path).is_some() {
            return Ok(());
        }

        let index = self.files.len();
        self.files.push(FileCatalog {
            path: path.to_path_buf(),
            ..Default::default()
        });

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                warn!("include file not found: {}", path.display());
                return Ok(());
            }
        };

        let base_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();

        // Include files start directly in bulk data
        let mut in_bulk = !is_main;
        let mut past_exec = !is_main;
        let mut in_passthrough = false;
        let mut pending_includes: Vec<PathBuf> = Vec::new();

        for raw in text.lines() {
            let stripped = raw.trim();
            let upper = stripped.to_uppercase();

            if !past_exec && upper.starts_with("CEND") {
                past_exec = true;
                continue;
            }
            if !in_bulk && upper.starts_with("BEGIN") && upper.contains("BULK") {
                in_bulk = true;
                continue;
            }
            if in_bulk && upper.starts_with("ENDDATA") {
                break;
            }

            if let Some(target) = include_path(stripped) {
                let resolved = resolve_include(&target, &base_dir);
                self.files[index].includes.push(resolved.clone());
                pending_includes.push(resolved);
                in_passthrough = false;
                continue;
            }

            if !in_bulk || stripped.is_empty() || stripped.starts_with('$') {
                continue;
            }

            let first = stripped.chars().next().unwrap();
            if first == '+' || first == '*' || !first.is_ascii_alphabetic() {
                // Continuation: ownership is inherited from the primary line
                if in_passthrough {
                    self.files[index].passthrough.push(raw.to_string());
                }
                continue;
            }

            let (name, id) = extract_card_info(stripped);
            let Some(name) = name else { continue };

            if name == "PARAM" {
                in_passthrough = false;
                if let Some(key) = param_key(stripped) {
                    self.files[index].params.insert(key);
                }
            } else if let Some(fam) = family(&name) {
                in_passthrough = false;
                if let Some(id) = id.filter(|&id| id > 0) {
                    self.files[index].ids.entry(fam).or_default().insert(id);
                }
            } else {
                in_passthrough = true;
                self.files[index].passthrough.push(raw.to_string());
            }
        }

        // Depth-first, after this file's own lines are done
        for child in pending_includes {
            self.parse_file(&child, false)?;
        }

        Ok(())
    }
}

/// Extract `(card name, primary id)` from a raw bulk data line
///
/// Handles 8-column, 16-column, and free-field forms without lexing the
/// whole card. Comments, continuations, and blank lines give `(None, _)`.
pub fn extract_card_info(line: &str) -> (Option<String>, Option<u32>) {
    let stripped = line.trim();
    if stripped.is_empty() || stripped.starts_with('$') {
        return (None, None);
    }

    let first = stripped.chars().next().unwrap();
    if first == '+' || first == '*' || !first.is_ascii_alphabetic() {
        return (None, None);
    }

    let (name, id_text) = if stripped.contains(',') {
        let mut parts = stripped.split(',');
        let name = parts.next().unwrap_or("").trim().to_uppercase();
        let id_text = parts.next().unwrap_or("").trim().to_string();
        (name, id_text)
    } else {
        let name = slice_cols(stripped, 0, 8).to_uppercase();
        let id_text = if name.ends_with('*') {
            slice_cols(stripped, 8, 24)
        } else {
            slice_cols(stripped, 8, 16)
        };
        (name, id_text)
    };

    let name = name.trim_end_matches('*').to_string();
    let id = id_text.trim().parse::<u32>().ok();
    (Some(name), id)
}

/// The parameter name of a `PARAM` line, e.g. `WTMASS`
fn param_key(line: &str) -> Option<String> {
    let key = if line.contains(',') {
        line.split(',').nth(1)?.trim().to_string()
    } else {
        slice_cols(line, 8, 16)
    };
    (!key.is_empty()).then(|| key.to_uppercase())
}

fn slice_cols(line: &str, start: usize, end: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    if start >= chars.len() {
        return String::new();
    }
    chars[start..end.min(chars.len())]
        .iter()
        .collect::<String>()
        .trim()
        .to_string()
}

/// The target of an `INCLUDE` line, quotes stripped, or `None`
pub(crate) fn include_path(line: &str) -> Option<String> {
    match include_statement(line) {
        Ok((_, path)) => Some(path),
        Err(_) => None,
    }
}

/// Case-insensitive `INCLUDE 'path'` with optional single or double quotes
fn include_statement(i: &str) -> IResult<&str, String> {
    let (i, _) = tag_no_case("INCLUDE")(i)?;
    let (i, _) = space1(i)?;
    let (i, quote) = opt(nom::character::complete::one_of("'\""))(i)?;
    match quote {
        Some(q) => {
            let (i, path) = take_till(move |c| c == q)(i)?;
            let (i, _) = char(q)(i)?;
            Ok((i, path.trim().to_string()))
        }
        None => {
            let (i, path) = take_till(|c: char| c == '\n')(i)?;
            Ok((i, path.trim().to_string()))
        }
    }
}

/// Resolve an include target relative to the including file's directory
pub(crate) fn resolve_include(target: &str, base_dir: &Path) -> PathBuf {
    let target = Path::new(target.trim().trim_matches(|c| c == '\'' || c == '"'));
    if target.is_absolute() {
        normalise(target)
    } else {
        normalise(&base_dir.join(target))
    }
}

fn absolute(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(path) => path,
        Err(_) => normalise(path),
    }
}

/// Lexical cleanup of `.` and `..` components
fn normalise(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_forms() {
        assert_eq!(include_path("INCLUDE 'sub/part.bdf'"), Some("sub/part.bdf".to_string()));
        assert_eq!(include_path("include \"part.bdf\""), Some("part.bdf".to_string()));
        assert_eq!(include_path("Include part.bdf"), Some("part.bdf".to_string()));
        assert_eq!(include_path("GRID    1"), None);
    }

    #[test]
    fn card_info_forms() {
        assert_eq!(
            extract_card_info("GRID           1       0     0.0"),
            (Some("GRID".to_string()), Some(1))
        );
        assert_eq!(
            extract_card_info("GRID, 17, , 1.0"),
            (Some("GRID".to_string()), Some(17))
        );
        assert_eq!(extract_card_info("$ comment"), (None, None));
        assert_eq!(extract_card_info("+      3.0"), (None, None));
    }

    #[test]
    fn large_field_id_column() {
        let line = format!("{:<8}{:>16}", "GRID*", "42");
        assert_eq!(extract_card_info(&line), (Some("GRID".to_string()), Some(42)));
    }
}
