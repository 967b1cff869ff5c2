//! Range specification
//!
//! The caller asks for new id ranges per file and family. Files are
//! named by full path or by file name; names resolve against the
//! model's include catalog. Specs are plain data and load from JSON so
//! range maps survive between sessions.

// standard library
use std::collections::BTreeMap;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};

// fetools crates
use fetools_bulk::{Family, IncludeCatalog};

// external crates
use serde::Deserialize;

/// Requested `[start, end]` id range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IdRange {
    pub start: u32,
    pub end: u32,
}

impl IdRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// How many ids fit in the range
    pub fn capacity(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    pub fn overlaps(&self, other: &IdRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Ranges for one file, keyed by family
pub type FamilyRanges = BTreeMap<Family, IdRange>;

/// The full renumber request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenumberSpec {
    /// File name or path to per-family ranges
    pub files: BTreeMap<String, FamilyRanges>,
    /// Remap spc/mpc/load set ids too; off leaves them untouched
    #[serde(default)]
    pub include_set_ids: bool,
}

impl RenumberSpec {
    /// Load a spec from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Resolve spec file names against the catalog, by full path first
    /// and file name second
    pub fn resolve(&self, catalog: &IncludeCatalog) -> Result<Vec<(usize, &FamilyRanges)>> {
        let mut resolved = Vec::new();
        for (name, ranges) in &self.files {
            let index = catalog
                .files
                .iter()
                .position(|file| file.path == Path::new(name))
                .or_else(|| {
                    let target = std::ffi::OsStr::new(name.as_str());
                    catalog
                        .files
                        .iter()
                        .position(|file| file.path.file_name() == Some(target))
                })
                .ok_or_else(|| Error::UnknownFile(name.clone()))?;
            resolved.push((index, ranges));
        }
        Ok(resolved)
    }

    /// Is this family's map wanted under the current toggle?
    pub fn family_enabled(&self, family: Family) -> bool {
        match family {
            Family::Spc | Family::Mpc | Family::Load => self.include_set_ids,
            Family::Param => false,
            _ => true,
        }
    }
}
