//! Module for renumbering bulk data decks per include file
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod mapping;
mod spec;
mod validate;

// standard library
use std::path::{Path, PathBuf};

// fetools crates
use fetools_bulk::{read_deck_with, DeckWriter, ReadOptions};

// external crates
use log::info;

// Inline anything important for a nice public API
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use spec::{FamilyRanges, IdRange, RenumberSpec};

#[doc(inline)]
pub use mapping::{build_maps, validate as validate_ranges};

#[doc(inline)]
pub use validate::post_validate;

/// Outcome of a renumber pass
#[derive(Debug, Clone, Default)]
pub struct RenumberReport {
    /// Files written, main file first
    pub written: Vec<PathBuf>,
    /// Findings from re-reading the emitted deck
    pub post_warnings: Vec<String>,
    pub post_errors: Vec<String>,
}

/// Renumber the deck at `input` into `output_dir`
///
/// Pre-validation failures reject the whole request before any card is
/// touched. After writing, the emitted main file is re-read from scratch
/// and compared against the input model; findings land in the report.
///
/// ```rust, no_run
/// # use fetools_renumber::{renumber_deck, IdRange, RenumberSpec};
/// # use fetools_bulk::Family;
/// let mut spec = RenumberSpec::default();
/// spec.files
///     .entry("main.bdf".to_string())
///     .or_default()
///     .insert(Family::Node, IdRange::new(1001, 1100));
/// let report = renumber_deck("main.bdf", "out", &spec).unwrap();
/// assert!(report.post_errors.is_empty());
/// ```
pub fn renumber_deck<P, Q>(input: P, output_dir: Q, spec: &RenumberSpec) -> Result<RenumberReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let options = ReadOptions {
        disable_progress: true,
        ..Default::default()
    };
    let mut model = read_deck_with(&input, options.clone())?;

    let resolved = spec.resolve(&model.catalog)?;
    let errors = mapping::validate(&model.catalog, &resolved, spec);
    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    let maps = mapping::build_maps(&model.catalog, &resolved, spec);
    info!(
        "renumbering {} nodes, {} elements, {} properties",
        maps.nodes.len(),
        maps.elements.len(),
        maps.properties.len()
    );

    model.apply_maps(&maps);
    let write_report = DeckWriter::with_remap(&model, &maps).write(&output_dir)?;

    // No shortcut from in-memory state: read the output back
    let mut report = RenumberReport {
        written: write_report.written,
        ..Default::default()
    };
    let main_out = report.written.first().cloned();
    if let Some(main_out) = main_out {
        let (warnings, errors) = validate::post_validate(&model, &main_out, options);
        report.post_warnings = warnings;
        report.post_errors = errors;
    }

    Ok(report)
}
