//! Module for per-include-file mass scaling
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod groups;
mod rewrite;
mod summary;

// standard library
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

// fetools crates
use fetools_bulk::cards::Element;
use fetools_bulk::{read_deck_with, Model, ReadOptions};

// external crates
use log::{debug, info};
use serde::Deserialize;

// Inline anything important for a nice public API
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use groups::{build_groups, ScaleGroup};

#[doc(inline)]
pub use rewrite::{rewrite_text, ScaledLookup};

/// Where the scaled files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// `model.bdf` becomes `model<suffix>.bdf` beside the original
    Suffix(String),
    /// The include tree is mirrored under a new directory
    Directory(PathBuf),
    /// Scaled files replace the originals
    Overwrite,
}

/// Scale factors keyed by catalog file index
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScaleSpec {
    pub scales: BTreeMap<usize, f64>,
}

impl ScaleSpec {
    pub fn factor(&self, file: usize) -> f64 {
        self.scales.get(&file).copied().unwrap_or(1.0)
    }
}

/// Outcome of a scale pass
#[derive(Debug, Clone, Default)]
pub struct ScaleReport {
    /// (file index, output path) for every rewritten file
    pub written: Vec<(usize, PathBuf)>,
    /// Path of the markdown summary
    pub summary: Option<PathBuf>,
    /// Per-file groups, for callers that want the breakdown
    pub groups: Vec<ScaleGroup>,
}

/// Scale the deck at `input` and write per `mode`
///
/// A factor of 1.0 leaves the file completely untouched; files are
/// rewritten line by line so everything outside the scaled cards is
/// byte-identical to the input.
pub fn scale_deck<P: AsRef<Path>>(
    input: P,
    mode: &OutputMode,
    spec: &ScaleSpec,
) -> Result<ScaleReport> {
    for (file, factor) in &spec.scales {
        if !factor.is_finite() {
            return Err(Error::BadFactor {
                file: *file,
                factor: *factor,
            });
        }
    }

    let mut model = read_deck_with(
        &input,
        ReadOptions {
            disable_progress: true,
            ..Default::default()
        },
    )?;

    let file_count = model.catalog.files.len();
    if let Some(bad) = spec.scales.keys().find(|&&file| file >= file_count) {
        return Err(Error::UnknownFile(*bad));
    }

    let groups = groups::build_groups(&model);
    let scales: Vec<(usize, f64)> = (0..file_count).map(|f| (f, spec.factor(f))).collect();

    // Mutate the model first, then serialise replacements per file
    for group in &groups {
        let factor = spec.factor(group.file);
        if factor != 1.0 {
            info!("scaling {} by {factor}", group.filename);
            groups::apply_scale(&mut model, group, factor);
        }
    }

    let out_paths = output_paths(&model, mode)?;
    let mut report = ScaleReport {
        groups: groups.clone(),
        ..Default::default()
    };

    for group in &groups {
        let factor = spec.factor(group.file);
        if factor == 1.0 {
            continue;
        }
        let in_path = model.catalog.files[group.file].path.clone();
        if !in_path.is_file() {
            continue;
        }

        let lookup = build_lookup(&model, group);
        let text = fs::read_to_string(&in_path)?;
        let rewritten = rewrite::rewrite_text(&text, &lookup, group.file == 0);

        let out_path = &out_paths[group.file];
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(out_path, rewritten)?;
        debug!("rewrote {}", out_path.display());
        report.written.push((group.file, out_path.clone()));
    }

    if !report.written.is_empty() {
        let summary_dir = input
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let summary_path = match mode {
            OutputMode::Directory(dir) => dir.join("scale_summary.md"),
            _ => summary_dir.join("scale_summary.md"),
        };
        let text = summary::render(
            input.as_ref(),
            model.wtmass(),
            &groups,
            &scales,
            &report.written,
        );
        fs::write(&summary_path, text)?;
        report.summary = Some(summary_path);
    }

    Ok(report)
}

/// Replacement text for every scaled card of one group
fn build_lookup(model: &Model, group: &ScaleGroup) -> ScaledLookup {
    let mut lookup = HashMap::new();

    for mid in &group.material_ids {
        if let Some(material) = model.materials.get(mid) {
            lookup.insert((material.name().to_string(), *mid), material.write());
        }
    }
    for pid in &group.property_ids {
        if let Some(property) = model.properties.get(pid) {
            lookup.insert((property.name().to_string(), *pid), property.write());
        }
    }
    for eid in &group.mass_elem_ids {
        if let Some(mass) = model.masses.get(eid) {
            lookup.insert((mass.name().to_string(), *eid), mass.write());
        }
    }
    for eid in &group.conrod_ids {
        if let Some(element @ Element::Conrod(_)) = model.elements.get(eid) {
            lookup.insert(("CONROD".to_string(), *eid), element.write());
        }
    }

    lookup
}

/// One output path per catalogued file, depending on the mode
fn output_paths(model: &Model, mode: &OutputMode) -> Result<Vec<PathBuf>> {
    let files = &model.catalog.files;
    let main_dir = files[0]
        .path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let paths = files
        .iter()
        .map(|file| match mode {
            OutputMode::Overwrite => file.path.clone(),
            OutputMode::Suffix(suffix) => {
                let stem = file
                    .path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                let ext = file
                    .path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                file.path
                    .parent()
                    .unwrap_or(Path::new(""))
                    .join(format!("{stem}{suffix}{ext}"))
            }
            OutputMode::Directory(dir) => {
                let rel = file
                    .path
                    .strip_prefix(&main_dir)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| {
                        PathBuf::from(file.path.file_name().unwrap_or_default())
                    });
                dir.join(rel)
            }
        })
        .collect();
    Ok(paths)
}
