//! Module for partitioning bulk data decks
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod graph;
mod parts;
mod writer;

// standard library
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// fetools crates
use fetools_bulk::{read_deck_with, ReadOptions};

// external crates
use log::info;
use serde::Serialize;

// Inline anything important for a nice public API
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use graph::{detect_chains, flood_fill, Adjacency, Chain, Walls};

#[doc(inline)]
pub use parts::{merge_parts, partition_model, ContactPair, Joint, Part, Partition};

#[doc(inline)]
pub use writer::{write_partition, WriteCounts};

/// Outcome of a full partition pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct PartitionReport {
    pub counts: WriteCounts,
    #[serde(skip)]
    pub written: Vec<PathBuf>,
    pub part_names: Vec<String>,
    pub joint_count: usize,
    pub warnings: Vec<String>,
}

/// Partition the deck at `input` into `output_dir`
///
/// An optional merge set fuses the named parts before emission. Returns
/// the coverage counts plus the written file list, master file first.
pub fn partition_deck<P, Q>(
    input: P,
    output_dir: Q,
    merge: Option<&BTreeSet<u32>>,
) -> Result<PartitionReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let model = read_deck_with(
        &input,
        ReadOptions {
            disable_progress: true,
            ..Default::default()
        },
    )?;
    if model.elements.is_empty() {
        return Err(Error::EmptyModel);
    }

    let mut partition = parts::partition_model(&model);
    info!(
        "{} parts, {} joints, {} warnings",
        partition.parts.len(),
        partition.joints.len(),
        partition.warnings.len()
    );

    if let Some(merge) = merge {
        for id in merge {
            if partition.part(*id).is_none() {
                return Err(Error::UnknownPart(*id));
            }
        }
        parts::merge_parts(&mut partition, merge);
    }

    let (counts, written) = writer::write_partition(&model, &partition, output_dir.as_ref())?;

    Ok(PartitionReport {
        counts,
        written,
        part_names: partition.parts.iter().map(|p| p.name.clone()).collect(),
        joint_count: partition.joints.len(),
        warnings: partition.warnings.clone(),
    })
}

/// Serialise a report to JSON for downstream tooling
pub fn write_report_json(report: &PartitionReport, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(report)?;
    std::fs::write(path, text)?;
    Ok(())
}
