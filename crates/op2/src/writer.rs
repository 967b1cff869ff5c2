//! Summary output for decoded result files

// standard library
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::tables::{EigenMode, ElementFamily, Op2, VectorKind};

// external crates
use serde::Serialize;

/// Machine-readable overview of one result file
#[derive(Debug, Serialize)]
struct Summary {
    eigenvalues: Vec<EigenvalueBlock>,
    vectors: Vec<TableBlock<VectorKind>>,
    element_results: Vec<TableBlock<ElementFamily>>,
    strain_energy: Vec<TableBlock<ElementFamily>>,
    effective_mass_shape: Option<(usize, usize)>,
    skipped_tables: Vec<String>,
}

#[derive(Debug, Serialize)]
struct EigenvalueBlock {
    subcase: u32,
    modes: Vec<EigenMode>,
}

#[derive(Debug, Serialize)]
struct TableBlock<K> {
    kind: K,
    subcase: u32,
    shape: (usize, usize, usize),
}

/// Write a JSON summary of the decoded tables
///
/// Shapes and eigenvalues only; the dense data stays in memory for the
/// consumers that asked for it.
pub fn write_json<P: AsRef<Path>>(op2: &Op2, path: P) -> Result<()> {
    let summary = Summary {
        eigenvalues: op2
            .eigenvalues
            .values()
            .map(|table| EigenvalueBlock {
                subcase: table.subcase,
                modes: table.modes.clone(),
            })
            .collect(),
        vectors: op2
            .vectors
            .iter()
            .map(|((kind, subcase), table)| TableBlock {
                kind: *kind,
                subcase: *subcase,
                shape: table.shape(),
            })
            .collect(),
        element_results: op2
            .element_results
            .iter()
            .map(|((family, subcase), table)| TableBlock {
                kind: *family,
                subcase: *subcase,
                shape: table.shape(),
            })
            .collect(),
        strain_energy: op2
            .strain_energy
            .iter()
            .map(|((family, subcase), energy)| TableBlock {
                kind: *family,
                subcase: *subcase,
                shape: energy.table.shape(),
            })
            .collect(),
        effective_mass_shape: op2
            .modal_effective_mass_fraction
            .as_ref()
            .map(|matrix| (matrix.nrows(), matrix.ncols())),
        skipped_tables: op2.skipped_tables.clone(),
    };

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &summary)?;
    Ok(())
}
