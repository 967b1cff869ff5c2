//! Table dispatch and decoding
//!
//! The reader walks records, treats every 8-character name record as a
//! table announcement, and decodes the families it knows. Anything else
//! is skipped record by record until the next name. Data blocks inside
//! a known table are:
//!
//! - header: packed i32 words `(subcase, n_times, n_rows, n_cols[, code])`
//! - row index: `n_rows` pairs of i32
//! - one data record per time step of `n_rows * n_cols` f32 words
//!
//! An empty record closes the table.

// standard library
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::records::{as_f32_words, as_i32_words, as_table_name, looks_like_name, RecordReader};
use crate::tables::{
    EigenMode, Eigenvalues, ElementFamily, Op2, ResultTable, StrainEnergy, VectorKind,
};

// external crates
use bincode::deserialize;
use log::{debug, warn};
use nalgebra::DMatrix;
use serde::Deserialize;

/// Read a binary result file
///
/// ```rust, no_run
/// # use fetools_op2::read_op2;
/// let op2 = read_op2("model.op2").unwrap();
/// for (subcase, modes) in &op2.eigenvalues {
///     println!("subcase {subcase}: {} modes", modes.len());
/// }
/// ```
pub fn read_op2<P: AsRef<Path>>(path: P) -> Result<Op2> {
    let mut reader = RecordReader::new(path)?;
    let mut op2 = Op2::new();

    let mut pending: Option<Vec<u8>> = None;
    loop {
        let record = match pending.take() {
            Some(record) => record,
            None => match reader.next_record()? {
                Some(record) => record,
                None => break,
            },
        };

        if !looks_like_name(&record) {
            // Stray record between tables; ignore
            continue;
        }
        let name = as_table_name(&record)?;
        debug!("table {name}");

        match name.as_str() {
            "LAMA" => parse_eigenvalues(&mut reader, &mut op2)?,
            "OUGV1" => parse_vector(&mut reader, &mut op2, VectorKind::Displacement)?,
            "OVG1" => parse_vector(&mut reader, &mut op2, VectorKind::Velocity)?,
            "OAG1" => parse_vector(&mut reader, &mut op2, VectorKind::Acceleration)?,
            "OQG1" => parse_vector(&mut reader, &mut op2, VectorKind::SpcForce)?,
            "OPG1" => parse_vector(&mut reader, &mut op2, VectorKind::LoadVector)?,
            "OES1X" => parse_element_results(&mut reader, &mut op2, false)?,
            "ONRGY1" => parse_element_results(&mut reader, &mut op2, true)?,
            "EFMFSMS" => parse_eff_mass(&mut reader, &mut op2)?,
            _ => {
                warn!("skipping unknown table {name}");
                op2.skipped_tables.push(name);
                pending = skip_table(&mut reader)?;
            }
        }
    }

    Ok(op2)
}

/// Consume records until the table's empty terminator or the next name
/// record, which is handed back to the caller
fn skip_table(reader: &mut RecordReader) -> Result<Option<Vec<u8>>> {
    while let Some(record) = reader.next_record()? {
        if record.is_empty() {
            return Ok(None);
        }
        if looks_like_name(&record) {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

/// Packed block header
#[derive(Debug, Deserialize)]
struct BlockHeader {
    subcase: i32,
    n_times: i32,
    n_rows: i32,
    n_cols: i32,
}

fn read_header(reader: &mut RecordReader, table: &str) -> Result<Option<(BlockHeader, Vec<i32>)>> {
    let Some(record) = reader.next_record()? else {
        return Ok(None);
    };
    if record.is_empty() {
        return Ok(None);
    }
    let words = as_i32_words(&record);
    if words.len() < 4 {
        return Err(Error::BinaryDecode {
            table: table.to_string(),
            detail: format!("header has {} words, expected at least 4", words.len()),
        });
    }
    let header: BlockHeader = deserialize(&record[..16])?;
    Ok(Some((header, words[4..].to_vec())))
}

/// One `(id, aux)` pair per row
fn read_index(reader: &mut RecordReader, table: &str, n_rows: usize) -> Result<Vec<(u32, u32)>> {
    let record = reader.next_record()?.ok_or(Error::EndOfFile)?;
    let words = as_i32_words(&record);
    if words.len() != 2 * n_rows {
        return Err(Error::UnexpectedRecordShape {
            table: table.to_string(),
            expected_words: 2 * n_rows,
            found_words: words.len(),
        });
    }
    Ok(words
        .chunks_exact(2)
        .map(|pair| (pair[0].max(0) as u32, pair[1].max(0) as u32))
        .collect())
}

/// One dense matrix per time step
fn read_steps(
    reader: &mut RecordReader,
    table: &str,
    n_times: usize,
    n_rows: usize,
    n_cols: usize,
) -> Result<Vec<DMatrix<f64>>> {
    let mut steps = Vec::with_capacity(n_times);
    for _ in 0..n_times {
        let record = reader.next_record()?.ok_or(Error::EndOfFile)?;
        let values = as_f32_words(&record);
        if values.len() != n_rows * n_cols {
            return Err(Error::UnexpectedRecordShape {
                table: table.to_string(),
                expected_words: n_rows * n_cols,
                found_words: values.len(),
            });
        }
        steps.push(DMatrix::from_row_slice(n_rows, n_cols, &values));
    }
    Ok(steps)
}

/// LAMA rows are 6 or 7 words; the 7-word dialect carries the extraction
/// order in the second slot
fn parse_eigenvalues(reader: &mut RecordReader, op2: &mut Op2) -> Result<()> {
    while let Some((header, _)) = read_header(reader, "LAMA")? {
        let n_modes = header.n_times.max(0) as usize;
        let record = reader.next_record()?.ok_or(Error::EndOfFile)?;
        let values = as_f32_words(&record);

        let stride = if values.len() == 7 * n_modes {
            7
        } else if values.len() == 6 * n_modes {
            6
        } else {
            return Err(Error::UnexpectedRecordShape {
                table: "LAMA".to_string(),
                expected_words: 6 * n_modes,
                found_words: values.len(),
            });
        };

        let mut table = Eigenvalues {
            subcase: header.subcase.max(0) as u32,
            modes: Vec::with_capacity(n_modes),
        };
        for row in values.chunks_exact(stride) {
            let tail = &row[stride - 5..];
            table.modes.push(EigenMode {
                mode: row[0] as u32,
                eigenvalue: tail[0],
                radians: tail[1],
                cycles: tail[2],
                generalized_mass: tail[3],
                generalized_stiffness: tail[4],
            });
        }
        op2.eigenvalues.insert(table.subcase, table);
    }
    Ok(())
}

fn parse_vector(reader: &mut RecordReader, op2: &mut Op2, kind: VectorKind) -> Result<()> {
    while let Some((header, _)) = read_header(reader, "OUG")? {
        let n_times = header.n_times.max(0) as usize;
        let n_rows = header.n_rows.max(0) as usize;
        let n_cols = header.n_cols.max(1) as usize;
        let index = read_index(reader, "OUG", n_rows)?;
        let steps = read_steps(reader, "OUG", n_times, n_rows, n_cols)?;
        op2.vectors.insert(
            (kind, header.subcase.max(0) as u32),
            ResultTable {
                subcase: header.subcase.max(0) as u32,
                index,
                steps,
            },
        );
    }
    Ok(())
}

fn parse_element_results(reader: &mut RecordReader, op2: &mut Op2, energy: bool) -> Result<()> {
    let table_name = if energy { "ONRGY1" } else { "OES1X" };
    while let Some((header, extra)) = read_header(reader, table_name)? {
        let Some(&code) = extra.first() else {
            return Err(Error::BinaryDecode {
                table: table_name.to_string(),
                detail: "missing element family code".to_string(),
            });
        };
        let Some(family) = ElementFamily::from_code(code) else {
            warn!("{table_name}: unknown element family code {code}, skipping block");
            let n_times = header.n_times.max(0) as usize;
            // Index record plus one record per step
            for _ in 0..n_times + 1 {
                reader.next_record()?.ok_or(Error::EndOfFile)?;
            }
            continue;
        };

        let n_times = header.n_times.max(0) as usize;
        let n_rows = header.n_rows.max(0) as usize;
        let n_cols = header.n_cols.max(1) as usize;
        let subcase = header.subcase.max(0) as u32;
        let index = read_index(reader, table_name, n_rows)?;
        let steps = read_steps(reader, table_name, n_times, n_rows, n_cols)?;

        let table = ResultTable {
            subcase,
            index,
            steps,
        };
        if energy {
            op2.strain_energy
                .insert((family, subcase), StrainEnergy { table });
        } else {
            op2.element_results.insert((family, subcase), table);
        }
    }
    Ok(())
}

/// Dense 6 x n_modes matrix, directions by mode
fn parse_eff_mass(reader: &mut RecordReader, op2: &mut Op2) -> Result<()> {
    while let Some((header, _)) = read_header(reader, "EFMFSMS")? {
        let n_rows = header.n_rows.max(0) as usize;
        let n_cols = header.n_cols.max(0) as usize;
        let record = reader.next_record()?.ok_or(Error::EndOfFile)?;
        let values = as_f32_words(&record);
        if values.len() != n_rows * n_cols {
            return Err(Error::UnexpectedRecordShape {
                table: "EFMFSMS".to_string(),
                expected_words: n_rows * n_cols,
                found_words: values.len(),
            });
        }
        op2.modal_effective_mass_fraction =
            Some(DMatrix::from_row_slice(n_rows, n_cols, &values));
    }
    Ok(())
}
