//! Decoded result table types
//!
//! Read-only numeric containers. Consumers do all further computation.

// standard library
use std::collections::BTreeMap;

// external crates
use nalgebra::DMatrix;
use serde::Serialize;

/// One extracted eigenvalue
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EigenMode {
    pub mode: u32,
    pub eigenvalue: f64,
    pub radians: f64,
    pub cycles: f64,
    pub generalized_mass: f64,
    pub generalized_stiffness: f64,
}

/// The real eigenvalue summary of one subcase
#[derive(Debug, Clone, Default)]
pub struct Eigenvalues {
    pub subcase: u32,
    pub modes: Vec<EigenMode>,
}

impl Eigenvalues {
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Natural frequencies in Hz, one per mode
    pub fn frequencies(&self) -> Vec<f64> {
        self.modes.iter().map(|mode| mode.cycles).collect()
    }
}

/// Vector result families on grid points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum VectorKind {
    Displacement,
    Velocity,
    Acceleration,
    SpcForce,
    LoadVector,
}

/// Element result families
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ElementFamily {
    ShellStress,
    SolidStress,
    BarStress,
    BarForce,
    BeamStress,
    BeamForce,
    BushForce,
}

impl ElementFamily {
    /// Family code used in the element-result table headers
    pub(crate) fn from_code(code: i32) -> Option<Self> {
        let family = match code {
            1 => ElementFamily::ShellStress,
            2 => ElementFamily::SolidStress,
            3 => ElementFamily::BarStress,
            4 => ElementFamily::BarForce,
            5 => ElementFamily::BeamStress,
            6 => ElementFamily::BeamForce,
            7 => ElementFamily::BushForce,
            _ => return None,
        };
        Some(family)
    }
}

/// A dense per-subcase result block
///
/// `steps` holds one `n_rows x n_cols` matrix per time step; for modal
/// solutions a step is a mode. The row index pairs each row with its id
/// and an auxiliary id: `(node id, grid type)` for vector tables,
/// `(element id, node id or zero)` for element tables, where zero marks
/// the element centroid row.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    pub subcase: u32,
    pub index: Vec<(u32, u32)>,
    pub steps: Vec<DMatrix<f64>>,
}

impl ResultTable {
    /// (n_times, n_rows, n_cols)
    pub fn shape(&self) -> (usize, usize, usize) {
        let rows = self.steps.first().map(|m| m.nrows()).unwrap_or(0);
        let cols = self.steps.first().map(|m| m.ncols()).unwrap_or(0);
        (self.steps.len(), rows, cols)
    }

    /// Rows whose auxiliary id is zero report the element centroid
    pub fn is_centroid_row(&self, row: usize) -> bool {
        self.index.get(row).is_some_and(|&(_, aux)| aux == 0)
    }
}

/// Strain energy block: column 1 is percent of total
#[derive(Debug, Clone, Default)]
pub struct StrainEnergy {
    pub table: ResultTable,
}

/// Matrix-level sentinel rows use huge pseudo element ids
const SENTINEL_EID: u32 = 100_000_000;

impl StrainEnergy {
    /// Percent-of-total per element, summed nothing, sentinel rows
    /// skipped; one `(element id, per-step percents)` entry per row
    pub fn percent_of_total(&self) -> Vec<(u32, Vec<f64>)> {
        let mut out = Vec::new();
        for (row, &(eid, _)) in self.table.index.iter().enumerate() {
            if eid >= SENTINEL_EID {
                continue;
            }
            let percents = self
                .table
                .steps
                .iter()
                .map(|step| step[(row, 1)])
                .collect();
            out.push((eid, percents));
        }
        out
    }
}

/// Everything decoded from one result file
#[derive(Debug, Default)]
pub struct Op2 {
    /// Eigenvalue summaries keyed by subcase
    pub eigenvalues: BTreeMap<u32, Eigenvalues>,
    /// Vector results keyed by (kind, subcase)
    pub vectors: BTreeMap<(VectorKind, u32), ResultTable>,
    /// Element results keyed by (family, subcase)
    pub element_results: BTreeMap<(ElementFamily, u32), ResultTable>,
    /// Strain energy keyed by (family, subcase)
    pub strain_energy: BTreeMap<(ElementFamily, u32), StrainEnergy>,
    /// Modal effective mass fractions, 6 directions by n_modes
    pub modal_effective_mass_fraction: Option<DMatrix<f64>>,
    /// Names of tables that were skipped whole
    pub skipped_tables: Vec<String>,
}

impl Op2 {
    pub fn new() -> Self {
        Default::default()
    }

    /// The eigenvector table of a subcase, if present
    pub fn eigenvectors(&self, subcase: u32) -> Option<&ResultTable> {
        self.vectors.get(&(VectorKind::Displacement, subcase))
    }
}
