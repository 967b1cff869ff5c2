//! Integration test: a SOL 103 style result file built record by record

use assert_fs::prelude::*;
use assert_fs::TempDir;
use fetools_op2::{read_op2, VectorKind};

/// Frame a payload as a Fortran record: length bookends either side
fn record(payload: &[u8]) -> Vec<u8> {
    let length = (payload.len() as i32).to_le_bytes();
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(&length);
    out.extend_from_slice(payload);
    out.extend_from_slice(&length);
    out
}

fn i32_words(words: &[i32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

fn f32_words(words: &[f32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Three modes over ten grid points, with effective mass fractions
fn build_sol103() -> Vec<u8> {
    let mut file = Vec::new();

    // An unknown geometry table the reader must skip
    file.extend(record(b"GEOM1   "));
    file.extend(record(&i32_words(&[42, 0, 0, 0])));
    file.extend(record(&[]));

    // LAMA, 7-word dialect rows
    file.extend(record(b"LAMA    "));
    file.extend(record(&i32_words(&[1, 3, 0, 0])));
    let mut lama = Vec::new();
    for (n, cycles) in [(1, 10.0f32), (2, 25.0), (3, 40.0)] {
        let radians = cycles * std::f32::consts::TAU;
        lama.extend([
            n as f32,
            n as f32,
            radians * radians,
            radians,
            cycles,
            1.0,
            radians * radians,
        ]);
    }
    file.extend(record(&f32_words(&lama)));
    file.extend(record(&[]));

    // Eigenvectors: 3 modes x 10 nodes x 6 components
    file.extend(record(b"OUGV1   "));
    file.extend(record(&i32_words(&[1, 3, 10, 6])));
    let index: Vec<i32> = (1..=10).flat_map(|nid| [nid, 1]).collect();
    file.extend(record(&i32_words(&index)));
    for mode in 0..3 {
        let step: Vec<f32> = (0..60).map(|n| (mode * 60 + n) as f32 * 0.01).collect();
        file.extend(record(&f32_words(&step)));
    }
    file.extend(record(&[]));

    // Effective mass fractions: 6 directions x 3 modes
    file.extend(record(b"EFMFSMS "));
    file.extend(record(&i32_words(&[1, 3, 6, 3])));
    let fractions: Vec<f32> = std::iter::repeat([0.5f32, 0.3, 0.1])
        .take(6)
        .flatten()
        .collect();
    file.extend(record(&f32_words(&fractions)));
    file.extend(record(&[]));

    file
}

#[test]
fn modal_results() {
    let temp = TempDir::new().unwrap();
    let path = temp.child("model.op2");
    path.write_binary(&build_sol103()).unwrap();

    let op2 = read_op2(path.path()).unwrap();

    // Eigenvalue table
    let modes = op2.eigenvalues.get(&1).expect("subcase 1");
    assert_eq!(modes.len(), 3);
    assert_eq!(modes.frequencies(), vec![10.0, 25.0, 40.0]);

    // Eigenvector array shape (n_modes, n_nodes, 6)
    let vectors = op2.eigenvectors(1).expect("eigenvectors");
    assert_eq!(vectors.shape(), (3, 10, 6));
    assert_eq!(vectors.index[0], (1, 1));
    assert_eq!(vectors.index[9], (10, 1));

    // Effective mass fraction matrix is 6 x n_modes
    let meff = op2.modal_effective_mass_fraction.as_ref().unwrap();
    assert_eq!((meff.nrows(), meff.ncols()), (6, 3));

    // Transpose and cumulative-sum along modes: running totals stay in
    // [0, 1] for every direction
    let transposed = meff.transpose();
    for direction in 0..6 {
        let mut running = 0.0;
        for mode in 0..3 {
            running += transposed[(mode, direction)];
            assert!((0.0..=1.0).contains(&running));
        }
        assert!((running - 0.9).abs() < 1e-6);
    }

    // The unknown table was skipped, not fatal
    assert_eq!(op2.skipped_tables, vec!["GEOM1".to_string()]);
}

#[test]
fn vector_kinds_are_distinct() {
    let mut file = Vec::new();
    file.extend(record(b"OQG1    "));
    file.extend(record(&i32_words(&[7, 1, 2, 6])));
    file.extend(record(&i32_words(&[11, 1, 12, 1])));
    let step: Vec<f32> = (0..12).map(|n| n as f32).collect();
    file.extend(record(&f32_words(&step)));
    file.extend(record(&[]));

    let temp = TempDir::new().unwrap();
    let path = temp.child("spc.op2");
    path.write_binary(&file).unwrap();

    let op2 = read_op2(path.path()).unwrap();
    let spc = op2.vectors.get(&(VectorKind::SpcForce, 7)).unwrap();
    assert_eq!(spc.shape(), (1, 2, 6));
    assert!(op2.vectors.get(&(VectorKind::Displacement, 7)).is_none());
}
