//! Integration tests for the mass scale engine

use assert_fs::prelude::*;
use assert_fs::TempDir;
use fetools_scale::{scale_deck, OutputMode, ScaleSpec};

const MAIN: &str = "\
SOL 101
CEND
BEGIN BULK
INCLUDE 'frame.inc'
INCLUDE 'skin.inc'
INCLUDE 'payload.inc'
GRID           1              0.      0.      0.
GRID           2              1.      0.      0.
GRID           3              0.      1.      0.
GRID          10              0.      0.      1.
ENDDATA
";

const FRAME: &str = "\
$ frame material
MAT1           1  2.1+11             0.3   7850.
";

const SKIN: &str = "\
MAT1,2,7.0+10,,0.33,2700.
PSHELL,5,2,0.002,,,,,1.5
CTRIA3         5       5       1       2       3
";

const PAYLOAD: &str = "\
CONM2,500,10,,10.
,0.1,,0.1,,,0.1
";

fn build_tree(temp: &TempDir) -> std::path::PathBuf {
    let main = temp.child("main.bdf");
    main.write_str(MAIN).unwrap();
    temp.child("frame.inc").write_str(FRAME).unwrap();
    temp.child("skin.inc").write_str(SKIN).unwrap();
    temp.child("payload.inc").write_str(PAYLOAD).unwrap();
    main.path().to_path_buf()
}

#[test]
fn scale_fidelity() {
    let temp = TempDir::new().unwrap();
    let main = build_tree(&temp);

    // Catalog order: main, frame, skin, payload
    let mut spec = ScaleSpec::default();
    spec.scales.insert(1, 1.0);
    spec.scales.insert(2, 2.0);
    spec.scales.insert(3, 0.5);

    let out = temp.child("scaled");
    let report = scale_deck(
        &main,
        &OutputMode::Directory(out.path().to_path_buf()),
        &spec,
    )
    .unwrap();

    // Factor 1.0 means the file is not rewritten at all
    assert!(!report.written.iter().any(|(file, _)| *file == 1));
    assert!(!out.child("frame.inc").path().exists());

    // Density and NSM doubled; untouched lines byte-identical
    let skin = std::fs::read_to_string(out.child("skin.inc").path()).unwrap();
    assert!(skin.contains("5400."));
    assert!(skin.contains("3."));
    assert!(!skin.contains("2700."));
    assert!(skin.contains("CTRIA3         5       5       1       2       3"));

    // CONM2 mass and inertia halved
    let payload = std::fs::read_to_string(out.child("payload.inc").path()).unwrap();
    assert!(payload.contains("5."));
    assert!(payload.contains("0.05"));
    assert!(!payload.contains("10."));
    assert!(!payload.contains("0.1 "));

    // Summary written in the output directory
    let summary_path = report.summary.expect("summary written");
    let summary = std::fs::read_to_string(summary_path).unwrap();
    assert!(summary.contains("# Mass Scale Summary"));
    assert!(summary.contains("skin.inc"));
    assert!(summary.contains("2.0000"));
}

#[test]
fn suffix_mode_writes_beside_input() {
    let temp = TempDir::new().unwrap();
    let main = build_tree(&temp);

    let mut spec = ScaleSpec::default();
    spec.scales.insert(3, 0.5);

    let report = scale_deck(&main, &OutputMode::Suffix("_S".to_string()), &spec).unwrap();
    assert_eq!(report.written.len(), 1);
    assert!(temp.child("payload_S.inc").path().exists());
    // Inputs untouched
    assert_eq!(
        std::fs::read_to_string(temp.child("payload.inc").path()).unwrap(),
        PAYLOAD
    );
}

#[test]
fn all_unity_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let main = build_tree(&temp);

    let report = scale_deck(&main, &OutputMode::Overwrite, &ScaleSpec::default()).unwrap();
    assert!(report.written.is_empty());
    assert!(report.summary.is_none());
}
