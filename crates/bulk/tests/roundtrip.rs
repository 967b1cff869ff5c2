//! Integration tests for parse/write round trips

use assert_fs::prelude::*;
use assert_fs::TempDir;
use fetools_bulk::{read_deck_with, DeckWriter, Family, Model, ReadOptions, Xref};
use rstest::rstest;

fn read(path: &std::path::Path) -> Model {
    read_deck_with(
        path,
        ReadOptions {
            disable_progress: true,
            ..Default::default()
        },
    )
    .unwrap()
}

const SINGLE_FILE_DECK: &str = "\
SOL 103
CEND
SPC = 10
LOAD = 20
BEGIN BULK
MAT1           1  2.1+11             0.3   7850.
PSHELL         1       1   0.005
GRID           1              0.      0.      0.
GRID           2              1.      0.      0.
GRID           3              0.      1.      0.
CTRIA3         1       1       1       2       3
SPC1          10  123456       1       2
FORCE         20       3       0    100.      0.      0.     -1.
ENDDATA
";

#[test]
fn single_file_roundtrip() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("model.bdf");
    input.write_str(SINGLE_FILE_DECK).unwrap();

    let model = read(input.path());
    assert_eq!(model.nodes.len(), 3);
    assert_eq!(model.elements.len(), 1);
    assert_eq!(model.spcs.len(), 1);
    assert_eq!(model.loads.len(), 1);
    assert!(Xref::build(&model).is_clean());

    let out_dir = temp.child("out");
    let report = DeckWriter::new(&model).write(out_dir.path()).unwrap();
    assert_eq!(report.written.len(), 1);
    assert!(report.fallback.is_empty());

    let reparsed = read(&report.written[0]);
    assert_eq!(model.nodes, reparsed.nodes);
    assert_eq!(model.elements, reparsed.elements);
    assert_eq!(model.properties, reparsed.properties);
    assert_eq!(model.materials, reparsed.materials);
    assert_eq!(model.spcs, reparsed.spcs);
    assert_eq!(model.loads, reparsed.loads);
    assert_eq!(model.sections.case_control, reparsed.sections.case_control);
}

#[test]
fn include_ownership_preserved() {
    let temp = TempDir::new().unwrap();
    let main = temp.child("main.bdf");
    let include = temp.child("sub/shell.inc");
    include.touch().unwrap();

    main.write_str(
        "\
SOL 101
CEND
BEGIN BULK
INCLUDE 'sub/shell.inc'
GRID           1              0.      0.      0.
GRID           2              1.      0.      0.
GRID           3              0.      1.      0.
MAT1           1  2.1+11             0.3   7850.
ENDDATA
",
    )
    .unwrap();
    include
        .write_str(
            "\
PSHELL         5       1   0.005
CTRIA3         9       5       1       2       3
",
        )
        .unwrap();

    let model = read(main.path());
    assert_eq!(model.catalog.files.len(), 2);
    assert_eq!(model.catalog.owner(Family::Property, 5), Some(1));
    assert_eq!(model.catalog.owner(Family::Node, 1), Some(0));

    let out_dir = temp.child("out");
    let report = DeckWriter::new(&model).write(out_dir.path()).unwrap();
    assert_eq!(report.written.len(), 2);

    // The shell and its property live in exactly one output file
    let include_text = std::fs::read_to_string(out_dir.child("sub/shell.inc").path()).unwrap();
    assert!(include_text.contains("PSHELL"));
    assert!(include_text.contains("CTRIA3"));
    let main_text = std::fs::read_to_string(out_dir.child("main.bdf").path()).unwrap();
    assert!(!main_text.contains("PSHELL"));
    assert!(main_text.contains("INCLUDE 'sub/shell.inc'"));

    // Re-reading the written tree yields the same model
    let reparsed = read(out_dir.child("main.bdf").path());
    assert_eq!(model.nodes, reparsed.nodes);
    assert_eq!(model.elements, reparsed.elements);
    assert_eq!(model.properties, reparsed.properties);
}

#[rstest]
#[case("GRID, 1, 0, 1.5, -2.0, 0.0")]
#[case("GRID           1       0     1.5    -2.0     0.0")]
fn free_and_fixed_agree(#[case] line: &str) {
    let temp = TempDir::new().unwrap();
    let input = temp.child("model.bdf");
    input
        .write_str(&format!("SOL 101\nCEND\nBEGIN BULK\n{line}\nENDDATA\n"))
        .unwrap();

    let model = read(input.path());
    let node = model.nodes.get(&1).unwrap();
    assert_eq!(node.xyz(), Some([1.5, -2.0, 0.0]));
}

#[test]
fn unknown_cards_pass_through() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("model.bdf");
    input
        .write_str(
            "\
SOL 101
CEND
BEGIN BULK
GRID           1              0.      0.      0.
BCPROPS       77       1
+             12      13
ENDDATA
",
        )
        .unwrap();

    let model = read(input.path());
    assert_eq!(model.catalog.files[0].passthrough.len(), 2);

    let out_dir = temp.child("out");
    DeckWriter::new(&model).write(out_dir.path()).unwrap();
    let text = std::fs::read_to_string(out_dir.child("model.bdf").path()).unwrap();
    assert!(text.contains("BCPROPS       77       1"));
    assert!(text.contains("+             12      13"));
}

#[test]
fn skip_list_keeps_cards_verbatim() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("model.bdf");
    input
        .write_str(
            "\
SOL 101
CEND
BEGIN BULK
BCTPARA        3    HARD
GRID           1              0.      0.      0.
ENDDATA
",
        )
        .unwrap();

    let model = read_deck_with(
        input.path(),
        ReadOptions {
            skip_cards: vec!["BCTPARA".to_string()],
            disable_progress: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(model.contacts.is_empty());
    assert_eq!(model.skipped.get(&0).map(Vec::len), Some(1));

    let out_dir = temp.child("out");
    DeckWriter::new(&model).write(out_dir.path()).unwrap();
    let text = std::fs::read_to_string(out_dir.child("model.bdf").path()).unwrap();
    assert!(text.contains("BCTPARA        3    HARD"));
}
