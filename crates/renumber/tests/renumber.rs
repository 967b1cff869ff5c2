//! Integration tests for the renumber engine

use assert_fs::prelude::*;
use assert_fs::TempDir;
use fetools_bulk::cards::Element;
use fetools_bulk::{read_deck_with, Family, ReadOptions};
use fetools_renumber::{renumber_deck, Error, IdRange, RenumberSpec};

const MAIN: &str = "\
SOL 103
CEND
SPC = 10
LOAD = 20
BEGIN BULK
INCLUDE 'shell.inc'
MAT1           1  2.1+11             0.3   7850.
GRID           1              0.      0.      0.
GRID           2              1.      0.      0.
GRID           3              0.      1.      0.
SPC1          10  123456       1       2
FORCE         20       3       0    100.      0.      0.     -1.
ENDDATA
";

const SHELL_INC: &str = "\
PSHELL         1       1   0.005
CTRIA3         1       1       1       2       3
";

fn build_tree(temp: &TempDir) -> std::path::PathBuf {
    let main = temp.child("main.bdf");
    main.write_str(MAIN).unwrap();
    temp.child("shell.inc").write_str(SHELL_INC).unwrap();
    main.path().to_path_buf()
}

fn spec_with_ranges() -> RenumberSpec {
    let mut spec = RenumberSpec::default();
    let main = spec.files.entry("main.bdf".to_string()).or_default();
    main.insert(Family::Node, IdRange::new(1001, 1100));
    main.insert(Family::Element, IdRange::new(2001, 2100));
    let shell = spec.files.entry("shell.inc".to_string()).or_default();
    shell.insert(Family::Element, IdRange::new(2101, 2200));
    shell.insert(Family::Property, IdRange::new(3001, 3100));
    spec
}

fn read(path: &std::path::Path) -> fetools_bulk::Model {
    read_deck_with(
        path,
        ReadOptions {
            disable_progress: true,
            ..Default::default()
        },
    )
    .unwrap()
}

#[test]
fn ranges_applied_across_includes() {
    let temp = TempDir::new().unwrap();
    let main = build_tree(&temp);
    let out = temp.child("out");

    let report = renumber_deck(&main, out.path(), &spec_with_ranges()).unwrap();
    assert!(report.post_errors.is_empty(), "{:?}", report.post_errors);

    let model = read(out.child("main.bdf").path());

    // Grids renumbered consecutively from the main range
    let nids: Vec<u32> = model.nodes.keys().copied().collect();
    assert_eq!(nids, vec![1001, 1002, 1003]);

    // The shell moved into its file's element range, the property too
    let element = model.elements.get(&2101).expect("shell at 2101");
    assert_eq!(element.pid(), Some(3001));
    let Element::Shell(shell) = element else {
        panic!()
    };
    assert_eq!(shell.nodes, vec![1001, 1002, 1003]);

    // Constraint and load node slots follow the node map
    let spc = &model.spcs.get(&10).unwrap()[0];
    assert_eq!(spc.nodes(), vec![1001, 1002]);
    let load = &model.loads.get(&20).unwrap()[0];
    assert_eq!(load.nodes(), vec![1003]);

    // The shell include still owns its cards
    let include_text = std::fs::read_to_string(out.child("shell.inc").path()).unwrap();
    assert!(include_text.contains("2101"));
    assert!(include_text.contains("3001"));
}

#[test]
fn injectivity_and_completeness() {
    let temp = TempDir::new().unwrap();
    let main = build_tree(&temp);
    let out = temp.child("out");

    let input = read(&main);
    renumber_deck(&main, out.path(), &spec_with_ranges()).unwrap();
    let output = read(out.child("main.bdf").path());

    assert_eq!(input.nodes.len(), output.nodes.len());
    assert_eq!(input.element_count(), output.element_count());
    for element in output.elements.values() {
        for nid in element.nodes() {
            assert!(output.nodes.contains_key(&nid));
        }
    }
}

#[test]
fn capacity_rejected() {
    let temp = TempDir::new().unwrap();
    let main = build_tree(&temp);

    let mut spec = RenumberSpec::default();
    spec.files
        .entry("main.bdf".to_string())
        .or_default()
        .insert(Family::Node, IdRange::new(1001, 1002));

    let result = renumber_deck(&main, temp.child("out").path(), &spec);
    let Err(Error::Validation(errors)) = result else {
        panic!("expected validation failure, got {result:?}");
    };
    assert!(errors[0].contains("capacity"));
}

#[test]
fn overlap_rejected() {
    let temp = TempDir::new().unwrap();
    let main = build_tree(&temp);

    let mut spec = RenumberSpec::default();
    spec.files
        .entry("main.bdf".to_string())
        .or_default()
        .insert(Family::Element, IdRange::new(2001, 2100));
    spec.files
        .entry("shell.inc".to_string())
        .or_default()
        .insert(Family::Element, IdRange::new(2050, 2150));

    let result = renumber_deck(&main, temp.child("out").path(), &spec);
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn case_control_rewritten_when_sets_included() {
    let temp = TempDir::new().unwrap();
    let main = build_tree(&temp);
    let out = temp.child("out");

    let mut spec = spec_with_ranges();
    spec.include_set_ids = true;
    let main_ranges = spec.files.get_mut("main.bdf").unwrap();
    main_ranges.insert(Family::Spc, IdRange::new(510, 519));
    main_ranges.insert(Family::Load, IdRange::new(520, 529));

    renumber_deck(&main, out.path(), &spec).unwrap();
    let text = std::fs::read_to_string(out.child("main.bdf").path()).unwrap();
    assert!(text.contains("SPC = 510"));
    assert!(text.contains("LOAD = 520"));

    let model = read(out.child("main.bdf").path());
    assert!(model.spcs.contains_key(&510));
    assert!(model.loads.contains_key(&520));
}
