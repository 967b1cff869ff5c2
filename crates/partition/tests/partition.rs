//! Integration tests for the partition engine
//!
//! The fixture is two plates that share no nodes, each bonded by an RBE2
//! to a single independent node, with one CBUSH between the two
//! independent nodes.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::collections::BTreeSet;

use fetools_bulk::{read_deck_with, ReadOptions};
use fetools_partition::{merge_parts, partition_deck, partition_model};

const DECK: &str = "\
SOL 103
CEND
METHOD = 100
BEGIN BULK
$ Femap Property 1 : Left_Plate PSHELL
PSHELL,1,1,0.005
$ Femap Property 2 : Right_Plate PSHELL
PSHELL,2,1,0.005
PBUSH,900,K,1.0+6,1.0+6,1.0+6
MAT1,1,2.1+11,,0.3,7850.
$ left plate: grids 1-6, quads 11-12
GRID,1,,0.,0.,0.
GRID,2,,1.,0.,0.
GRID,3,,2.,0.,0.
GRID,4,,0.,1.,0.
GRID,5,,1.,1.,0.
GRID,6,,2.,1.,0.
CQUAD4,11,1,1,2,5,4
CQUAD4,12,1,2,3,6,5
$ right plate: grids 21-26, quads 31-32
GRID,21,,5.,0.,0.
GRID,22,,6.,0.,0.
GRID,23,,7.,0.,0.
GRID,24,,5.,1.,0.
GRID,25,,6.,1.,0.
GRID,26,,7.,1.,0.
CQUAD4,31,2,21,22,25,24
CQUAD4,32,2,22,23,26,25
$ interface
GRID,501,,1.,0.5,0.
GRID,502,,6.,0.5,0.
RBE2,701,501,123456,1,2,3,4,5,6
RBE2,702,502,123456,21,22,23,24,25,26
CBUSH,801,900,501,502
EIGRL,100,,,10
ENDDATA
";

fn build_deck(temp: &TempDir) -> std::path::PathBuf {
    let main = temp.child("model.bdf");
    main.write_str(DECK).unwrap();
    main.path().to_path_buf()
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
fn two_plates_one_joint() {
    let temp = TempDir::new().unwrap();
    let main = build_deck(&temp);
    let out = temp.child("parts");

    let report = partition_deck(&main, out.path(), None).unwrap();
    assert_eq!(report.part_names.len(), 2);
    assert_eq!(report.joint_count, 1);

    // Names come from the Femap property comments
    assert!(report.part_names.contains(&"Left_Plate".to_string()));
    assert!(report.part_names.contains(&"Right_Plate".to_string()));

    // Master lists all four includes
    let master = std::fs::read_to_string(out.child("master.bdf").path()).unwrap();
    assert!(master.contains("INCLUDE 'shared.bdf'"));
    assert!(master.contains("INCLUDE 'left_plate.bdf'"));
    assert!(master.contains("INCLUDE 'right_plate.bdf'"));
    assert!(master.contains("INCLUDE 'left_plate-to-right_plate.bdf'"));
    assert!(master.contains("METHOD = 100"));
    assert!(master.contains("EIGRL"));

    // The joint holds the chain and the bush property
    let joint =
        std::fs::read_to_string(out.child("left_plate-to-right_plate.bdf").path()).unwrap();
    assert!(joint.contains("CBUSH"));
    assert!(joint.contains("RBE2         701"));
    assert!(joint.contains("RBE2         702"));
    assert!(joint.contains("PBUSH"));

    // No part file contains the boundary chain
    let left = std::fs::read_to_string(out.child("left_plate.bdf").path()).unwrap();
    let right = std::fs::read_to_string(out.child("right_plate.bdf").path()).unwrap();
    assert!(!left.contains("CBUSH"));
    assert!(!right.contains("CBUSH"));
    assert!(!left.contains("RBE2"));

    // Each plate file has its own grids and the dependent node set
    assert!(left.contains("CQUAD4        11"));
    assert!(right.contains("CQUAD4        31"));
}

#[test]
fn partition_closure() {
    let temp = TempDir::new().unwrap();
    let main = build_deck(&temp);
    let out = temp.child("parts");

    let report = partition_deck(&main, out.path(), None).unwrap();

    // Every element and node appears in some emitted file
    assert_eq!(report.counts.total_elements, report.counts.written_elements);
    assert_eq!(report.counts.total_nodes, report.counts.written_nodes);
}

#[test]
fn merge_absorbs_the_joint() {
    let temp = TempDir::new().unwrap();
    let main = build_deck(&temp);

    let model = read(&main);
    let mut partition = partition_model(&model);
    assert_eq!(partition.parts.len(), 2);
    assert_eq!(partition.joints.len(), 1);

    let merge: BTreeSet<u32> = partition.parts.iter().map(|p| p.id).collect();
    merge_parts(&mut partition, &merge);

    assert_eq!(partition.parts.len(), 1);
    assert!(partition.joints.is_empty());

    // Chain elements migrated into the merged part
    let merged = &partition.parts[0];
    assert!(merged.element_ids.contains(&801));
    assert!(merged.element_ids.contains(&701));
    assert!(merged.element_ids.contains(&702));
    assert!(merged.property_ids.contains(&900));
    assert!(merged.node_ids.contains(&501));
}

#[test]
fn merged_emission_has_no_inner_joint() {
    let temp = TempDir::new().unwrap();
    let main = build_deck(&temp);
    let out = temp.child("merged");

    let merge: BTreeSet<u32> = [1, 2].into_iter().collect();
    let report = partition_deck(&main, out.path(), Some(&merge)).unwrap();
    assert_eq!(report.part_names.len(), 1);
    assert_eq!(report.joint_count, 0);

    // The chain now lives inside the merged part's file
    let part_file = out.child("left_plate.bdf");
    let text = std::fs::read_to_string(part_file.path()).unwrap();
    assert!(text.contains("CBUSH"));
    assert!(text.contains("RBE2"));
}
