//! Partition emission
//!
//! One include file per part and joint, a shared file for model-wide
//! cards, and a master file that stitches everything together with the
//! original executive and case control.

// standard library
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

// crate modules
use crate::error::Result;
use crate::parts::{Joint, Part, Partition};

// fetools crates
use fetools_bulk::cards::SpcCard;
use fetools_bulk::Model;
use fetools_utils::f;

// external crates
use log::debug;
use serde::Serialize;

/// Coverage counts returned by the writer
///
/// Differences between totals and written counts are not errors; wall
/// and shared cards account for them and the caller reports them.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WriteCounts {
    pub total_elements: usize,
    pub total_nodes: usize,
    pub written_elements: usize,
    pub written_nodes: usize,
}

/// Write all partition files into `output_dir`
pub fn write_partition(
    model: &Model,
    partition: &Partition,
    output_dir: &Path,
) -> Result<(WriteCounts, Vec<PathBuf>)> {
    fs::create_dir_all(output_dir)?;

    let mut written_files = Vec::new();
    let mut written_nodes: HashSet<u32> = HashSet::new();
    let mut written_elements: HashSet<u32> = HashSet::new();

    let part_names: HashMap<u32, String> = partition
        .parts
        .iter()
        .map(|part| (part.id, part.name.clone()))
        .collect();
    let joint_pbush_pids: BTreeSet<u32> = partition
        .joints
        .iter()
        .flat_map(|joint| joint.pbush_pids.clone())
        .collect();

    // Element to part lookup for load containment
    let mut eid_to_part: HashMap<u32, u32> = HashMap::new();
    for part in &partition.parts {
        for eid in &part.element_ids {
            eid_to_part.insert(*eid, part.id);
        }
    }

    for part in &partition.parts {
        let path = output_dir.join(f!("{}.bdf", safe_filename(&part.name)));
        debug!("writing {}", path.display());
        let text = part_text(model, part, &eid_to_part, &mut written_nodes, &mut written_elements);
        fs::write(&path, text)?;
        written_files.push(path);
    }

    for joint in &partition.joints {
        let path = output_dir.join(joint_filename(joint, &part_names));
        debug!("writing {}", path.display());
        let text = joint_text(model, joint, &part_names, &mut written_nodes, &mut written_elements);
        fs::write(&path, text)?;
        written_files.push(path);
    }

    // shared.bdf: model-wide cards
    let shared_path = output_dir.join("shared.bdf");
    fs::write(
        &shared_path,
        shared_text(model, partition, &joint_pbush_pids, &written_nodes),
    )?;
    written_files.push(shared_path);

    // master.bdf stitches the include tree back together
    let master_path = output_dir.join("master.bdf");
    fs::write(
        &master_path,
        master_text(model, partition, &part_names),
    )?;
    written_files.insert(0, master_path);

    let counts = WriteCounts {
        total_elements: model.element_count(),
        total_nodes: model.nodes.len(),
        written_elements: written_elements.len(),
        written_nodes: written_nodes.len(),
    };
    Ok((counts, written_files))
}

fn part_text(
    model: &Model,
    part: &Part,
    eid_to_part: &HashMap<u32, u32>,
    written_nodes: &mut HashSet<u32>,
    written_elements: &mut HashSet<u32>,
) -> String {
    let mut out = String::new();
    out.push_str(&f!("$ Part: {} (ID={})\n", part.name, part.id));
    out.push_str(&f!(
        "$ Elements: {}, Nodes: {}\n$\n",
        part.element_ids.len(),
        part.node_ids.len()
    ));

    out.push_str("$ --- Nodes ---\n");
    for nid in &part.node_ids {
        if let Some(node) = model.nodes.get(nid) {
            out.push_str(&node.write());
            written_nodes.insert(*nid);
        }
    }

    out.push_str("$ --- Elements ---\n");
    for eid in &part.element_ids {
        if let Some(element) = model.elements.get(eid) {
            out.push_str(&element.write());
            written_elements.insert(*eid);
        }
    }

    let rigids: Vec<u32> = part
        .element_ids
        .iter()
        .filter(|eid| model.rigid_elements.contains_key(eid))
        .copied()
        .collect();
    if !rigids.is_empty() {
        out.push_str("$ --- Rigid Elements ---\n");
        for eid in rigids {
            out.push_str(&model.rigid_elements[&eid].write());
            written_elements.insert(eid);
        }
    }

    let masses: Vec<u32> = part
        .element_ids
        .iter()
        .filter(|eid| model.masses.contains_key(eid))
        .copied()
        .collect();
    if !masses.is_empty() {
        out.push_str("$ --- Mass Elements ---\n");
        for eid in masses {
            out.push_str(&model.masses[&eid].write());
            written_elements.insert(eid);
        }
    }

    // SPCs whose node set is fully inside the part
    let mut spc_header = false;
    for cards in model.spcs.values() {
        for card in cards {
            let nodes = card.nodes();
            if nodes.is_empty() || !nodes.iter().all(|nid| part.node_ids.contains(nid)) {
                continue;
            }
            if !spc_header {
                out.push_str("$ --- SPCs ---\n");
                spc_header = true;
            }
            out.push_str(&card.write());
        }
    }

    // Loads whose single referenced node or element is inside the part
    let mut load_header = false;
    for cards in model.loads.values() {
        for card in cards {
            let nodes = card.nodes();
            let eids = card.eids();
            let inside = match (nodes.as_slice(), eids.as_slice()) {
                ([node], []) => part.node_ids.contains(node),
                ([], [eid]) => eid_to_part.get(eid) == Some(&part.id),
                _ => false,
            };
            if !inside {
                continue;
            }
            if !load_header {
                out.push_str("$ --- Loads ---\n");
                load_header = true;
            }
            out.push_str(&card.write());
        }
    }

    out
}

fn joint_filename(joint: &Joint, part_names: &HashMap<u32, String>) -> String {
    let name = |id: u32| {
        part_names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| f!("Part_{id}"))
    };
    f!(
        "{}.bdf",
        safe_filename(&f!("{}-to-{}", name(joint.part_a), name(joint.part_b)))
    )
}

fn joint_text(
    model: &Model,
    joint: &Joint,
    part_names: &HashMap<u32, String>,
    written_nodes: &mut HashSet<u32>,
    written_elements: &mut HashSet<u32>,
) -> String {
    let name = |id: u32| {
        part_names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| f!("Part_{id}"))
    };
    let mut out = String::new();
    out.push_str(&f!(
        "$ Joint: {} <-> {}\n$ Chains: {}, Contact pairs: {}\n$\n",
        name(joint.part_a),
        name(joint.part_b),
        joint.chains.len(),
        joint.contact_pairs.len()
    ));

    // The chain grids live here: both CBUSH endpoints per chain
    let mut grid_ids = BTreeSet::new();
    for chain in &joint.chains {
        grid_ids.insert(chain.cbush_nodes.0);
        grid_ids.insert(chain.cbush_nodes.1);
    }
    if !grid_ids.is_empty() {
        out.push_str("$ --- Interface nodes ---\n");
        for nid in grid_ids {
            if let Some(node) = model.nodes.get(&nid) {
                out.push_str(&node.write());
                written_nodes.insert(nid);
            }
        }
    }

    if !joint.chains.is_empty() {
        out.push_str("$ --- CBUSH elements ---\n");
        let mut cbush_ids: Vec<u32> = joint.chains.iter().map(|c| c.cbush_eid).collect();
        cbush_ids.sort_unstable();
        for eid in cbush_ids {
            if let Some(element) = model.elements.get(&eid) {
                out.push_str(&element.write());
                written_elements.insert(eid);
            }
        }

        out.push_str("$ --- RBE2 elements ---\n");
        let mut rbe2_ids = BTreeSet::new();
        for chain in &joint.chains {
            rbe2_ids.insert(chain.rbe2_a_eid);
            rbe2_ids.insert(chain.rbe2_b_eid);
        }
        for eid in rbe2_ids {
            if let Some(element) = model.rigid_elements.get(&eid) {
                out.push_str(&element.write());
                written_elements.insert(eid);
            }
        }
    }

    if !joint.pbush_pids.is_empty() {
        out.push_str("$ --- PBUSH properties ---\n");
        for pid in &joint.pbush_pids {
            if let Some(property) = model.properties.get(pid) {
                out.push_str(&property.write());
            }
        }
    }

    if !joint.contact_pairs.is_empty() {
        out.push_str("$ --- Glue contact pairs ---\n");
        for pair in &joint.contact_pairs {
            out.push_str(&f!(
                "$ set {}: surface {} <-> surface {}\n",
                pair.set_id,
                pair.source_surface,
                pair.target_surface
            ));
        }
    }

    out
}

fn shared_text(
    model: &Model,
    partition: &Partition,
    joint_pbush_pids: &BTreeSet<u32>,
    written_nodes: &HashSet<u32>,
) -> String {
    let mut out = String::new();
    out.push_str("$ Shared: materials, properties, coordinate systems\n$\n");

    out.push_str("$ --- Materials ---\n");
    for material in model.materials.values() {
        out.push_str(&material.write());
    }

    out.push_str("$ --- Properties ---\n");
    for (pid, property) in &model.properties {
        if joint_pbush_pids.contains(pid) {
            continue;
        }
        out.push_str(&property.write());
    }

    let coords: Vec<_> = model.coords.iter().filter(|(cid, _)| **cid != 0).collect();
    if !coords.is_empty() {
        out.push_str("$ --- Coordinate Systems ---\n");
        for (_, coord) in coords {
            out.push_str(&coord.write());
        }
    }

    // Global contact parameters
    let mut contact_header = false;
    for cards in model.contacts.values() {
        for card in cards {
            if matches!(
                card,
                fetools_bulk::cards::Contact::Bctpara(_) | fetools_bulk::cards::Contact::Bctparm(_)
            ) {
                if !contact_header {
                    out.push_str("$ --- Contact parameters ---\n");
                    contact_header = true;
                }
                out.push_str(&card.write());
            }
        }
    }

    // SPCs not fully contained by any part
    let mut spc_header = false;
    for cards in model.spcs.values() {
        for card in cards {
            let nodes = card.nodes();
            let contained = !nodes.is_empty()
                && partition
                    .parts
                    .iter()
                    .any(|part| nodes.iter().all(|nid| part.node_ids.contains(nid)));
            if contained && !matches!(card, SpcCard::SpcAdd(_)) {
                continue;
            }
            if !spc_header {
                out.push_str("$ --- SPCs ---\n");
                spc_header = true;
            }
            out.push_str(&card.write());
        }
    }

    // Any grid the parts and joints never claimed
    let strays: Vec<u32> = model
        .nodes
        .keys()
        .filter(|nid| !written_nodes.contains(nid))
        .copied()
        .collect();
    if !strays.is_empty() {
        out.push_str("$ --- Unassigned nodes ---\n");
        for nid in strays {
            out.push_str(&model.nodes[&nid].write());
        }
    }

    out
}

fn master_text(
    model: &Model,
    partition: &Partition,
    part_names: &HashMap<u32, String>,
) -> String {
    let mut out = String::new();
    for line in &model.sections.executive {
        out.push_str(line);
        out.push('\n');
    }
    for line in &model.sections.case_control {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("BEGIN BULK\n");

    out.push_str("INCLUDE 'shared.bdf'\n");
    for part in &partition.parts {
        out.push_str(&f!("INCLUDE '{}.bdf'\n", safe_filename(&part.name)));
    }
    for joint in &partition.joints {
        out.push_str(&f!("INCLUDE '{}'\n", joint_filename(joint, part_names)));
    }

    if !model.params.is_empty() {
        out.push_str("$ --- Parameters ---\n");
        for param in model.params.values() {
            out.push_str(&param.write());
        }
    }
    if !model.methods.is_empty() {
        out.push_str("$ --- Methods ---\n");
        for method in model.methods.values() {
            out.push_str(&method.write());
        }
    }

    out.push_str("ENDDATA\n");
    out
}

/// Lower-case filesystem-safe name
fn safe_filename(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
