//! Part and joint construction, naming, and merging

// standard library
use std::collections::{BTreeMap, BTreeSet, HashMap};

// crate modules
use crate::graph::{self, Adjacency, Chain};

// fetools crates
use fetools_bulk::{Family, Model};
use fetools_utils::f;

// external crates
use log::warn;
use serde::Serialize;

/// A connected component of the element-node graph
#[derive(Debug, Clone, Default, Serialize)]
pub struct Part {
    pub id: u32,
    /// Derived from property comments, used in file names
    pub name: String,
    pub element_ids: BTreeSet<u32>,
    pub node_ids: BTreeSet<u32>,
    pub property_ids: BTreeSet<u32>,
}

/// A glue contact pair mapped onto a part pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPair {
    pub set_id: u32,
    pub source_surface: u32,
    pub target_surface: u32,
}

/// Everything connecting one pair of parts
#[derive(Debug, Clone, Serialize)]
pub struct Joint {
    pub part_a: u32,
    pub part_b: u32,
    #[serde(skip)]
    pub chains: Vec<Chain>,
    pub contact_pairs: Vec<ContactPair>,
    pub pbush_pids: BTreeSet<u32>,
}

/// Full partitioning output
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub parts: Vec<Part>,
    pub joints: Vec<Joint>,
    pub warnings: Vec<String>,
}

impl Partition {
    pub fn part(&self, id: u32) -> Option<&Part> {
        self.parts.iter().find(|part| part.id == id)
    }
}

/// Partition the model into parts and joints
pub fn partition_model(model: &Model) -> Partition {
    let mut warnings = Vec::new();

    let adjacency = Adjacency::build(model);
    let walls = graph::detect_chains(model);
    let components = graph::flood_fill(&adjacency, &walls);

    // Components become parts; dependent-node sets are adopted
    let mut parts: Vec<Part> = Vec::new();
    for (n, element_ids) in components.into_iter().enumerate() {
        let mut property_ids = BTreeSet::new();
        let mut node_ids = BTreeSet::new();
        for eid in &element_ids {
            if let Some(element) = model.elements.get(eid) {
                if let Some(pid) = element.pid() {
                    property_ids.insert(pid);
                }
            }
            node_ids.extend(adjacency.elem_to_nodes.get(eid).into_iter().flatten());
        }

        let id = n as u32 + 1;
        let mut part = Part {
            id,
            name: derive_part_name(model, &property_ids, id),
            element_ids,
            node_ids,
            property_ids,
        };
        for chain in &walls.chains {
            if chain.rbe2_a_dep.iter().any(|n| part.node_ids.contains(n)) {
                part.node_ids.extend(&chain.rbe2_a_dep);
            }
            if chain.rbe2_b_dep.iter().any(|n| part.node_ids.contains(n)) {
                part.node_ids.extend(&chain.rbe2_b_dep);
            }
        }
        parts.push(part);
    }

    deduplicate_names(&mut parts);

    // Node to part lookup for the voting passes
    let mut node_to_part: HashMap<u32, u32> = HashMap::new();
    for part in &parts {
        for nid in &part.node_ids {
            node_to_part.insert(*nid, part.id);
        }
    }

    // Interior rigid and mass elements join the part owning most of
    // their nodes
    let part_by_id: BTreeMap<u32, usize> = parts
        .iter()
        .enumerate()
        .map(|(index, part)| (part.id, index))
        .collect();
    for (eid, rigid) in &model.rigid_elements {
        if walls.wall_eids.contains(eid) {
            continue;
        }
        if let Some(owner) = graph::majority_owner(&rigid.nodes(), &node_to_part) {
            parts[part_by_id[&owner]].element_ids.insert(*eid);
        }
    }
    for (eid, mass) in &model.masses {
        if let Some(owner) = graph::majority_owner(&mass.nodes(), &node_to_part) {
            parts[part_by_id[&owner]].element_ids.insert(*eid);
        }
    }

    // Joints from chains, keyed (min, max)
    let mut joint_map: BTreeMap<(u32, u32), Joint> = BTreeMap::new();
    for chain in &walls.chains {
        let part_a = graph::majority_owner(&chain.rbe2_a_dep, &node_to_part);
        let part_b = graph::majority_owner(&chain.rbe2_b_dep, &node_to_part);
        let (Some(part_a), Some(part_b)) = (part_a, part_b) else {
            warnings.push(f!(
                "CBUSH {}: could not assign both RBE2s to parts",
                chain.cbush_eid
            ));
            continue;
        };
        if part_a == part_b {
            warnings.push(f!(
                "CBUSH {}: both RBE2s land in part {part_a}",
                chain.cbush_eid
            ));
            continue;
        }

        let key = (part_a.min(part_b), part_a.max(part_b));
        let joint = joint_map.entry(key).or_insert_with(|| Joint {
            part_a: key.0,
            part_b: key.1,
            chains: Vec::new(),
            contact_pairs: Vec::new(),
            pbush_pids: BTreeSet::new(),
        });
        joint.chains.push(chain.clone());
        if let Some(pid) = model
            .elements
            .get(&chain.cbush_eid)
            .and_then(|element| element.pid())
        {
            joint.pbush_pids.insert(pid);
        }
    }

    assign_contact_to_joints(model, &parts, &mut joint_map, &mut warnings);

    // Orphan check
    let mut covered: BTreeSet<u32> = parts.iter().flat_map(|p| p.node_ids.clone()).collect();
    covered.extend(walls.wall_nodes.iter());
    let orphans = model.nodes.keys().filter(|nid| !covered.contains(nid)).count();
    if orphans > 0 {
        warnings.push(f!("{orphans} orphan node(s) not assigned to any part"));
    }
    for warning in &warnings {
        warn!("{warning}");
    }

    Partition {
        parts,
        joints: joint_map.into_values().collect(),
        warnings,
    }
}

/// Map contact surfaces to parts via element ownership, then convert
/// pair rows into joint entries
fn assign_contact_to_joints(
    model: &Model,
    parts: &[Part],
    joint_map: &mut BTreeMap<(u32, u32), Joint>,
    warnings: &mut Vec<String>,
) {
    let mut eid_to_part: HashMap<u32, u32> = HashMap::new();
    for part in parts {
        for eid in &part.element_ids {
            eid_to_part.insert(*eid, part.id);
        }
    }

    // Surface id -> parts its elements belong to
    let mut surface_parts: HashMap<u32, BTreeSet<u32>> = HashMap::new();
    for (sid, cards) in &model.contacts {
        for card in cards {
            for eid in card.eids() {
                if let Some(part) = eid_to_part.get(&eid) {
                    surface_parts.entry(*sid).or_default().insert(*part);
                }
            }
        }
    }

    for (csid, cards) in &model.contacts {
        for card in cards {
            let fetools_bulk::cards::Contact::Bctset(set) = card else {
                continue;
            };
            for row in &set.rows {
                let empty = BTreeSet::new();
                let parts_a = surface_parts.get(&row.source).unwrap_or(&empty);
                let parts_b = surface_parts.get(&row.target).unwrap_or(&empty);
                if parts_a.is_empty() || parts_b.is_empty() {
                    warnings.push(f!(
                        "contact pair {} -> {} references surfaces outside every part",
                        row.source,
                        row.target
                    ));
                    continue;
                }
                for a in parts_a {
                    for b in parts_b {
                        if a == b {
                            continue;
                        }
                        let key = (*a.min(b), *a.max(b));
                        let joint = joint_map.entry(key).or_insert_with(|| Joint {
                            part_a: key.0,
                            part_b: key.1,
                            chains: Vec::new(),
                            contact_pairs: Vec::new(),
                            pbush_pids: BTreeSet::new(),
                        });
                        joint.contact_pairs.push(ContactPair {
                            set_id: *csid,
                            source_surface: row.source,
                            target_surface: row.target,
                        });
                    }
                }
            }
        }
    }
}

/// Name from the first property comment, `Part_###` otherwise
fn derive_part_name(model: &Model, property_ids: &BTreeSet<u32>, id: u32) -> String {
    for pid in property_ids {
        if let Some(comment) = model.comment(Family::Property, *pid) {
            if let Some(name) = parse_comment_name(comment) {
                return name;
            }
        }
    }
    f!("Part_{id:03}")
}

/// Extract a usable name from a property comment
///
/// Femap writes `$ Femap Property 10 : Wing_Skin PSHELL`; generic
/// comments fall back to the first word after stripping ids and card
/// names.
fn parse_comment_name(comment: &str) -> Option<String> {
    let text = comment.trim().trim_start_matches('$').trim();
    if text.is_empty() {
        return None;
    }

    if let Some((_, after)) = text.split_once(':') {
        let token = after.split_whitespace().next()?;
        return Some(token.to_string());
    }

    let mut cleaned = text.to_string();
    for card in [
        "PSHELL", "PCOMP", "PCOMPG", "PSOLID", "PBAR", "PBARL", "PBEAM", "PROD", "PBUSH",
    ] {
        cleaned = cleaned.replace(card, "");
    }
    let cleaned: String = cleaned
        .split_whitespace()
        .filter(|token| token.parse::<u64>().is_err())
        .collect::<Vec<_>>()
        .join("_");
    let cleaned = cleaned.trim_matches(|c| c == '-' || c == '_').to_string();
    (!cleaned.is_empty()).then(|| cleaned.chars().take(30).collect())
}

/// Suffix colliding names so filenames stay unique
fn deduplicate_names(parts: &mut [Part]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for part in parts.iter() {
        *counts.entry(part.name.clone()).or_default() += 1;
    }
    let mut seen: HashMap<String, usize> = HashMap::new();
    for part in parts.iter_mut() {
        if counts[&part.name] > 1 {
            let n = seen.entry(part.name.clone()).or_default();
            *n += 1;
            part.name = f!("{}_{n}", part.name);
        }
    }
}

/// Fuse the given parts into the lowest id, in place
///
/// Joints with both sides inside the merge set are absorbed: their chain
/// elements and PBUSH properties migrate into the merged part. Joints
/// with one side inside are rekeyed to the merged id.
pub fn merge_parts(partition: &mut Partition, merge_ids: &BTreeSet<u32>) {
    if merge_ids.len() < 2 {
        return;
    }
    let merging: Vec<Part> = partition
        .parts
        .iter()
        .filter(|part| merge_ids.contains(&part.id))
        .cloned()
        .collect();
    if merging.len() < 2 {
        return;
    }

    let base = merging.iter().map(|part| part.id).min().unwrap();
    let mut merged = Part {
        id: base,
        name: merging
            .iter()
            .find(|part| part.id == base)
            .map(|part| part.name.clone())
            .unwrap_or_default(),
        ..Default::default()
    };
    for part in &merging {
        merged.element_ids.extend(&part.element_ids);
        merged.node_ids.extend(&part.node_ids);
        merged.property_ids.extend(&part.property_ids);
    }

    let (absorbed, mut remaining): (Vec<Joint>, Vec<Joint>) = partition
        .joints
        .drain(..)
        .partition(|joint| merge_ids.contains(&joint.part_a) && merge_ids.contains(&joint.part_b));

    // Absorbed chain elements become interior to the merged part
    for joint in absorbed {
        for chain in &joint.chains {
            merged.element_ids.insert(chain.cbush_eid);
            merged.element_ids.insert(chain.rbe2_a_eid);
            merged.element_ids.insert(chain.rbe2_b_eid);
            merged.node_ids.insert(chain.cbush_nodes.0);
            merged.node_ids.insert(chain.cbush_nodes.1);
            merged.node_ids.extend(&chain.rbe2_a_dep);
            merged.node_ids.extend(&chain.rbe2_b_dep);
        }
        merged.property_ids.extend(&joint.pbush_pids);
    }

    for joint in &mut remaining {
        if merge_ids.contains(&joint.part_a) {
            joint.part_a = base;
        }
        if merge_ids.contains(&joint.part_b) {
            joint.part_b = base;
        }
        if joint.part_a > joint.part_b {
            std::mem::swap(&mut joint.part_a, &mut joint.part_b);
        }
    }
    remaining.sort_by_key(|joint| (joint.part_a, joint.part_b));

    partition
        .parts
        .retain(|part| !merge_ids.contains(&part.id));
    partition.parts.push(merged);
    partition.parts.sort_by_key(|part| part.id);
    partition.joints = remaining;
}
