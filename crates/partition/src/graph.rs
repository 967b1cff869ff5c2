//! Adjacency, boundary chains, and flood fill
//!
//! Only structural elements are edges in the adjacency graph. Rigid and
//! mass elements would bridge across chain boundaries, so they are
//! assigned to parts after the fill by node majority vote.

// standard library
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

// fetools crates
use fetools_bulk::cards::{Element, RigidElement};
use fetools_bulk::Model;

// external crates
use itertools::Itertools;
use log::warn;

/// One RBE2-CBUSH-RBE2 boundary connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub cbush_eid: u32,
    /// (GA, GB) of the CBUSH, each an RBE2 independent node
    pub cbush_nodes: (u32, u32),
    pub rbe2_a_eid: u32,
    pub rbe2_a_dep: Vec<u32>,
    pub rbe2_b_eid: u32,
    pub rbe2_b_dep: Vec<u32>,
}

/// Element-node incidence over the structural elements
#[derive(Debug, Default)]
pub struct Adjacency {
    pub elem_to_nodes: HashMap<u32, Vec<u32>>,
    pub node_to_elems: HashMap<u32, Vec<u32>>,
}

impl Adjacency {
    /// Build once per input
    pub fn build(model: &Model) -> Self {
        let mut adjacency = Self::default();
        for (eid, element) in &model.elements {
            let nodes = element.nodes();
            for &nid in &nodes {
                adjacency.node_to_elems.entry(nid).or_default().push(*eid);
            }
            adjacency.elem_to_nodes.insert(*eid, nodes);
        }
        adjacency
    }
}

/// Boundary walls: chain elements and their independent nodes
#[derive(Debug, Default)]
pub struct Walls {
    pub chains: Vec<Chain>,
    pub wall_eids: HashSet<u32>,
    pub wall_nodes: HashSet<u32>,
}

/// Detect every RBE2-CBUSH-RBE2 chain
///
/// A CBUSH qualifies when both endpoints are live and each is the
/// independent node of exactly one RBE2. Grounded bushes (blank or zero
/// GB) are never boundaries.
pub fn detect_chains(model: &Model) -> Walls {
    // Independent node -> RBE2s claiming it
    let mut by_independent: HashMap<u32, Vec<&fetools_bulk::cards::Rbe2>> = HashMap::new();
    for element in model.rigid_elements.values() {
        if let RigidElement::Rbe2(rbe2) = element {
            by_independent.entry(rbe2.gn).or_default().push(rbe2);
        }
    }

    let unique = |node: u32| -> Option<&fetools_bulk::cards::Rbe2> {
        match by_independent.get(&node).map(Vec::as_slice) {
            Some([rbe2]) => Some(*rbe2),
            Some(more) if more.len() > 1 => {
                warn!("node {node} is the independent node of {} RBE2s", more.len());
                None
            }
            _ => None,
        }
    };

    let mut walls = Walls::default();
    for element in model.elements.values() {
        let Element::Bush(bush) = element else {
            continue;
        };
        let Some(gb) = bush.gb else { continue };

        let (Some(rbe2_a), Some(rbe2_b)) = (unique(bush.ga), unique(gb)) else {
            continue;
        };

        walls.wall_eids.insert(bush.eid);
        walls.wall_eids.insert(rbe2_a.eid);
        walls.wall_eids.insert(rbe2_b.eid);
        walls.wall_nodes.insert(bush.ga);
        walls.wall_nodes.insert(gb);
        walls.chains.push(Chain {
            cbush_eid: bush.eid,
            cbush_nodes: (bush.ga, gb),
            rbe2_a_eid: rbe2_a.eid,
            rbe2_a_dep: rbe2_a.gmi.clone(),
            rbe2_b_eid: rbe2_b.eid,
            rbe2_b_dep: rbe2_b.gmi.clone(),
        });
    }

    walls
}

/// BFS flood fill avoiding wall elements and wall nodes
///
/// Returns the raw connected components, deterministic by lowest seed id.
pub fn flood_fill(adjacency: &Adjacency, walls: &Walls) -> Vec<BTreeSet<u32>> {
    let mut visited: HashSet<u32> = HashSet::new();
    let mut components = Vec::new();

    let seeds = adjacency
        .elem_to_nodes
        .keys()
        .copied()
        .filter(|eid| !walls.wall_eids.contains(eid))
        .sorted_unstable();

    for seed in seeds {
        if visited.contains(&seed) {
            continue;
        }
        let mut component = BTreeSet::new();
        let mut queue = VecDeque::from([seed]);

        while let Some(eid) = queue.pop_front() {
            if visited.contains(&eid) || walls.wall_eids.contains(&eid) {
                continue;
            }
            visited.insert(eid);
            component.insert(eid);

            for nid in adjacency.elem_to_nodes.get(&eid).into_iter().flatten() {
                if walls.wall_nodes.contains(nid) {
                    continue;
                }
                for neighbour in adjacency.node_to_elems.get(nid).into_iter().flatten() {
                    if !visited.contains(neighbour) && !walls.wall_eids.contains(neighbour) {
                        queue.push_back(*neighbour);
                    }
                }
            }
        }

        if !component.is_empty() {
            components.push(component);
        }
    }

    components
}

/// The part owning the majority of the given nodes
pub fn majority_owner(nodes: &[u32], node_to_part: &HashMap<u32, u32>) -> Option<u32> {
    let mut votes: HashMap<u32, usize> = HashMap::new();
    for nid in nodes {
        if let Some(part) = node_to_part.get(nid) {
            *votes.entry(*part).or_default() += 1;
        }
    }
    votes
        .into_iter()
        .max_by_key(|&(part, count)| (count, std::cmp::Reverse(part)))
        .map(|(part, _)| part)
}
