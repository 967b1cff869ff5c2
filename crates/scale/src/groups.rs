//! Per-file scale groups
//!
//! One group per catalogued file: which materials, properties, mass
//! elements, and CONRODs the file owns that carry scalable mass content,
//! plus the computable mass total before scaling.

// standard library
use std::collections::BTreeSet;

// fetools crates
use fetools_bulk::cards::{Element, Material};
use fetools_bulk::{mass_by_file, Family, Model};

/// Scalable content owned by one include file
#[derive(Debug, Clone, Default)]
pub struct ScaleGroup {
    /// Catalog file index
    pub file: usize,
    /// File name for reporting
    pub filename: String,
    /// Computable mass before scaling
    pub original_mass: f64,
    /// Materials with a non-zero density of a scalable kind
    pub material_ids: BTreeSet<u32>,
    /// Properties with a non-zero non-structural mass
    pub property_ids: BTreeSet<u32>,
    /// Concentrated and scalar mass elements
    pub mass_elem_ids: BTreeSet<u32>,
    /// CONRODs with a non-zero non-structural mass
    pub conrod_ids: BTreeSet<u32>,
}

impl ScaleGroup {
    /// Anything at all to scale in this file?
    pub fn is_empty(&self) -> bool {
        self.material_ids.is_empty()
            && self.property_ids.is_empty()
            && self.mass_elem_ids.is_empty()
            && self.conrod_ids.is_empty()
    }
}

/// Density lives on every material kind, but only the structural kinds
/// take part in mass scaling
fn rho_scalable(material: &Material) -> bool {
    matches!(
        material,
        Material::Mat1(_) | Material::Mat8(_) | Material::Mat9(_)
    ) && material.rho() != 0.0
}

/// Build one group per catalogued file
pub fn build_groups(model: &Model) -> Vec<ScaleGroup> {
    let masses = mass_by_file(model);
    let mut groups: Vec<ScaleGroup> = model
        .catalog
        .files
        .iter()
        .enumerate()
        .map(|(file, catalog)| ScaleGroup {
            file,
            filename: catalog
                .path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
            original_mass: masses.get(&file).copied().unwrap_or(0.0),
            ..Default::default()
        })
        .collect();

    for (mid, material) in &model.materials {
        if !rho_scalable(material) {
            continue;
        }
        if let Some(file) = model.catalog.owner(Family::Material, *mid) {
            groups[file].material_ids.insert(*mid);
        }
    }

    for (pid, property) in &model.properties {
        let has_nsm = property.nsm().is_some_and(|nsm| nsm != 0.0);
        if !has_nsm {
            continue;
        }
        if let Some(file) = model.catalog.owner(Family::Property, *pid) {
            groups[file].property_ids.insert(*pid);
        }
    }

    for eid in model.masses.keys() {
        if let Some(file) = model.catalog.owner(Family::Element, *eid) {
            groups[file].mass_elem_ids.insert(*eid);
        }
    }

    for (eid, element) in &model.elements {
        let Element::Conrod(conrod) = element else {
            continue;
        };
        if conrod.nsm == 0.0 {
            continue;
        }
        if let Some(file) = model.catalog.owner(Family::Element, *eid) {
            groups[file].conrod_ids.insert(*eid);
        }
    }

    groups
}

/// Multiply the group's scalars into the model in place
pub fn apply_scale(model: &mut Model, group: &ScaleGroup, factor: f64) {
    for mid in &group.material_ids {
        if let Some(material) = model.materials.get_mut(mid) {
            *material.rho_mut() *= factor;
        }
    }
    for pid in &group.property_ids {
        if let Some(property) = model.properties.get_mut(pid) {
            if let Some(nsm) = property.nsm_mut() {
                *nsm *= factor;
            }
        }
    }
    for eid in &group.mass_elem_ids {
        if let Some(mass) = model.masses.get_mut(eid) {
            mass.scale_mass(factor);
        }
    }
    for eid in &group.conrod_ids {
        if let Some(Element::Conrod(conrod)) = model.elements.get_mut(eid) {
            conrod.nsm *= factor;
        }
    }
}
