//! The typed model store
//!
//! One invocation owns one `Model`; no transform re-enters another. Cards
//! are keyed by primary id per family. Constraint and load families map
//! set id to the accumulated card list, since several cards may share one
//! set (union semantics).

// standard library
use std::collections::{BTreeMap, HashMap};

// crate modules
use crate::cards::{
    Contact, Coord, Element, Load, MassElement, Material, Method, MpcCard, Node, Param, Property,
    Set, SpcCard, TableCard,
};
use crate::catalog::IncludeCatalog;
use crate::registry::Family;

// external crates
use fetools_utils::f;

/// Executive and case control text of the main file, kept verbatim
#[derive(Debug, Clone, Default)]
pub struct SectionLines {
    /// Everything up to and including CEND
    pub executive: Vec<String>,
    /// Between CEND and BEGIN BULK
    pub case_control: Vec<String>,
}

/// A parsed deck: typed cards plus the ownership catalog
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// File ownership catalog from the text-only pass
    pub catalog: IncludeCatalog,
    /// Main file executive and case control
    pub sections: SectionLines,

    pub nodes: BTreeMap<u32, Node>,
    pub elements: BTreeMap<u32, Element>,
    pub rigid_elements: BTreeMap<u32, crate::cards::RigidElement>,
    pub masses: BTreeMap<u32, MassElement>,
    pub properties: BTreeMap<u32, Property>,
    pub materials: BTreeMap<u32, Material>,
    pub coords: BTreeMap<u32, Coord>,
    /// Set id to accumulated constraint cards
    pub spcs: BTreeMap<u32, Vec<SpcCard>>,
    pub mpcs: BTreeMap<u32, Vec<MpcCard>>,
    pub loads: BTreeMap<u32, Vec<Load>>,
    /// Contact ids may be shared across card types (surface 1, set 1)
    pub contacts: BTreeMap<u32, Vec<Contact>>,
    pub sets: BTreeMap<u32, Set>,
    pub methods: BTreeMap<u32, Method>,
    pub tables: BTreeMap<u32, TableCard>,
    pub params: BTreeMap<String, Param>,

    /// Cards read as passthrough text via the skip list, per file index
    pub skipped: BTreeMap<usize, Vec<String>>,
    /// Comment block immediately above a card, kept for naming
    pub comments: HashMap<(Family, u32), String>,
}

impl Model {
    pub fn new() -> Self {
        Default::default()
    }

    /// Total element count across structural, rigid, and mass elements
    pub fn element_count(&self) -> usize {
        self.elements.len() + self.rigid_elements.len() + self.masses.len()
    }

    /// Does any card in the store carry this element id?
    pub fn has_element_id(&self, eid: u32) -> bool {
        self.elements.contains_key(&eid)
            || self.rigid_elements.contains_key(&eid)
            || self.masses.contains_key(&eid)
    }

    /// All ids present for a family, across the relevant maps
    pub fn ids(&self, family: Family) -> Vec<u32> {
        match family {
            Family::Node => self.nodes.keys().copied().collect(),
            Family::Element => {
                let mut ids: Vec<u32> = self.elements.keys().copied().collect();
                ids.extend(self.rigid_elements.keys());
                ids.extend(self.masses.keys());
                ids.sort_unstable();
                ids
            }
            Family::Property => self.properties.keys().copied().collect(),
            Family::Material => self.materials.keys().copied().collect(),
            Family::Coord => self.coords.keys().copied().collect(),
            Family::Spc => self.spcs.keys().copied().collect(),
            Family::Mpc => self.mpcs.keys().copied().collect(),
            Family::Load => self.loads.keys().copied().collect(),
            Family::Contact => self.contacts.keys().copied().collect(),
            Family::Set => self.sets.keys().copied().collect(),
            Family::Method => self.methods.keys().copied().collect(),
            Family::Table => self.tables.keys().copied().collect(),
            Family::Param => Vec::new(),
        }
    }

    /// Human-readable per-family count table
    pub fn summary(&self) -> String {
        let rows = [
            ("nodes", self.nodes.len()),
            ("elements", self.elements.len()),
            ("rigid elements", self.rigid_elements.len()),
            ("mass elements", self.masses.len()),
            ("properties", self.properties.len()),
            ("materials", self.materials.len()),
            ("coords", self.coords.len()),
            ("spc sets", self.spcs.len()),
            ("mpc sets", self.mpcs.len()),
            ("load sets", self.loads.len()),
            ("contact ids", self.contacts.len()),
            ("sets", self.sets.len()),
            ("methods", self.methods.len()),
            ("tables", self.tables.len()),
            ("params", self.params.len()),
        ];
        let mut out = String::new();
        for (label, count) in rows {
            if count > 0 {
                out.push_str(&f!("{label:>16}: {count}\n"));
            }
        }
        out.push_str(&f!("{:>16}: {}\n", "files", self.catalog.files.len()));
        out
    }

    /// Comment text attached to a card, if any
    pub fn comment(&self, family: Family, id: u32) -> Option<&str> {
        self.comments.get(&(family, id)).map(String::as_str)
    }

    /// Write the per-file ownership breakdown as JSON
    ///
    /// One entry per catalogued file with (count, min, max) per family,
    /// the shape downstream tooling wants for range planning.
    pub fn write_summary_json<P: AsRef<std::path::Path>>(&self, path: P) -> crate::Result<()> {
        let files: Vec<serde_json::Value> = self
            .catalog
            .files
            .iter()
            .map(|file| {
                let families: serde_json::Map<String, serde_json::Value> = file
                    .ids
                    .iter()
                    .map(|(family, ids)| {
                        (
                            family.to_string(),
                            serde_json::json!({
                                "count": ids.len(),
                                "min": ids.first(),
                                "max": ids.last(),
                            }),
                        )
                    })
                    .collect();
                serde_json::json!({
                    "path": file.path.display().to_string(),
                    "families": families,
                    "passthrough_lines": file.passthrough.len(),
                })
            })
            .collect();

        let text = serde_json::to_string_pretty(&serde_json::json!({ "files": files }))?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// `PARAM WTMASS` value, defaulting to 1.0
    pub fn wtmass(&self) -> f64 {
        self.params
            .get("WTMASS")
            .and_then(Param::real)
            .unwrap_or(1.0)
    }
}
