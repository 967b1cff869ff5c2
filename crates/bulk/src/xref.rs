//! Cross-reference view
//!
//! Resolution is a derived, read-only index over the store: cards keep
//! their integer ids and the view checks that every id-valued slot lands
//! on a live card of the expected family. Dangling references are
//! collected, never fatal. The symmetric un-cross-reference is simply
//! dropping the view; any transform that reindexes ids must rebuild it.

// crate modules
use crate::cards::{
    Contact, CoordDef, Element, Load, MassElement, MpcCard, Node, Property, RigidElement,
    SpcCard, ThetaMcid,
};
use crate::model::Model;
use crate::registry::Family;

// external crates
use log::warn;

/// One unresolved id reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub from_family: Family,
    pub from_id: u32,
    /// Which slot of the referencing card
    pub slot: &'static str,
    pub to_family: Family,
    pub to_id: u32,
}

impl std::fmt::Display for DanglingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} slot {} -> missing {} {}",
            self.from_family, self.from_id, self.slot, self.to_family, self.to_id
        )
    }
}

/// Resolved view over a model
#[derive(Debug)]
pub struct Xref<'a> {
    model: &'a Model,
    /// Every reference that failed to resolve
    pub dangling: Vec<DanglingRef>,
}

impl<'a> Xref<'a> {
    /// Walk every card and resolve every reference slot
    pub fn build(model: &'a Model) -> Self {
        let mut xref = Self {
            model,
            dangling: Vec::new(),
        };
        xref.check_nodes();
        xref.check_coords();
        xref.check_elements();
        xref.check_rigid_elements();
        xref.check_masses();
        xref.check_properties();
        xref.check_constraints();
        xref.check_loads();
        xref.check_contacts();
        for dangling in &xref.dangling {
            warn!("{dangling}");
        }
        xref
    }

    /// No dangling references at all?
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
    }

    // ! Resolution helpers

    pub fn node(&self, nid: u32) -> Option<&Node> {
        self.model.nodes.get(&nid)
    }

    pub fn property(&self, pid: u32) -> Option<&Property> {
        self.model.properties.get(&pid)
    }

    /// Property of an element, through its pid slot
    pub fn element_property(&self, element: &Element) -> Option<&Property> {
        element.pid().and_then(|pid| self.property(pid))
    }

    /// Material of an element, through property mids or the CONROD mid
    pub fn element_material(&self, element: &Element) -> Option<&crate::cards::Material> {
        if let Element::Conrod(conrod) = element {
            return self.model.materials.get(&conrod.mid);
        }
        let property = self.element_property(element)?;
        let mid = property.mids().into_iter().next()?;
        self.model.materials.get(&mid)
    }

    // ! Checks

    fn push(
        &mut self,
        from_family: Family,
        from_id: u32,
        slot: &'static str,
        to_family: Family,
        to_id: u32,
    ) {
        self.dangling.push(DanglingRef {
            from_family,
            from_id,
            slot,
            to_family,
            to_id,
        });
    }

    fn check_node_ref(&mut self, from: Family, from_id: u32, slot: &'static str, nid: u32) {
        if nid != 0 && !self.model.nodes.contains_key(&nid) {
            self.push(from, from_id, slot, Family::Node, nid);
        }
    }

    fn check_coord_ref(&mut self, from: Family, from_id: u32, slot: &'static str, cid: u32) {
        // cid 0 is the basic frame and always resolves
        if cid != 0 && !self.model.coords.contains_key(&cid) {
            self.push(from, from_id, slot, Family::Coord, cid);
        }
    }

    fn check_material_ref(&mut self, from: Family, from_id: u32, slot: &'static str, mid: u32) {
        if mid != 0 && !self.model.materials.contains_key(&mid) {
            self.push(from, from_id, slot, Family::Material, mid);
        }
    }

    fn check_nodes(&mut self) {
        let mut findings = Vec::new();
        for node in self.model.nodes.values() {
            if let Node::Grid(grid) = node {
                for (slot, cid) in [("cp", grid.cp), ("cd", grid.cd)] {
                    if let Some(cid) = cid {
                        findings.push((grid.nid, slot, cid));
                    }
                }
            }
        }
        for (nid, slot, cid) in findings {
            self.check_coord_ref(Family::Node, nid, slot, cid);
        }
    }

    fn check_coords(&mut self) {
        let mut findings = Vec::new();
        for coord in self.model.coords.values() {
            match &coord.def {
                CoordDef::Frame { rid, .. } => findings.push((coord.cid, "rid", *rid, true)),
                CoordDef::Points { g1, g2, g3 } => {
                    findings.push((coord.cid, "g1", *g1, false));
                    findings.push((coord.cid, "g2", *g2, false));
                    findings.push((coord.cid, "g3", *g3, false));
                }
            }
        }
        for (cid, slot, id, is_coord) in findings {
            if is_coord {
                self.check_coord_ref(Family::Coord, cid, slot, id);
            } else {
                self.check_node_ref(Family::Coord, cid, slot, id);
            }
        }
    }

    fn check_elements(&mut self) {
        let mut node_refs = Vec::new();
        let mut pid_refs = Vec::new();
        let mut mid_refs = Vec::new();
        let mut cid_refs = Vec::new();

        for element in self.model.elements.values() {
            let eid = element.eid();
            for nid in element.nodes() {
                node_refs.push((eid, nid));
            }
            if let Some(pid) = element.pid() {
                pid_refs.push((eid, pid));
            }
            match element {
                Element::Conrod(conrod) => mid_refs.push((eid, conrod.mid)),
                Element::Shell(shell) => {
                    if let Some(ThetaMcid::Cid(cid)) = shell.theta_mcid {
                        cid_refs.push((eid, "theta_mcid", cid));
                    }
                }
                Element::Bush(bush) => {
                    if let Some(cid) = bush.cid {
                        cid_refs.push((eid, "cid", cid));
                    }
                }
                Element::Gap(gap) => {
                    if let Some(cid) = gap.cid {
                        cid_refs.push((eid, "cid", cid));
                    }
                }
                _ => {}
            }
        }

        for (eid, nid) in node_refs {
            self.check_node_ref(Family::Element, eid, "nodes", nid);
        }
        for (eid, pid) in pid_refs {
            if !self.model.properties.contains_key(&pid) {
                self.push(Family::Element, eid, "pid", Family::Property, pid);
            }
        }
        for (eid, mid) in mid_refs {
            self.check_material_ref(Family::Element, eid, "mid", mid);
        }
        for (eid, slot, cid) in cid_refs {
            self.check_coord_ref(Family::Element, eid, slot, cid);
        }
    }

    fn check_rigid_elements(&mut self) {
        let mut node_refs = Vec::new();
        for element in self.model.rigid_elements.values() {
            for nid in element.nodes() {
                node_refs.push((element.eid(), nid));
            }
            // Independent and dependent nodes of an RBE2 must be distinct
            if let RigidElement::Rbe2(rbe2) = element {
                if rbe2.gmi.iter().any(|&g| g == rbe2.gn) {
                    warn!("RBE2 {} lists its independent node {} as dependent", rbe2.eid, rbe2.gn);
                }
            }
        }
        for (eid, nid) in node_refs {
            self.check_node_ref(Family::Element, eid, "nodes", nid);
        }
    }

    fn check_masses(&mut self) {
        let mut node_refs = Vec::new();
        let mut cid_refs = Vec::new();
        for element in self.model.masses.values() {
            for nid in element.nodes() {
                node_refs.push((element.eid(), nid));
            }
            if let MassElement::Conm2(conm2) = element {
                if let Some(cid) = conm2.cid {
                    if cid > 0 {
                        cid_refs.push((conm2.eid, cid as u32));
                    }
                }
            }
        }
        for (eid, nid) in node_refs {
            self.check_node_ref(Family::Element, eid, "nodes", nid);
        }
        for (eid, cid) in cid_refs {
            self.check_coord_ref(Family::Element, eid, "cid", cid);
        }
    }

    fn check_properties(&mut self) {
        let mut mid_refs = Vec::new();
        for property in self.model.properties.values() {
            for mid in property.mids() {
                mid_refs.push((property.pid(), mid));
            }
        }
        for (pid, mid) in mid_refs {
            self.check_material_ref(Family::Property, pid, "mid", mid);
        }
    }

    fn check_constraints(&mut self) {
        let mut node_refs = Vec::new();
        let mut spc_set_refs = Vec::new();
        let mut mpc_set_refs = Vec::new();

        for (sid, cards) in &self.model.spcs {
            for card in cards {
                match card {
                    SpcCard::SpcAdd(add) => {
                        for set in &add.sets {
                            spc_set_refs.push((*sid, *set));
                        }
                    }
                    _ => {
                        for nid in card.nodes() {
                            node_refs.push((Family::Spc, *sid, nid));
                        }
                    }
                }
            }
        }
        for (sid, cards) in &self.model.mpcs {
            for card in cards {
                match card {
                    MpcCard::MpcAdd(add) => {
                        for set in &add.sets {
                            mpc_set_refs.push((*sid, *set));
                        }
                    }
                    MpcCard::Mpc(_) => {
                        for nid in card.nodes() {
                            node_refs.push((Family::Mpc, *sid, nid));
                        }
                    }
                }
            }
        }

        for (family, sid, nid) in node_refs {
            self.check_node_ref(family, sid, "nodes", nid);
        }
        for (sid, set) in spc_set_refs {
            if !self.model.spcs.contains_key(&set) {
                self.push(Family::Spc, sid, "sets", Family::Spc, set);
            }
        }
        for (sid, set) in mpc_set_refs {
            if !self.model.mpcs.contains_key(&set) {
                self.push(Family::Mpc, sid, "sets", Family::Mpc, set);
            }
        }
    }

    fn check_loads(&mut self) {
        let mut node_refs = Vec::new();
        let mut eid_refs = Vec::new();
        let mut set_refs = Vec::new();

        for (sid, cards) in &self.model.loads {
            for card in cards {
                for nid in card.nodes() {
                    node_refs.push((*sid, nid));
                }
                for eid in card.eids() {
                    eid_refs.push((*sid, eid));
                }
                match card {
                    Load::Combo(combo) => {
                        for (_, set) in &combo.terms {
                            set_refs.push((*sid, *set));
                        }
                    }
                    Load::Dload(dload) => {
                        for (_, set) in &dload.terms {
                            set_refs.push((*sid, *set));
                        }
                    }
                    _ => {}
                }
            }
        }

        for (sid, nid) in node_refs {
            self.check_node_ref(Family::Load, sid, "nodes", nid);
        }
        for (sid, eid) in eid_refs {
            if !self.model.has_element_id(eid) {
                self.push(Family::Load, sid, "eids", Family::Element, eid);
            }
        }
        for (sid, set) in set_refs {
            if !self.model.loads.contains_key(&set) {
                self.push(Family::Load, sid, "terms", Family::Load, set);
            }
        }
    }

    fn check_contacts(&mut self) {
        let mut eid_refs = Vec::new();
        let mut surface_refs = Vec::new();

        for (sid, cards) in &self.model.contacts {
            for card in cards {
                for eid in card.eids() {
                    eid_refs.push((*sid, eid));
                }
                if let Contact::Bctset(set) = card {
                    for row in &set.rows {
                        surface_refs.push((*sid, row.source));
                        surface_refs.push((*sid, row.target));
                    }
                }
            }
        }

        for (sid, eid) in eid_refs {
            if !self.model.has_element_id(eid) {
                self.push(Family::Contact, sid, "eids", Family::Element, eid);
            }
        }
        for (sid, surface) in surface_refs {
            if !self.model.contacts.contains_key(&surface) {
                self.push(Family::Contact, sid, "pair", Family::Contact, surface);
            }
        }
    }
}

