//! Id remapping across every card and reference slot
//!
//! `IdMaps` holds one old-to-new map per family. Applying it walks every
//! card in the store and substitutes both primary ids and reference
//! slots; absent mappings pass through unchanged. Transforms build the
//! maps, apply them, and rebuild any cross-reference view afterwards.

// standard library
use std::collections::{BTreeMap, HashMap};

// crate modules
use crate::cards::{
    BushOrient, Contact, CoordDef, Element, HeatBoundary, Load, MassElement, MpcCard, Node,
    Orientation, SpcCard, ThetaMcid,
};
use crate::model::Model;
use crate::registry::Family;

/// Old-id to new-id maps, one per family
///
/// The basic coordinate frame (cid 0) is never remapped; a zero id always
/// passes through.
#[derive(Debug, Clone, Default)]
pub struct IdMaps {
    pub nodes: HashMap<u32, u32>,
    pub elements: HashMap<u32, u32>,
    pub properties: HashMap<u32, u32>,
    pub materials: HashMap<u32, u32>,
    pub coords: HashMap<u32, u32>,
    pub spcs: HashMap<u32, u32>,
    pub mpcs: HashMap<u32, u32>,
    pub loads: HashMap<u32, u32>,
    pub contacts: HashMap<u32, u32>,
    pub sets: HashMap<u32, u32>,
    pub methods: HashMap<u32, u32>,
    pub tables: HashMap<u32, u32>,
}

fn lookup(map: &HashMap<u32, u32>, id: u32) -> u32 {
    if id == 0 {
        return 0;
    }
    map.get(&id).copied().unwrap_or(id)
}

impl IdMaps {
    pub fn new() -> Self {
        Default::default()
    }

    /// True when every map is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
            && self.elements.is_empty()
            && self.properties.is_empty()
            && self.materials.is_empty()
            && self.coords.is_empty()
            && self.spcs.is_empty()
            && self.mpcs.is_empty()
            && self.loads.is_empty()
            && self.contacts.is_empty()
            && self.sets.is_empty()
            && self.methods.is_empty()
            && self.tables.is_empty()
    }

    /// Map an id through the family's table, passing through when absent
    pub fn get(&self, family: Family, id: u32) -> u32 {
        match family {
            Family::Node => lookup(&self.nodes, id),
            Family::Element => lookup(&self.elements, id),
            Family::Property => lookup(&self.properties, id),
            Family::Material => lookup(&self.materials, id),
            Family::Coord => lookup(&self.coords, id),
            Family::Spc => lookup(&self.spcs, id),
            Family::Mpc => lookup(&self.mpcs, id),
            Family::Load => lookup(&self.loads, id),
            Family::Contact => lookup(&self.contacts, id),
            Family::Set => lookup(&self.sets, id),
            Family::Method => lookup(&self.methods, id),
            Family::Table => lookup(&self.tables, id),
            Family::Param => id,
        }
    }

    pub fn node(&self, id: u32) -> u32 {
        lookup(&self.nodes, id)
    }

    pub fn element(&self, id: u32) -> u32 {
        lookup(&self.elements, id)
    }

    pub fn coord(&self, id: u32) -> u32 {
        lookup(&self.coords, id)
    }

    fn node_opt(&self, id: Option<u32>) -> Option<u32> {
        id.map(|id| self.node(id))
    }

    fn coord_opt(&self, id: Option<u32>) -> Option<u32> {
        id.map(|id| self.coord(id))
    }

    fn node_list(&self, ids: &mut [u32]) {
        for id in ids {
            *id = self.node(*id);
        }
    }
}

impl Model {
    /// Apply id maps to every card: primary ids and reference slots
    ///
    /// Any cross-reference view taken before this call is stale and must
    /// be rebuilt.
    pub fn apply_maps(&mut self, maps: &IdMaps) {
        self.remap_nodes(maps);
        self.remap_coords(maps);
        self.remap_elements(maps);
        self.remap_rigid_elements(maps);
        self.remap_masses(maps);
        self.remap_properties(maps);
        self.remap_materials(maps);
        self.remap_spcs(maps);
        self.remap_mpcs(maps);
        self.remap_loads(maps);
        self.remap_contacts(maps);
        self.remap_sets(maps);
        self.remap_methods(maps);
        self.remap_tables(maps);
        self.remap_comments(maps);
    }

    fn remap_nodes(&mut self, maps: &IdMaps) {
        let mut new_nodes = BTreeMap::new();
        for (nid, mut node) in std::mem::take(&mut self.nodes) {
            let new_nid = maps.node(nid);
            node.set_nid(new_nid);
            if let Node::Grid(grid) = &mut node {
                grid.cp = maps.coord_opt(grid.cp);
                grid.cd = maps.coord_opt(grid.cd);
            }
            new_nodes.insert(new_nid, node);
        }
        self.nodes = new_nodes;
    }

    fn remap_coords(&mut self, maps: &IdMaps) {
        let mut new_coords = BTreeMap::new();
        for (cid, mut coord) in std::mem::take(&mut self.coords) {
            // cid 0 is the immutable basic frame
            let new_cid = if cid == 0 { 0 } else { maps.coord(cid) };
            coord.cid = new_cid;
            match &mut coord.def {
                CoordDef::Frame { rid, .. } => *rid = maps.coord(*rid),
                CoordDef::Points { g1, g2, g3 } => {
                    *g1 = maps.node(*g1);
                    *g2 = maps.node(*g2);
                    *g3 = maps.node(*g3);
                }
            }
            new_coords.insert(new_cid, coord);
        }
        self.coords = new_coords;
    }

    fn remap_elements(&mut self, maps: &IdMaps) {
        let mut new_elements = BTreeMap::new();
        for (eid, mut element) in std::mem::take(&mut self.elements) {
            let new_eid = maps.element(eid);
            element.set_eid(new_eid);
            match &mut element {
                Element::Shell(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    maps.node_list(&mut e.nodes);
                    if let Some(ThetaMcid::Cid(cid)) = &mut e.theta_mcid {
                        *cid = maps.coord(*cid);
                    }
                }
                Element::Solid(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    maps.node_list(&mut e.nodes);
                }
                Element::Bar(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    e.ga = maps.node(e.ga);
                    e.gb = maps.node(e.gb);
                    if let Orientation::Node(g0) = &mut e.orient {
                        *g0 = maps.node(*g0);
                    }
                }
                Element::Rod(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    e.ga = maps.node(e.ga);
                    e.gb = maps.node(e.gb);
                }
                Element::Conrod(e) => {
                    e.mid = lookup(&maps.materials, e.mid);
                    e.ga = maps.node(e.ga);
                    e.gb = maps.node(e.gb);
                }
                Element::Bush(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    e.ga = maps.node(e.ga);
                    e.gb = maps.node_opt(e.gb);
                    e.cid = maps.coord_opt(e.cid);
                    if let BushOrient::Node(g0) = &mut e.orient {
                        if *g0 > 0 {
                            *g0 = maps.node(*g0);
                        }
                    }
                }
                Element::Spring(e) => {
                    if let Some(pid) = &mut e.pid {
                        *pid = lookup(&maps.properties, *pid);
                    }
                    e.g1 = maps.node(e.g1);
                    e.g2 = maps.node(e.g2);
                }
                Element::Damper(e) => {
                    if let Some(pid) = &mut e.pid {
                        *pid = lookup(&maps.properties, *pid);
                    }
                    e.g1 = maps.node(e.g1);
                    e.g2 = maps.node(e.g2);
                }
                Element::Gap(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    e.ga = maps.node(e.ga);
                    e.gb = maps.node(e.gb);
                    e.cid = maps.coord_opt(e.cid);
                    if let Orientation::Node(g0) = &mut e.orient {
                        *g0 = maps.node(*g0);
                    }
                }
                Element::Weld(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    e.gs = maps.node_opt(e.gs);
                }
                Element::Fast(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    e.gs = maps.node_opt(e.gs);
                    e.ga = maps.node_opt(e.ga);
                    e.gb = maps.node_opt(e.gb);
                }
                Element::Visc(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    e.ga = maps.node(e.ga);
                    e.gb = maps.node(e.gb);
                }
                Element::Shear(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    maps.node_list(&mut e.nodes);
                }
                Element::Plotel(e) => {
                    e.g1 = maps.node(e.g1);
                    e.g2 = maps.node(e.g2);
                }
                Element::HeatBoundary(HeatBoundary::Grids { nodes, .. }) => {
                    maps.node_list(nodes);
                }
                Element::HeatBoundary(HeatBoundary::ElementSide { eid2, .. }) => {
                    *eid2 = maps.element(*eid2);
                }
            }
            new_elements.insert(new_eid, element);
        }
        self.elements = new_elements;
    }

    fn remap_rigid_elements(&mut self, maps: &IdMaps) {
        let mut new_rigid = BTreeMap::new();
        for (eid, mut element) in std::mem::take(&mut self.rigid_elements) {
            let new_eid = maps.element(eid);
            element.set_eid(new_eid);
            match &mut element {
                crate::cards::RigidElement::Rbe2(e) => {
                    e.gn = maps.node(e.gn);
                    maps.node_list(&mut e.gmi);
                }
                crate::cards::RigidElement::Rbe3(e) => {
                    e.refgrid = maps.node(e.refgrid);
                    for group in &mut e.groups {
                        maps.node_list(&mut group.nodes);
                    }
                }
                crate::cards::RigidElement::Rbar(e) => {
                    e.ga = maps.node(e.ga);
                    e.gb = maps.node(e.gb);
                }
            }
            new_rigid.insert(new_eid, element);
        }
        self.rigid_elements = new_rigid;
    }

    fn remap_masses(&mut self, maps: &IdMaps) {
        let mut new_masses = BTreeMap::new();
        for (eid, mut element) in std::mem::take(&mut self.masses) {
            let new_eid = maps.element(eid);
            element.set_eid(new_eid);
            match &mut element {
                MassElement::Conm1(e) => {
                    e.nid = maps.node(e.nid);
                    e.cid = maps.coord_opt(e.cid);
                }
                MassElement::Conm2(e) => {
                    e.nid = maps.node(e.nid);
                    // -1 selects a frame convention, not a coordinate card
                    if let Some(cid) = &mut e.cid {
                        if *cid > 0 {
                            *cid = maps.coord(*cid as u32) as i64;
                        }
                    }
                }
                MassElement::Cmass1(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    e.g1 = maps.node(e.g1);
                    e.g2 = maps.node_opt(e.g2);
                }
                MassElement::Cmass2(e) => {
                    e.g1 = maps.node(e.g1);
                    e.g2 = maps.node_opt(e.g2);
                }
                MassElement::Cmass3(e) => {
                    e.pid = lookup(&maps.properties, e.pid);
                    e.s1 = maps.node(e.s1);
                    e.s2 = maps.node_opt(e.s2);
                }
                MassElement::Cmass4(e) => {
                    e.s1 = maps.node(e.s1);
                    e.s2 = maps.node_opt(e.s2);
                }
            }
            new_masses.insert(new_eid, element);
        }
        self.masses = new_masses;
    }

    fn remap_properties(&mut self, maps: &IdMaps) {
        use crate::cards::Property;
        let mut new_props = BTreeMap::new();
        for (pid, mut property) in std::mem::take(&mut self.properties) {
            let new_pid = lookup(&maps.properties, pid);
            property.set_pid(new_pid);
            match &mut property {
                Property::Shell(p) => {
                    for mid in [&mut p.mid1, &mut p.mid2, &mut p.mid3, &mut p.mid4] {
                        if let Some(mid) = mid {
                            *mid = lookup(&maps.materials, *mid);
                        }
                    }
                }
                Property::Comp(p) => {
                    for ply in &mut p.plies {
                        ply.mid = lookup(&maps.materials, ply.mid);
                    }
                }
                Property::CompG(p) => {
                    for ply in &mut p.plies {
                        ply.mid = lookup(&maps.materials, ply.mid);
                    }
                }
                Property::Solid(p) => {
                    p.mid = lookup(&maps.materials, p.mid);
                    if let Some(cordm) = &mut p.cordm {
                        if *cordm > 0 {
                            *cordm = maps.coord(*cordm as u32) as i64;
                        }
                    }
                }
                Property::LSolid(p) => p.mid = lookup(&maps.materials, p.mid),
                Property::Bar(p) => p.mid = lookup(&maps.materials, p.mid),
                Property::BarL(p) => p.mid = lookup(&maps.materials, p.mid),
                Property::Beam(p) => p.mid = lookup(&maps.materials, p.mid),
                Property::BeamL(p) => p.mid = lookup(&maps.materials, p.mid),
                Property::Rod(p) => p.mid = lookup(&maps.materials, p.mid),
                Property::Shear(p) => p.mid = lookup(&maps.materials, p.mid),
                Property::Weld(p) => p.mid = lookup(&maps.materials, p.mid),
                // No material or coordinate references
                Property::Bush(_)
                | Property::BushT(_)
                | Property::Elas(_)
                | Property::Damp(_)
                | Property::Gap(_)
                | Property::Fast(_)
                | Property::Visc(_) => {}
            }
            new_props.insert(new_pid, property);
        }
        self.properties = new_props;
    }

    fn remap_materials(&mut self, maps: &IdMaps) {
        let mut new_mats = BTreeMap::new();
        for (mid, mut material) in std::mem::take(&mut self.materials) {
            let new_mid = lookup(&maps.materials, mid);
            material.set_mid(new_mid);
            new_mats.insert(new_mid, material);
        }
        self.materials = new_mats;
    }

    fn remap_spcs(&mut self, maps: &IdMaps) {
        let mut new_spcs: BTreeMap<u32, Vec<SpcCard>> = BTreeMap::new();
        for (sid, cards) in std::mem::take(&mut self.spcs) {
            let new_sid = lookup(&maps.spcs, sid);
            for mut card in cards {
                card.set_sid(new_sid);
                match &mut card {
                    SpcCard::Spc(c) => {
                        for entry in &mut c.entries {
                            entry.node = maps.node(entry.node);
                        }
                    }
                    SpcCard::Spc1(c) => maps.node_list(&mut c.nodes),
                    SpcCard::SpcAdd(c) => {
                        for set in &mut c.sets {
                            *set = lookup(&maps.spcs, *set);
                        }
                    }
                }
                new_spcs.entry(new_sid).or_default().push(card);
            }
        }
        self.spcs = new_spcs;
    }

    fn remap_mpcs(&mut self, maps: &IdMaps) {
        let mut new_mpcs: BTreeMap<u32, Vec<MpcCard>> = BTreeMap::new();
        for (sid, cards) in std::mem::take(&mut self.mpcs) {
            let new_sid = lookup(&maps.mpcs, sid);
            for mut card in cards {
                card.set_sid(new_sid);
                match &mut card {
                    MpcCard::Mpc(c) => {
                        for term in &mut c.terms {
                            term.node = maps.node(term.node);
                        }
                    }
                    MpcCard::MpcAdd(c) => {
                        for set in &mut c.sets {
                            *set = lookup(&maps.mpcs, *set);
                        }
                    }
                }
                new_mpcs.entry(new_sid).or_default().push(card);
            }
        }
        self.mpcs = new_mpcs;
    }

    fn remap_loads(&mut self, maps: &IdMaps) {
        let mut new_loads: BTreeMap<u32, Vec<Load>> = BTreeMap::new();
        for (sid, cards) in std::mem::take(&mut self.loads) {
            let new_sid = lookup(&maps.loads, sid);
            for mut card in cards {
                card.set_sid(new_sid);
                match &mut card {
                    Load::Force(c) => {
                        c.node = maps.node(c.node);
                        c.cid = maps.coord_opt(c.cid);
                    }
                    Load::Moment(c) => {
                        c.node = maps.node(c.node);
                        c.cid = maps.coord_opt(c.cid);
                    }
                    Load::Pload(c) => maps.node_list(&mut c.nodes),
                    Load::Pload2(c) => {
                        for eid in &mut c.eids {
                            *eid = maps.element(*eid);
                        }
                    }
                    Load::Pload4(c) => {
                        c.eid = maps.element(c.eid);
                        c.g1 = maps.node_opt(c.g1);
                        c.g34 = maps.node_opt(c.g34);
                        c.cid = maps.coord_opt(c.cid);
                    }
                    Load::Grav(c) => c.cid = maps.coord_opt(c.cid),
                    Load::Combo(c) => {
                        for (_, set) in &mut c.terms {
                            *set = lookup(&maps.loads, *set);
                        }
                    }
                    Load::Rforce(c) => {
                        c.node = maps.node(c.node);
                        c.cid = maps.coord_opt(c.cid);
                    }
                    Load::Temp(c) => {
                        for (node, _) in &mut c.pairs {
                            *node = maps.node(*node);
                        }
                    }
                    Load::Tempd(_) => {}
                    Load::Rload1(c) => {
                        c.excite_id = lookup(&maps.loads, c.excite_id);
                        c.tc = c.tc.map(|t| lookup(&maps.tables, t));
                        c.td = c.td.map(|t| lookup(&maps.tables, t));
                    }
                    Load::Rload2(c) => {
                        c.excite_id = lookup(&maps.loads, c.excite_id);
                        c.tb = c.tb.map(|t| lookup(&maps.tables, t));
                        c.tp = c.tp.map(|t| lookup(&maps.tables, t));
                    }
                    Load::Tload1(c) => {
                        c.excite_id = lookup(&maps.loads, c.excite_id);
                        c.tid = c.tid.map(|t| lookup(&maps.tables, t));
                    }
                    Load::Tload2(c) => {
                        c.excite_id = lookup(&maps.loads, c.excite_id);
                    }
                    Load::Darea(c) => {
                        for entry in &mut c.entries {
                            entry.0 = maps.node(entry.0);
                        }
                    }
                    Load::Dload(c) => {
                        for (_, set) in &mut c.terms {
                            *set = lookup(&maps.loads, *set);
                        }
                    }
                }
                new_loads.entry(new_sid).or_default().push(card);
            }
        }
        self.loads = new_loads;
    }

    fn remap_contacts(&mut self, maps: &IdMaps) {
        let mut new_contacts: BTreeMap<u32, Vec<Contact>> = BTreeMap::new();
        for (sid, cards) in std::mem::take(&mut self.contacts) {
            let new_sid = lookup(&maps.contacts, sid);
            for mut card in cards {
                card.set_sid(new_sid);
                match &mut card {
                    Contact::Bsurf(c) => {
                        for eid in &mut c.eids {
                            *eid = maps.element(*eid);
                        }
                    }
                    Contact::Bsurfs(c) => {
                        for entry in &mut c.entries {
                            entry[0] = maps.element(entry[0]);
                            for node in &mut entry[1..] {
                                *node = maps.node(*node);
                            }
                        }
                    }
                    Contact::Bctset(c) => {
                        for row in &mut c.rows {
                            row.source = lookup(&maps.contacts, row.source);
                            row.target = lookup(&maps.contacts, row.target);
                        }
                    }
                    Contact::Bctadd(c) => {
                        for set in &mut c.sets {
                            *set = lookup(&maps.contacts, *set);
                        }
                    }
                    Contact::Bconp(c) => {
                        c.slave = c.slave.map(|s| lookup(&maps.contacts, s));
                        c.master = c.master.map(|m| lookup(&maps.contacts, m));
                        c.cid = maps.coord_opt(c.cid);
                    }
                    Contact::Bcbody(c) => {
                        c.bsid = c.bsid.map(|b| lookup(&maps.contacts, b));
                    }
                    Contact::Blseg(c) => maps.node_list(&mut c.nodes),
                    Contact::Bctpara(_) | Contact::Bctparm(_) | Contact::Bfric(_) => {}
                }
                new_contacts.entry(new_sid).or_default().push(card);
            }
        }
        self.contacts = new_contacts;
    }

    /// SET1/SET3 ids are heterogeneous: apply whichever of the node or
    /// element map hits more ids, breaking ties toward nodes
    fn remap_sets(&mut self, maps: &IdMaps) {
        let mut new_sets = BTreeMap::new();
        for (sid, mut set) in std::mem::take(&mut self.sets) {
            let new_sid = lookup(&maps.sets, sid);
            set.set_sid(new_sid);

            let ids = set.ids_mut();
            let node_hits = ids.iter().filter(|id| maps.nodes.contains_key(id)).count();
            let element_hits = ids
                .iter()
                .filter(|id| maps.elements.contains_key(id))
                .count();
            let map = if node_hits >= element_hits {
                &maps.nodes
            } else {
                &maps.elements
            };
            for id in ids {
                *id = lookup(map, *id);
            }

            new_sets.insert(new_sid, set);
        }
        self.sets = new_sets;
    }

    fn remap_methods(&mut self, maps: &IdMaps) {
        let mut new_methods = BTreeMap::new();
        for (sid, mut method) in std::mem::take(&mut self.methods) {
            let new_sid = lookup(&maps.methods, sid);
            method.set_sid(new_sid);
            new_methods.insert(new_sid, method);
        }
        self.methods = new_methods;
    }

    fn remap_tables(&mut self, maps: &IdMaps) {
        let mut new_tables = BTreeMap::new();
        for (tid, mut table) in std::mem::take(&mut self.tables) {
            let new_tid = lookup(&maps.tables, tid);
            table.set_tid(new_tid);
            new_tables.insert(new_tid, table);
        }
        self.tables = new_tables;
    }

    /// Keep card comments attached through the renumber
    fn remap_comments(&mut self, maps: &IdMaps) {
        let comments = std::mem::take(&mut self.comments);
        self.comments = comments
            .into_iter()
            .map(|((family, id), text)| ((family, maps.get(family, id)), text))
            .collect();
    }
}
