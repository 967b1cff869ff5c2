//! Full deck reader
//!
//! The reader operates in two stages to keep ownership authoritative:
//!
//! - A text-only catalog pass records which include file owns every card
//! - The typed pass lexes each file's bulk section into card objects
//!
//! Unknown cards are already collected as passthrough text by the catalog
//! and are simply skipped here. A caller-supplied skip list forces named
//! cards down the same passthrough path even though their typed parsers
//! exist, which is how partially-supported contact decks stay intact.

// standard library
use std::fs;
use std::path::Path;

// crate modules
use crate::cards::{
    Contact, Coord, Element, Grid, Load, MassElement, Material, Method, MpcCard, Node, Param,
    Property, RigidElement, Set, SpcCard, Spoint, TableCard,
};
use crate::catalog::{extract_card_info, include_path, IncludeCatalog};
use crate::error::{Error, Result};
use crate::field::{is_continuation, lex_card};
use crate::model::Model;
use crate::registry::{family, Family};

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::warn;

/// Reader configuration
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Card names to read as passthrough text instead of typed cards
    pub skip_cards: Vec<String>,
    /// Fail on unknown cards instead of warning
    pub strict: bool,
    /// Do not print the progress indicator
    pub disable_progress: bool,
}

/// Two-stage reader for a deck and its includes
#[derive(Debug, Default)]
pub struct DeckReader {
    options: ReadOptions,
    model: Model,
    /// Non-fatal findings collected during the read
    pub warnings: Vec<String>,
}

/// Read a deck with default options
///
/// ```rust, no_run
/// # use fetools_bulk::read_deck;
/// let model = read_deck("model.bdf").unwrap();
/// println!("{}", model.summary());
/// ```
pub fn read_deck<P: AsRef<Path>>(path: P) -> Result<Model> {
    DeckReader::new().parse(path)
}

/// Read a deck with explicit options
pub fn read_deck_with<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Model> {
    DeckReader::with_options(options).parse(path)
}

impl DeckReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_options(options: ReadOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Parse the deck at `path` plus its transitive includes
    pub fn parse<P: AsRef<Path>>(&mut self, path: P) -> Result<Model> {
        self.model = Model::new();
        self.model.catalog = IncludeCatalog::parse(&path)?;

        let mut progress_bar = self.init_progress_bar();
        if !self.options.disable_progress {
            progress_bar.refresh()?;
        }

        for index in 0..self.model.catalog.files.len() {
            let file_path = self.model.catalog.files[index].path.clone();
            if !file_path.is_file() {
                continue;
            }
            let text = fs::read_to_string(&file_path)?;
            self.parse_file(&text, index, &mut progress_bar)?;
        }

        // do not care about the reader, so give the model to the caller
        Ok(std::mem::take(&mut self.model))
    }

    fn init_progress_bar(&self) -> Bar {
        BarBuilder::default()
            .unit(" lines")
            .unit_scale(true)
            .disable(self.options.disable_progress)
            .bar_format("{count} lines [{rate} lines/s]   ")
            .build()
            .expect("Failed to initialise progress bar")
    }

    /// Typed pass over one file's bulk section
    fn parse_file(&mut self, text: &str, file_index: usize, progress: &mut Bar) -> Result<()> {
        let is_main = file_index == 0;
        let mut in_bulk = !is_main;
        let mut past_exec = !is_main;

        // Current logical card being assembled
        let mut current: Vec<(usize, String)> = Vec::new();
        let mut current_skipped = false;
        // Continuations of an unknown card are passthrough, not orphans
        let mut ignoring = false;
        let mut pending_comment: Vec<String> = Vec::new();

        for (line_number, raw) in text.lines().enumerate() {
            progress.update(1)?;
            let line_number = line_number + 1;
            let stripped = raw.trim();
            let upper = stripped.to_uppercase();

            if !past_exec {
                self.model.sections.executive.push(raw.to_string());
                if upper.starts_with("CEND") {
                    past_exec = true;
                }
                continue;
            }
            if !in_bulk {
                if upper.starts_with("BEGIN") && upper.contains("BULK") {
                    in_bulk = true;
                } else {
                    self.model.sections.case_control.push(raw.to_string());
                }
                continue;
            }
            if upper.starts_with("ENDDATA") {
                break;
            }
            if include_path(stripped).is_some() {
                self.flush(&mut current, current_skipped, file_index, &mut pending_comment)?;
                current_skipped = false;
                ignoring = false;
                continue;
            }
            if stripped.is_empty() {
                pending_comment.clear();
                continue;
            }
            if stripped.starts_with('$') {
                pending_comment.push(stripped.to_string());
                continue;
            }

            if is_continuation(raw) {
                if ignoring {
                    continue;
                }
                if current.is_empty() {
                    if self.options.strict {
                        return Err(Error::UnexpectedContinuation(line_number));
                    }
                    self.warnings
                        .push(format!("orphan continuation on line {line_number}"));
                    continue;
                }
                current.push((line_number, raw.to_string()));
                continue;
            }

            // A fresh primary line closes the previous card
            self.flush(&mut current, current_skipped, file_index, &mut pending_comment)?;
            current_skipped = false;
            ignoring = false;

            let (name, _) = extract_card_info(stripped);
            let Some(name) = name else { continue };

            if self.options.skip_cards.iter().any(|s| s == &name) {
                current_skipped = true;
                current.push((line_number, raw.to_string()));
                continue;
            }
            if family(&name).is_none() {
                if self.options.strict {
                    return Err(Error::UnknownCard(name));
                }
                // Already catalogued as passthrough text
                ignoring = true;
                continue;
            }

            current.push((line_number, raw.to_string()));
        }

        self.flush(&mut current, current_skipped, file_index, &mut pending_comment)?;
        Ok(())
    }

    /// Finish the card being assembled, if any
    fn flush(
        &mut self,
        current: &mut Vec<(usize, String)>,
        skipped: bool,
        file_index: usize,
        pending_comment: &mut Vec<String>,
    ) -> Result<()> {
        if current.is_empty() {
            pending_comment.clear();
            return Ok(());
        }
        let lines = std::mem::take(current);
        let comment = std::mem::take(pending_comment);

        if skipped {
            let entry = self.model.skipped.entry(file_index).or_default();
            entry.extend(lines.into_iter().map(|(_, line)| line));
            return Ok(());
        }

        let refs: Vec<(usize, &str)> = lines
            .iter()
            .map(|(number, line)| (*number, line.as_str()))
            .collect();
        let fields = lex_card(&refs)?;
        let name = fields.name.clone();
        let fam = family(&name).expect("only registered cards reach the typed parser");

        self.insert_card(fam, &name, &fields, &comment)
    }

    /// Parse and store one typed card
    fn insert_card(
        &mut self,
        fam: Family,
        name: &str,
        fields: &crate::Fields,
        comment: &[String],
    ) -> Result<()> {
        let comment_text = (!comment.is_empty()).then(|| comment.join("\n"));
        let mut tag: Option<(Family, u32)> = None;

        match fam {
            Family::Node => {
                if name == "GRID" {
                    let grid = Grid::parse(fields)?;
                    tag = Some((fam, grid.nid));
                    self.store_unique_node(grid.nid, Node::Grid(grid));
                } else {
                    for spoint in Spoint::parse(fields)? {
                        self.store_unique_node(spoint.nid, Node::Spoint(spoint));
                    }
                }
            }
            Family::Element => match name {
                "RBE2" | "RBE3" | "RBAR" => {
                    let card = RigidElement::parse(name, fields)?;
                    tag = Some((fam, card.eid()));
                    if self.unique_element_id(card.eid(), name) {
                        self.model.rigid_elements.insert(card.eid(), card);
                    }
                }
                "CONM1" | "CONM2" | "CMASS1" | "CMASS2" | "CMASS3" | "CMASS4" => {
                    let card = MassElement::parse(name, fields)?;
                    tag = Some((fam, card.eid()));
                    if self.unique_element_id(card.eid(), name) {
                        self.model.masses.insert(card.eid(), card);
                    }
                }
                _ => {
                    let card = Element::parse(name, fields)?;
                    tag = Some((fam, card.eid()));
                    if self.unique_element_id(card.eid(), name) {
                        self.model.elements.insert(card.eid(), card);
                    }
                }
            },
            Family::Property => {
                for card in Property::parse(name, fields)? {
                    tag = Some((fam, card.pid()));
                    if self.model.properties.contains_key(&card.pid()) {
                        self.warn_duplicate(fam, card.pid());
                    } else {
                        self.model.properties.insert(card.pid(), card);
                    }
                }
            }
            Family::Material => {
                let card = Material::parse(name, fields)?;
                tag = Some((fam, card.mid()));
                if self.model.materials.contains_key(&card.mid()) {
                    self.warn_duplicate(fam, card.mid());
                } else {
                    self.model.materials.insert(card.mid(), card);
                }
            }
            Family::Coord => {
                for card in Coord::parse(name, fields)? {
                    tag = Some((fam, card.cid));
                    if self.model.coords.contains_key(&card.cid) {
                        self.warn_duplicate(fam, card.cid);
                    } else {
                        self.model.coords.insert(card.cid, card);
                    }
                }
            }
            Family::Spc => {
                let card = SpcCard::parse(name, fields)?;
                self.model.spcs.entry(card.sid()).or_default().push(card);
            }
            Family::Mpc => {
                let card = MpcCard::parse(name, fields)?;
                self.model.mpcs.entry(card.sid()).or_default().push(card);
            }
            Family::Load => {
                for card in Load::parse(name, fields)? {
                    self.model.loads.entry(card.sid()).or_default().push(card);
                }
            }
            Family::Contact => {
                let card = Contact::parse(name, fields)?;
                self.model.contacts.entry(card.sid()).or_default().push(card);
            }
            Family::Set => {
                let card = Set::parse(name, fields)?;
                tag = Some((fam, card.sid()));
                self.model.sets.insert(card.sid(), card);
            }
            Family::Method => {
                let card = Method::parse(name, fields)?;
                tag = Some((fam, card.sid()));
                self.model.methods.insert(card.sid(), card);
            }
            Family::Table => {
                let card = TableCard::parse(name, fields)?;
                tag = Some((fam, card.tid()));
                self.model.tables.insert(card.tid(), card);
            }
            Family::Param => {
                let card = Param::parse(fields)?;
                self.model.params.insert(card.key.clone(), card);
            }
        }

        if let (Some(tag), Some(text)) = (tag, comment_text) {
            self.model.comments.insert(tag, text);
        }
        Ok(())
    }

    fn store_unique_node(&mut self, nid: u32, node: Node) {
        if self.model.nodes.contains_key(&nid) {
            self.warn_duplicate(Family::Node, nid);
        } else {
            self.model.nodes.insert(nid, node);
        }
    }

    /// Structural, rigid, and mass elements share one id space
    fn unique_element_id(&mut self, eid: u32, name: &str) -> bool {
        if self.model.has_element_id(eid) {
            warn!("duplicate element id {eid} ({name}), keeping the first");
            self.warnings.push(format!("duplicate element id {eid}"));
            false
        } else {
            true
        }
    }

    fn warn_duplicate(&mut self, fam: Family, id: u32) {
        warn!("duplicate {fam} id {id}, keeping the first");
        self.warnings.push(format!("duplicate {fam} id {id}"));
    }
}
