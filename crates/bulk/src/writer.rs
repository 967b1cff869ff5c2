//! Deck writer
//!
//! Writes the model back to disk with the include structure preserved:
//! one output file per catalogued input file, cards emitted in canonical
//! order within each file. The ownership catalog is authoritative; a
//! card that no file claims lands in a diagnostic section at the end of
//! the main file. The main file is emitted last.

// standard library
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

// crate modules
use crate::case::CaseControl;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::registry::{family, Family, WRITE_ORDER};
use crate::remap::IdMaps;

// external crates
use log::{debug, warn};

/// Outcome of a write pass
#[derive(Debug, Clone, Default)]
pub struct WriteReport {
    /// Files written, main file first
    pub written: Vec<PathBuf>,
    /// Cards owned by no file, emitted into the main diagnostic section
    pub fallback: Vec<(Family, u32)>,
    /// Non-fatal findings
    pub warnings: Vec<String>,
}

/// Writes a model into an output directory
#[derive(Debug)]
pub struct DeckWriter<'a> {
    model: &'a Model,
    maps: Option<&'a IdMaps>,
}

/// Emission key: family, id, and card name, since set families may hold
/// several card kinds under one set id
type WrittenKey = (Family, u32, &'static str);

impl<'a> DeckWriter<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model, maps: None }
    }

    /// Write with an active remap: ownership is translated through the
    /// maps and case control references are rewritten
    pub fn with_remap(model: &'a Model, maps: &'a IdMaps) -> Self {
        Self {
            model,
            maps: Some(maps),
        }
    }

    /// Write every file into `output_dir`, includes first, main last
    pub fn write<P: AsRef<Path>>(&self, output_dir: P) -> Result<WriteReport> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).map_err(|cause| Error::WriteError {
            path: output_dir.display().to_string(),
            cause: cause.to_string(),
        })?;

        let mut report = WriteReport::default();
        let relative = self.relative_paths();
        let mut written: HashSet<WrittenKey> = HashSet::new();
        let mut written_params: HashSet<String> = HashSet::new();

        // Include files first, in catalog order
        let mut outputs: Vec<(usize, PathBuf)> = Vec::new();
        for index in 1..self.model.catalog.files.len() {
            let out_path = output_dir.join(&relative[index]);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(|cause| Error::WriteError {
                    path: parent.display().to_string(),
                    cause: cause.to_string(),
                })?;
            }
            let text = self.include_file_text(index, &relative, &mut written, &mut written_params);
            write_text(&out_path, &text)?;
            debug!("wrote {}", out_path.display());
            outputs.push((index, out_path));
        }

        // Main file last, so the fallback section can catch strays
        let main_out = output_dir.join(&relative[0]);
        let text =
            self.main_file_text(&relative, &mut written, &mut written_params, &mut report)?;
        write_text(&main_out, &text)?;
        debug!("wrote {}", main_out.display());

        report.written.push(main_out);
        report
            .written
            .extend(outputs.into_iter().map(|(_, path)| path));
        Ok(report)
    }

    /// Output-relative path per file: the main file keeps its name at the
    /// output root and includes keep their position relative to it
    fn relative_paths(&self) -> Vec<PathBuf> {
        let files = &self.model.catalog.files;
        let main_dir = files[0]
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        files
            .iter()
            .map(|file| match file.path.strip_prefix(&main_dir) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => {
                    // An include outside the main tree flattens to its name
                    PathBuf::from(file.path.file_name().unwrap_or_default())
                }
            })
            .collect()
    }

    fn include_file_text(
        &self,
        index: usize,
        relative: &[PathBuf],
        written: &mut HashSet<WrittenKey>,
        written_params: &mut HashSet<String>,
    ) -> String {
        let mut out = String::new();
        self.push_include_lines(index, relative, &mut out);
        self.push_cards(index, written, written_params, &mut out);
        self.push_passthrough(index, &mut out);
        out
    }

    fn main_file_text(
        &self,
        relative: &[PathBuf],
        written: &mut HashSet<WrittenKey>,
        written_params: &mut HashSet<String>,
        report: &mut WriteReport,
    ) -> Result<String> {
        let mut out = String::new();

        for line in &self.model.sections.executive {
            out.push_str(line);
            out.push('\n');
        }
        match self.maps {
            Some(maps) => {
                let case = CaseControl::new(self.model.sections.case_control.clone());
                for line in case.rewrite(maps) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            None => {
                for line in &self.model.sections.case_control {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }

        out.push_str("BEGIN BULK\n");
        self.push_include_lines(0, relative, &mut out);
        self.push_cards(0, written, written_params, &mut out);
        self.push_passthrough(0, &mut out);

        // Anything the catalog never claimed goes into a diagnostic block
        let strays = self.collect_strays(written, written_params);
        if !strays.is_empty() {
            out.push_str("$ --- cards owned by no include file ---\n");
            for (fam, id, text) in &strays {
                report.fallback.push((*fam, *id));
                warn!("no file owns {fam} {id}, writing to main");
                out.push_str(text);
            }
        }

        out.push_str("ENDDATA\n");
        Ok(out)
    }

    /// Verbatim INCLUDE statements, paths recomputed against the output
    fn push_include_lines(&self, index: usize, relative: &[PathBuf], out: &mut String) {
        let file = &self.model.catalog.files[index];
        let own_dir = relative[index].parent().map(Path::to_path_buf).unwrap_or_default();

        for child in &file.includes {
            let Some(child_index) = self.model.catalog.index_of(child) else {
                continue;
            };
            let child_rel = &relative[child_index];
            // Path from this file's output directory to the child's
            let target = match child_rel.strip_prefix(&own_dir) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => child_rel.clone(),
            };
            out.push_str(&format!("INCLUDE '{}'\n", target.display()));
        }
    }

    /// All cards owned by this file, in canonical order
    fn push_cards(
        &self,
        index: usize,
        written: &mut HashSet<WrittenKey>,
        written_params: &mut HashSet<String>,
        out: &mut String,
    ) {
        let owned = self.owned_ids(index);

        for group in WRITE_ORDER {
            for &name in *group {
                let fam = family(name).expect("write order names are registered");
                let Some(ids) = owned.get(&fam) else { continue };
                for (id, text) in self.cards_by_name(name, fam, ids) {
                    if !written.insert((fam, id, name)) {
                        continue;
                    }
                    if let Some(comment) = self.model.comment(fam, id) {
                        out.push_str(comment);
                        out.push('\n');
                    }
                    out.push_str(&text);
                }
            }
        }

        // Parameters follow the ordered card groups
        for key in &self.model.catalog.files[index].params {
            if let Some(param) = self.model.params.get(key) {
                if written_params.insert(key.clone()) {
                    out.push_str(&param.write());
                }
            }
        }
    }

    /// Catalogued ids per family, translated through any active remap
    fn owned_ids(&self, index: usize) -> HashMap<Family, HashSet<u32>> {
        let mut owned = HashMap::new();
        for (fam, ids) in &self.model.catalog.files[index].ids {
            let mapped: HashSet<u32> = match self.maps {
                Some(maps) => ids.iter().map(|&id| maps.get(*fam, id)).collect(),
                None => ids.iter().copied().collect(),
            };
            owned.insert(*fam, mapped);
        }
        owned
    }

    /// Serialised cards of one name whose (possibly remapped) id is owned
    fn cards_by_name(
        &self,
        name: &'static str,
        fam: Family,
        ids: &HashSet<u32>,
    ) -> Vec<(u32, String)> {
        let model = self.model;
        let mut cards: Vec<(u32, String)> = Vec::new();

        match fam {
            Family::Node => {
                for (id, card) in &model.nodes {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
            }
            Family::Element => {
                for (id, card) in &model.elements {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
                for (id, card) in &model.rigid_elements {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
                for (id, card) in &model.masses {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
            }
            Family::Property => {
                for (id, card) in &model.properties {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
            }
            Family::Material => {
                for (id, card) in &model.materials {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
            }
            Family::Coord => {
                for (id, card) in &model.coords {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
            }
            Family::Spc => {
                for (sid, list) in &model.spcs {
                    if !ids.contains(sid) {
                        continue;
                    }
                    for card in list.iter().filter(|c| c.name() == name) {
                        cards.push((*sid, card.write()));
                    }
                }
            }
            Family::Mpc => {
                for (sid, list) in &model.mpcs {
                    if !ids.contains(sid) {
                        continue;
                    }
                    for card in list.iter().filter(|c| c.name() == name) {
                        cards.push((*sid, card.write()));
                    }
                }
            }
            Family::Load => {
                for (sid, list) in &model.loads {
                    if !ids.contains(sid) {
                        continue;
                    }
                    for card in list.iter().filter(|c| c.name() == name) {
                        cards.push((*sid, card.write()));
                    }
                }
            }
            Family::Contact => {
                for (sid, list) in &model.contacts {
                    if !ids.contains(sid) {
                        continue;
                    }
                    for card in list.iter().filter(|c| c.name() == name) {
                        cards.push((*sid, card.write()));
                    }
                }
            }
            Family::Set => {
                for (id, card) in &model.sets {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
            }
            Family::Method => {
                for (id, card) in &model.methods {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
            }
            Family::Table => {
                for (id, card) in &model.tables {
                    if card.name() == name && ids.contains(id) {
                        cards.push((*id, card.write()));
                    }
                }
            }
            Family::Param => {}
        }

        cards
    }

    /// Passthrough text: unregistered cards plus skip-listed cards
    fn push_passthrough(&self, index: usize, out: &mut String) {
        for line in &self.model.catalog.files[index].passthrough {
            out.push_str(line);
            out.push('\n');
        }
        if let Some(lines) = self.model.skipped.get(&index) {
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    /// Everything in the store the catalog never claimed
    fn collect_strays(
        &self,
        written: &HashSet<WrittenKey>,
        written_params: &HashSet<String>,
    ) -> Vec<(Family, u32, String)> {
        let model = self.model;
        let mut strays = Vec::new();

        macro_rules! sweep {
            ($map:expr, $fam:expr) => {
                for (id, card) in $map {
                    if !written.contains(&($fam, *id, card.name())) {
                        strays.push(($fam, *id, card.write()));
                    }
                }
            };
        }
        macro_rules! sweep_lists {
            ($map:expr, $fam:expr) => {
                for (sid, list) in $map {
                    for card in list {
                        if !written.contains(&($fam, *sid, card.name())) {
                            strays.push(($fam, *sid, card.write()));
                        }
                    }
                }
            };
        }

        sweep!(&model.coords, Family::Coord);
        sweep!(&model.nodes, Family::Node);
        sweep!(&model.elements, Family::Element);
        sweep!(&model.rigid_elements, Family::Element);
        sweep!(&model.masses, Family::Element);
        sweep!(&model.properties, Family::Property);
        sweep!(&model.materials, Family::Material);
        sweep_lists!(&model.loads, Family::Load);
        sweep_lists!(&model.spcs, Family::Spc);
        sweep_lists!(&model.mpcs, Family::Mpc);
        sweep_lists!(&model.contacts, Family::Contact);
        sweep!(&model.sets, Family::Set);
        sweep!(&model.methods, Family::Method);
        sweep!(&model.tables, Family::Table);

        for (key, param) in &model.params {
            if !written_params.contains(key) {
                strays.push((Family::Param, 0, param.write()));
            }
        }

        strays
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|cause| Error::WriteError {
        path: path.display().to_string(),
        cause: cause.to_string(),
    })
}
