//! Map building and pre-validation
//!
//! Ids in a (file, family) bucket are sorted ascending and assigned
//! consecutive new ids from the bucket's start. Validation runs before
//! any card is touched and rejects the whole request on any finding.

// crate modules
use crate::spec::{FamilyRanges, RenumberSpec};

// fetools crates
use fetools_bulk::{Family, IdMaps, IncludeCatalog};
use fetools_utils::{f, SortExt};

// external crates
use itertools::Itertools;

/// Pre-apply validation findings; empty means the spec is applicable
pub fn validate(
    catalog: &IncludeCatalog,
    resolved: &[(usize, &FamilyRanges)],
    spec: &RenumberSpec,
) -> Vec<String> {
    let mut errors = Vec::new();

    // Per-bucket checks
    for (index, ranges) in resolved {
        let file = &catalog.files[*index];
        let name = file
            .path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();

        for (family, range) in ranges.iter() {
            if !spec.family_enabled(*family) {
                continue;
            }
            let count = file.ids.get(family).map(|ids| ids.len()).unwrap_or(0);
            if count == 0 {
                continue;
            }
            if range.start < 1 {
                errors.push(f!("{name}/{family}: start must be >= 1 (got {})", range.start));
            }
            if range.end < range.start {
                errors.push(f!(
                    "{name}/{family}: end ({}) < start ({})",
                    range.end,
                    range.start
                ));
                continue;
            }
            if range.capacity() < count {
                errors.push(f!(
                    "{name}/{family}: range [{}-{}] has capacity {} but {count} ids need renumbering",
                    range.start,
                    range.end,
                    range.capacity()
                ));
            }
        }

        // The basic frame stays put
        if file.owns(Family::Coord, 0) {
            if let Some(range) = ranges.get(&Family::Coord) {
                if range.start != 0 {
                    errors.push(f!("{name}/coord: cid 0 (basic frame) cannot be remapped"));
                }
            }
        }
    }

    // Cross-file overlap per family
    let families: Vec<Family> = resolved
        .iter()
        .flat_map(|(_, ranges)| ranges.keys().copied())
        .unique()
        .collect();
    for family in families {
        if !spec.family_enabled(family) {
            continue;
        }
        let mut spans: Vec<(usize, &crate::spec::IdRange)> = Vec::new();
        for (index, ranges) in resolved {
            let populated = catalog.files[*index]
                .ids
                .get(&family)
                .is_some_and(|ids| !ids.is_empty());
            if let (true, Some(range)) = (populated, ranges.get(&family)) {
                spans.push((*index, range));
            }
        }
        for pair in spans.iter().combinations(2) {
            let (index_a, a) = *pair[0];
            let (index_b, b) = *pair[1];
            if a.overlaps(b) {
                let name = |i: usize| {
                    catalog.files[i]
                        .path
                        .file_name()
                        .map(|f| f.to_string_lossy().to_string())
                        .unwrap_or_default()
                };
                errors.push(f!(
                    "{family}: ranges overlap between {} [{}-{}] and {} [{}-{}]",
                    name(index_a),
                    a.start,
                    a.end,
                    name(index_b),
                    b.start,
                    b.end
                ));
            }
        }
    }

    errors
}

/// Build the per-family old-to-new maps from the validated spec
pub fn build_maps(
    catalog: &IncludeCatalog,
    resolved: &[(usize, &FamilyRanges)],
    spec: &RenumberSpec,
) -> IdMaps {
    let mut maps = IdMaps::new();

    for (index, ranges) in resolved {
        let file = &catalog.files[*index];
        for (family, range) in ranges.iter() {
            if !spec.family_enabled(*family) {
                continue;
            }
            let Some(ids) = file.ids.get(family) else {
                continue;
            };
            let map = match family {
                Family::Node => &mut maps.nodes,
                Family::Element => &mut maps.elements,
                Family::Property => &mut maps.properties,
                Family::Material => &mut maps.materials,
                Family::Coord => &mut maps.coords,
                Family::Spc => &mut maps.spcs,
                Family::Mpc => &mut maps.mpcs,
                Family::Load => &mut maps.loads,
                Family::Contact => &mut maps.contacts,
                Family::Set => &mut maps.sets,
                Family::Method => &mut maps.methods,
                Family::Table => &mut maps.tables,
                Family::Param => continue,
            };
            let assignable = ids
                .ascending()
                .into_iter()
                .filter(|&id| !(*family == Family::Coord && id == 0));
            for (offset, old_id) in assignable.enumerate() {
                map.insert(old_id, range.start + offset as u32);
            }
        }
    }

    maps
}
