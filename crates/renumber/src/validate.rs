//! Post-apply validation
//!
//! The emitted main file is re-read from disk and compared against the
//! renumbered in-memory model: family counts must match and every
//! element's nodes must resolve.

// standard library
use std::path::Path;

// fetools crates
use fetools_bulk::{read_deck_with, Model, ReadOptions};
use fetools_utils::f;

/// Returns (warnings, errors) from re-reading `main_out`
pub fn post_validate(
    expected: &Model,
    main_out: &Path,
    options: ReadOptions,
) -> (Vec<String>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let reread = match read_deck_with(main_out, options) {
        Ok(model) => model,
        Err(cause) => {
            errors.push(f!("could not re-read output deck: {cause}"));
            return (warnings, errors);
        }
    };

    let checks = [
        ("nodes", expected.nodes.len(), reread.nodes.len()),
        ("elements", expected.elements.len(), reread.elements.len()),
        (
            "rigid elements",
            expected.rigid_elements.len(),
            reread.rigid_elements.len(),
        ),
        ("mass elements", expected.masses.len(), reread.masses.len()),
        (
            "properties",
            expected.properties.len(),
            reread.properties.len(),
        ),
        ("materials", expected.materials.len(), reread.materials.len()),
        ("coords", expected.coords.len(), reread.coords.len()),
    ];
    for (label, original, output) in checks {
        if original != output {
            errors.push(f!("{label} count mismatch: original={original}, output={output}"));
        }
    }

    // Connectivity: every element's nodes must exist in the output
    for (eid, element) in &reread.elements {
        for nid in element.nodes() {
            if !reread.nodes.contains_key(&nid) {
                errors.push(f!(
                    "element {eid} ({}) references missing node {nid}",
                    element.name()
                ));
                break;
            }
        }
    }
    for (eid, element) in &reread.rigid_elements {
        for nid in element.nodes() {
            if !reread.nodes.contains_key(&nid) {
                errors.push(f!(
                    "rigid element {eid} ({}) references missing node {nid}",
                    element.name()
                ));
                break;
            }
        }
    }

    if !reread.catalog.files.iter().all(|file| file.path.is_file()) {
        warnings.push("output include tree has missing files".to_string());
    }

    (warnings, errors)
}
