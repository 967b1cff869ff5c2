//! Markdown summary of a scale pass

// standard library
use std::path::Path;

// crate modules
use crate::groups::ScaleGroup;

// fetools crates
use fetools_utils::f;

/// Render the summary document
pub fn render(
    input: &Path,
    wtmass: f64,
    groups: &[ScaleGroup],
    scales: &[(usize, f64)],
    written: &[(usize, std::path::PathBuf)],
) -> String {
    let scale_of = |file: usize| {
        scales
            .iter()
            .find(|(index, _)| *index == file)
            .map(|(_, factor)| *factor)
            .unwrap_or(1.0)
    };

    let mut lines: Vec<String> = vec![
        "# Mass Scale Summary".to_string(),
        String::new(),
        f!("**Input deck:** {}", input.display()),
        f!("**WTMASS:** {wtmass:.4e}"),
        String::new(),
        "## Scaled Files".to_string(),
        String::new(),
        "| File | Scale | Original Mass | Scaled Mass | Delta | MATs | PROPs | Mass Elems | CONRODs |"
            .to_string(),
        "|------|-------|---------------|-------------|-------|------|-------|------------|---------|"
            .to_string(),
    ];

    let mut total_original = 0.0;
    let mut total_scaled = 0.0;
    for group in groups {
        let factor = scale_of(group.file);
        let scaled_mass = group.original_mass * factor;
        total_original += group.original_mass;
        total_scaled += scaled_mass;

        let delta = if group.original_mass != 0.0 {
            f!("{:+.0}%", (factor - 1.0) * 100.0)
        } else {
            "N/A".to_string()
        };
        lines.push(f!(
            "| {} | {factor:.4} | {:.4e} | {scaled_mass:.4e} | {delta} | {} | {} | {} | {} |",
            group.filename,
            group.original_mass,
            group.material_ids.len(),
            group.property_ids.len(),
            group.mass_elem_ids.len(),
            group.conrod_ids.len()
        ));
    }

    lines.push(String::new());
    lines.push(f!("**Total Original Mass:** {total_original:.4e}"));
    lines.push(f!("**Total Scaled Mass:** {total_scaled:.4e}"));
    lines.push(String::new());

    let mut entity_lines = Vec::new();
    for group in groups {
        if scale_of(group.file) == 1.0 || group.is_empty() {
            continue;
        }
        let mut parts = Vec::new();
        if !group.material_ids.is_empty() {
            parts.push(f!("{} MATs (rho)", group.material_ids.len()));
        }
        if !group.property_ids.is_empty() {
            parts.push(f!("{} PROPs (nsm)", group.property_ids.len()));
        }
        if !group.mass_elem_ids.is_empty() {
            parts.push(f!("{} mass elems", group.mass_elem_ids.len()));
        }
        if !group.conrod_ids.is_empty() {
            parts.push(f!("{} CONRODs", group.conrod_ids.len()));
        }
        entity_lines.push(f!("- **{}** — {}", group.filename, parts.join(", ")));
    }
    if !entity_lines.is_empty() {
        lines.push("## Scaled Entity Types".to_string());
        lines.push(String::new());
        lines.extend(entity_lines);
        lines.push(String::new());
    }

    lines.push("## Output Files".to_string());
    lines.push(String::new());
    for (_, path) in written {
        lines.push(f!("- `{}`", path.display()));
    }
    lines.push(String::new());

    let unmodified: Vec<&ScaleGroup> = groups
        .iter()
        .filter(|group| !written.iter().any(|(file, _)| *file == group.file))
        .collect();
    if !unmodified.is_empty() {
        lines.push("## Unmodified Files".to_string());
        lines.push(String::new());
        for group in unmodified {
            lines.push(f!("- `{}`", group.filename));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
