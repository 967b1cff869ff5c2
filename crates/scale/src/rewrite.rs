//! Minimal-diff text rewrite
//!
//! Each scaled file is rewritten line by line. Only the lines belonging
//! to a scaled card are replaced with that card's new serialised form;
//! comments, blank lines, passthrough cards, includes, and the
//! executive/case sections pass through byte for byte.

// standard library
use std::collections::HashMap;

// fetools crates
use fetools_bulk::extract_card_info;

/// Replacement text per `(card name, primary id)`
pub type ScaledLookup = HashMap<(String, u32), String>;

/// Rewrite one file's text, swallowing the continuations of replaced
/// cards
pub fn rewrite_text(input: &str, lookup: &ScaledLookup, is_main: bool) -> String {
    let mut out = String::new();
    let mut in_bulk = !is_main;
    let mut replacing = false;

    for line in input.lines() {
        let stripped = line.trim();
        let upper = stripped.to_uppercase();

        if !in_bulk {
            push_line(&mut out, line);
            if upper.starts_with("BEGIN") && upper.contains("BULK") {
                in_bulk = true;
            }
            continue;
        }

        if upper.starts_with("ENDDATA") || upper.starts_with("INCLUDE") {
            replacing = false;
            push_line(&mut out, line);
            continue;
        }

        if stripped.is_empty() || stripped.starts_with('$') {
            if !replacing {
                push_line(&mut out, line);
            }
            continue;
        }

        let first = stripped.chars().next().unwrap();
        if first.is_ascii_alphabetic() {
            replacing = false;
            let (name, id) = extract_card_info(stripped);
            if let (Some(name), Some(id)) = (name, id) {
                if let Some(replacement) = lookup.get(&(name, id)) {
                    out.push_str(replacement);
                    replacing = true;
                    continue;
                }
            }
            push_line(&mut out, line);
        } else if !replacing {
            // Continuation of an untouched card
            push_line(&mut out, line);
        }
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_lines_survive_verbatim() {
        let input = "$ header comment\nMAT1           1  2.1+11             0.3   7850.\nGRID           1              0.      0.      0.\n";
        let mut lookup = ScaledLookup::new();
        lookup.insert(
            ("MAT1".to_string(), 1),
            "MAT1           1  2.1+11             0.3  15700.\n".to_string(),
        );

        let output = rewrite_text(input, &lookup, false);
        assert!(output.contains("15700."));
        assert!(output.contains("$ header comment"));
        assert!(output.contains("GRID           1              0.      0.      0."));
        assert!(!output.contains("7850."));
    }

    #[test]
    fn continuations_of_replaced_cards_are_swallowed() {
        let input = "CONM2        500      10             10.\n             0.1              0.1\nGRID           7              0.      0.      0.\n";
        let mut lookup = ScaledLookup::new();
        lookup.insert(("CONM2".to_string(), 500), "CONM2        500      10              5.\n".to_string());

        let output = rewrite_text(input, &lookup, false);
        assert!(!output.contains("0.1"));
        assert!(output.contains("GRID           7"));
    }
}
