use crate::lexicon::Lexicon;

use super::emphasis::strip_markers;

const CONNECTORS: &[&str] = &["and", "of", "in", "for", "the", "&", "to", "on", "or"];

/// Canonical form of a section heading. `canonicalize_heading(canonicalize_heading(h))`
/// always equals `canonicalize_heading(h)`.
pub fn canonicalize_heading(raw: &str, lex: &Lexicon) -> String {
    let stripped = strip_markers(raw.trim().trim_start_matches('#'));
    let trimmed = stripped
        .trim()
        .trim_end_matches(|c: char| {
            c.is_whitespace() || (c.is_ascii_punctuation() && c != '&' && c != ')')
        })
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | '|'));
    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return String::new();
    }

    let lower = collapsed.to_lowercase();
    if lower.contains("training") || lower.contains("certification") {
        return "Certification".to_string();
    }
    if let Some(canonical) = lex.heading_synonym(&lower) {
        return canonical.to_string();
    }
    title_case(&collapsed)
}

fn title_case(heading: &str) -> String {
    heading
        .split(' ')
        .enumerate()
        .map(|(idx, word)| {
            let lower = word.to_lowercase();
            if idx > 0 && CONNECTORS.contains(&lower.as_str()) {
                return lower;
            }
            if is_acronym(word) {
                return word.to_string();
            }
            capitalize(&lower)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_acronym(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    (2..=3).contains(&letters.len()) && letters.iter().all(|c| c.is_uppercase())
}

fn capitalize(lower: &str) -> String {
    let mut out = String::with_capacity(lower.len());
    let mut done = false;
    for c in lower.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// True when the canonical heading names the experience section or a close sibling.
pub fn is_experience_like(heading: &str) -> bool {
    let lower = heading.to_lowercase();
    ["experience", "employment", "work history", "career history"]
        .iter()
        .any(|k| lower.contains(k))
}
