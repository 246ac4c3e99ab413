//! Section-level passes: heading canonicalization, duplicate merging, required
//! sections, projects synthesis and pruning.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::ReconcileContext;
use crate::lexicon::Lexicon;
use crate::models::{Document, Entry, Item, Section, Token};
use crate::parser::headings::canonicalize_heading;
use crate::parser::tokenizer::BULLET_GLYPHS;

pub const PLACEHOLDER: &str = "Information not provided";

pub const WORK_EXPERIENCE: &str = "Work Experience";
pub const EDUCATION: &str = "Education";
pub const PROJECTS: &str = "Projects";

const MAX_PROJECT_SENTENCES: usize = 2;

static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+(?:[.!?]+|$)").unwrap());

pub fn placeholder_item() -> Item {
    vec![Token::text(PLACEHOLDER)]
}

fn is_placeholder(item: &Item) -> bool {
    Entry::from_tokens(item).text == PLACEHOLDER
}

/// True when the section has no items or only placeholder and visually empty lines.
pub fn is_placeholder_only(section: &Section) -> bool {
    section
        .items
        .iter()
        .all(|item| is_placeholder(item) || is_visually_empty(item))
}

/// An item is visually empty when its text holds nothing but whitespace and
/// bullet glyphs.
pub fn is_visually_empty(item: &Item) -> bool {
    item.iter()
        .filter_map(Token::visible_text)
        .flat_map(str::chars)
        .all(|c| c.is_whitespace() || BULLET_GLYPHS.contains(&c))
}

pub fn canonicalize_headings(doc: &mut Document, lex: &Lexicon) {
    for section in &mut doc.sections {
        section.heading = canonicalize_heading(&section.heading, lex);
    }
}

/// Returns the section with `heading`, appending an empty one when absent.
pub fn ensure_section<'a>(doc: &'a mut Document, heading: &str) -> &'a mut Section {
    let idx = match doc.sections.iter().position(|s| s.heading == heading) {
        Some(idx) => idx,
        None => {
            doc.sections.push(Section::new(heading));
            doc.sections.len() - 1
        }
    };
    &mut doc.sections[idx]
}

/// Folds sections that share a heading into the first occurrence. Later items are
/// appended, except that an empty or placeholder-only first occurrence is replaced.
pub fn merge_sections(doc: &mut Document) {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Section> = Vec::with_capacity(doc.sections.len());
    for section in std::mem::take(&mut doc.sections) {
        match index.get(&section.heading) {
            Some(&pos) => {
                let kept = &mut merged[pos];
                if is_placeholder_only(kept) {
                    kept.items = section.items;
                } else {
                    kept.items.extend(
                        section.items.into_iter().filter(|item| !is_placeholder(item)),
                    );
                }
            }
            None => {
                index.insert(section.heading.clone(), merged.len());
                merged.push(section);
            }
        }
    }
    doc.sections = merged;
}

/// Drops visually empty items, then sections left without items.
pub fn prune(doc: &mut Document) {
    for section in &mut doc.sections {
        section.items.retain(|item| !is_visually_empty(item));
    }
    doc.sections.retain(|s| !s.items.is_empty());
}

/// Appends supplementary education lines that are not already present and
/// guarantees the section is never empty.
pub fn ensure_education(doc: &mut Document, ctx: &ReconcileContext) {
    let section = ensure_section(doc, EDUCATION);
    section.items.retain(|item| !is_placeholder(item));
    for line in &ctx.profile_education {
        let present = section
            .entries()
            .iter()
            .any(|e| e.text.eq_ignore_ascii_case(line.trim()));
        if !present && !line.trim().is_empty() {
            section.items.push(vec![Token::text(line.trim())]);
        }
    }
    if section.items.iter().all(is_visually_empty) {
        section.items = vec![placeholder_item()];
    }
}

/// First sentences of `blurb`, trimmed.
fn leading_sentences(blurb: &str, limit: usize) -> Vec<String> {
    SENTENCE_RE
        .find_iter(blurb)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .take(limit)
        .collect()
}

/// Synthesizes a bulleted Projects section from the project blurb when the résumé
/// has none.
pub fn ensure_projects(doc: &mut Document, ctx: &ReconcileContext) {
    if doc.section(PROJECTS).is_some_and(|s| !is_placeholder_only(s)) {
        return;
    }
    let Some(blurb) = ctx.project_blurb.as_deref() else {
        return;
    };
    let sentences = leading_sentences(blurb, MAX_PROJECT_SENTENCES);
    if sentences.is_empty() {
        return;
    }
    let section = ensure_section(doc, PROJECTS);
    section.items = sentences
        .into_iter()
        .map(|s| vec![Token::Bullet, Token::text(s)])
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(heading: &str, lines: &[&str]) -> Section {
        Section {
            heading: heading.to_string(),
            items: lines.iter().map(|l| vec![Token::text(*l)]).collect(),
        }
    }

    #[test]
    fn test_merge_replaces_placeholder_and_appends_otherwise() {
        let mut doc = Document {
            name: "A".into(),
            sections: vec![
                section("Education", &[PLACEHOLDER]),
                section("Skills", &["Rust"]),
                section("Education", &["BSc"]),
                section("Skills", &["Go"]),
            ],
        };
        merge_sections(&mut doc);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].entries()[0].text, "BSc");
        assert_eq!(doc.sections[1].items.len(), 2);
    }

    #[test]
    fn test_prune_drops_empty_items_and_sections() {
        let mut doc = Document {
            name: String::new(),
            sections: vec![
                Section {
                    heading: "Skills".into(),
                    items: vec![vec![Token::Bullet], vec![Token::Tab, Token::text("  ")]],
                },
                section("Summary", &["Builds things"]),
            ],
        };
        prune(&mut doc);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, "Summary");
    }

    #[test]
    fn test_glyph_only_items_are_visually_empty() {
        assert!(is_visually_empty(&vec![Token::Bullet, Token::text("-")]));
        assert!(is_visually_empty(&vec![Token::text(" • · ▪ * ")]));
        assert!(!is_visually_empty(&vec![Token::Bullet, Token::text("- C")]));

        let mut doc = Document {
            name: String::new(),
            sections: vec![section("Projects", &["-", "•"]), section("Skills", &["Rust"])],
        };
        prune(&mut doc);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, "Skills");
    }

    #[test]
    fn test_education_placeholder_and_supplement() {
        let mut doc = Document::default();
        ensure_education(&mut doc, &ReconcileContext::default());
        assert_eq!(doc.sections[0].entries()[0].text, PLACEHOLDER);

        let ctx = ReconcileContext {
            profile_education: vec!["BSc Physics, MIT".into(), "bsc physics, mit".into()],
            ..Default::default()
        };
        ensure_education(&mut doc, &ctx);
        let texts: Vec<String> = doc.sections[0].entries().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["BSc Physics, MIT"]);
    }

    #[test]
    fn test_projects_from_blurb() {
        let mut doc = Document::default();
        let ctx = ReconcileContext {
            project_blurb: Some("Built a compiler. Wrote a  database! Also a shell.".into()),
            ..Default::default()
        };
        ensure_projects(&mut doc, &ctx);
        let projects = doc.section(PROJECTS).unwrap();
        assert_eq!(
            projects.items,
            vec![
                vec![Token::Bullet, Token::text("Built a compiler.")],
                vec![Token::Bullet, Token::text("Wrote a database!")],
            ]
        );
    }

    #[test]
    fn test_existing_projects_are_kept() {
        let mut doc = Document {
            name: String::new(),
            sections: vec![section(PROJECTS, &["Quill"])],
        };
        let ctx = ReconcileContext {
            project_blurb: Some("Other.".into()),
            ..Default::default()
        };
        ensure_projects(&mut doc, &ctx);
        assert_eq!(doc.sections[0].entries()[0].text, "Quill");
    }
}
