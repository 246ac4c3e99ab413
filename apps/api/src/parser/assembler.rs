//! Document assembly: tokenized lines grouped into headed sections.
//!
//! Two grammars feed the same output. Structured input already names its sections;
//! plain text goes through the line-oriented fallback:
//!
//! - the first non-blank line is the candidate's name (unless it is itself a heading)
//! - `# Heading` lines and bare known-heading lines open sections
//! - a bullet glyph opens a new item
//! - an indented or tab-led line continues the current item after a `newline` token
//! - anything before the first heading lands in a heading-less header section

use crate::lexicon::Lexicon;
use crate::models::{Document, Item, Section, Token};

use super::emphasis::strip_markers;
use super::headings::canonicalize_heading;
use super::input::{ResumeSource, StructuredResume};
use super::tokenizer::{strip_bullet, tokenize_line, TokenizeOptions};

const CLOSING_PUNCT: &[char] = &[',', '.', ';', ':', '!', '?', ')', ']', '}', '%'];
const OPENING_PUNCT: &[char] = &['(', '[', '{', '/'];

pub fn assemble(source: &ResumeSource, lex: &Lexicon, opts: TokenizeOptions) -> Document {
    match source {
        ResumeSource::Structured(resume) => assemble_structured(resume, lex, opts),
        ResumeSource::Plain(text) => assemble_plain(text, lex, opts),
    }
}

fn assemble_structured(resume: &StructuredResume, lex: &Lexicon, opts: TokenizeOptions) -> Document {
    let sections = resume
        .sections
        .iter()
        .map(|raw| Section {
            heading: canonicalize_heading(&raw.heading, lex),
            items: raw
                .items
                .iter()
                .map(|line| repair_spacing(tokenize_line(line, lex, opts)))
                .filter(|item| !item.is_empty())
                .collect(),
        })
        .collect();

    Document {
        name: strip_markers(&resume.name).trim().to_string(),
        sections,
    }
}

/// Heading text for a heading line: ATX `#`..`######`, or a bare known heading
/// (markers and a trailing colon ignored).
pub(crate) fn heading_text(line: &str, lex: &Lexicon) -> Option<String> {
    let trimmed = line.trim();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        let rest = &trimmed[hashes..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Some(rest.trim().to_string());
        }
    }

    let plain = strip_markers(trimmed);
    let candidate = plain.trim().trim_end_matches(':').trim();
    lex.is_known_heading(&candidate.to_lowercase())
        .then(|| candidate.to_string())
}

fn is_indented(line: &str) -> bool {
    line.starts_with('\t') || line.starts_with("  ")
}

fn assemble_plain(text: &str, lex: &Lexicon, opts: TokenizeOptions) -> Document {
    let mut doc = Document::default();
    let mut name_seen = false;
    let mut item_open = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            item_open = false;
            continue;
        }

        if let Some(heading) = heading_text(line, lex) {
            name_seen = true;
            item_open = false;
            doc.sections.push(Section::new(canonicalize_heading(&heading, lex)));
            continue;
        }

        if !name_seen {
            name_seen = true;
            let body = strip_bullet(line.trim()).unwrap_or(line.trim());
            doc.name = strip_markers(body).trim().to_string();
            continue;
        }

        if doc.sections.is_empty() {
            doc.sections.push(Section::new(""));
        }
        let Some(section) = doc.sections.last_mut() else {
            continue;
        };

        let continues = item_open && is_indented(line) && strip_bullet(line.trim()).is_none();
        let tokens = tokenize_line(line, lex, opts);
        if tokens.is_empty() {
            continue;
        }
        item_open = true;
        if continues {
            if let Some(item) = section.items.last_mut() {
                item.push(Token::Newline);
                item.extend(tokens);
                continue;
            }
        }
        section.items.push(tokens);
    }

    for section in &mut doc.sections {
        let items = std::mem::take(&mut section.items);
        section.items = items.into_iter().map(repair_spacing).collect();
    }
    doc
}

/// Inserts a single-space paragraph between adjacent text/link tokens that would
/// otherwise render glued together.
pub fn repair_spacing(item: Item) -> Item {
    let mut out: Item = Vec::with_capacity(item.len());
    for token in item {
        let needs_space = match (out.last().and_then(Token::visible_text), token.visible_text()) {
            (Some(left), Some(right)) => {
                !left.is_empty()
                    && !right.is_empty()
                    && !left.ends_with(char::is_whitespace)
                    && !right.starts_with(char::is_whitespace)
                    && !right.starts_with(CLOSING_PUNCT)
                    && !left.ends_with(OPENING_PUNCT)
            }
            _ => false,
        };
        if needs_space {
            out.push(Token::text(" "));
        }
        out.push(token);
    }
    out
}
