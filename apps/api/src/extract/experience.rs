use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::dates::find_date_range;
use super::section_lines;
use crate::lexicon::Lexicon;
use crate::models::entities::{ExperienceInput, ExperienceRecord};
use crate::models::ExperienceEntry;
use crate::parser::emphasis::strip_markers;
use crate::parser::headings::is_experience_like;
use crate::parser::tokenizer::{job_header_segments, strip_bullet};

static AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<title>[^,|]+?)\s+(?:at|@)\s+(?P<company>\S.*)$").unwrap()
});

static EMPTY_PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[]\s*[-–—,|]?\s*[)\]]").unwrap());

static DASH_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[-–—]\s+|,\s+").unwrap());

const MAX_TITLE_WORDS: usize = 7;

fn clean_field(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '–' | '—' | '|' | ':'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn plain_body(line: &str) -> String {
    let trimmed = line.trim();
    strip_markers(strip_bullet(trimmed).unwrap_or(trimmed))
}

fn at_match(body: &str) -> Option<(String, String)> {
    let caps = AT_RE.captures(body)?;
    let title = clean_field(&caps["title"]);
    let company = clean_field(&caps["company"]);
    let plausible = !title.is_empty()
        && title.split_whitespace().count() <= MAX_TITLE_WORDS
        && company.chars().next().is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
    plausible.then_some((title, company))
}

/// True when a line opens a new job. Top-level lines need a pipe header, a date
/// range, or "Title at Company". Bulleted or indented lines are responsibilities
/// unless they are a pipe header or a dated "Title at/- Company" line whose range
/// names a month.
pub fn looks_like_job_line(line: &str) -> bool {
    let trimmed = line.trim();
    let nested = strip_bullet(trimmed).is_some() || line.starts_with(char::is_whitespace);
    is_job_header(&plain_body(trimmed), nested)
}

pub fn is_job_header(body: &str, nested: bool) -> bool {
    if job_header_segments(body).is_some() {
        return true;
    }
    let range = find_date_range(body);
    if !nested {
        return range.is_some() || at_match(body).is_some();
    }
    let Some(range) = range else {
        return false;
    };
    let structured = parse_job_line(body)
        .is_some_and(|entry| !entry.title.is_empty() && !entry.company.is_empty());
    structured && (range.has_month() || at_match(body).is_some())
}

/// Parses a job header line into an entry without responsibilities.
pub fn parse_job_line(line: &str) -> Option<ExperienceEntry> {
    let mut body = plain_body(line);
    let range = find_date_range(&body);
    if let Some(range) = &range {
        body.replace_range(range.span.clone(), "");
    }
    let body = EMPTY_PARENS_RE.replace_all(&body, "");
    let body = clean_field(&body);

    let (title, company) = if let Some(segments) = job_header_segments(&body) {
        (clean_field(segments[0]), clean_field(segments[1]))
    } else if let Some(found) = at_match(&body) {
        found
    } else if range.is_some() && !body.is_empty() {
        match DASH_SPLIT_RE.splitn(&body, 2).collect::<Vec<_>>().as_slice() {
            [title, company] => (clean_field(title), clean_field(company)),
            _ => (body.clone(), String::new()),
        }
    } else {
        return None;
    };

    let (start_date, end_date) = range.map(|r| (r.start, r.end)).unwrap_or_default();
    Some(ExperienceEntry {
        company,
        title,
        start_date,
        end_date,
        responsibilities: Vec::new(),
    })
}

fn responsibility_text(line: &str) -> Option<String> {
    let text = clean_field(&plain_body(line));
    (!text.is_empty()).then_some(text)
}

/// Groups lines into entries: job lines open an entry, any other line is a
/// responsibility of the open entry. Lines before the first job line are dropped.
pub fn entries_from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<ExperienceEntry> {
    let mut entries: Vec<ExperienceEntry> = Vec::new();
    for line in lines {
        if looks_like_job_line(line) {
            if let Some(entry) = parse_job_line(line) {
                entries.push(entry);
                continue;
            }
        }
        if let (Some(current), Some(text)) = (entries.last_mut(), responsibility_text(line)) {
            current.responsibilities.push(text);
        }
    }
    entries
}

/// Experience entries from the résumé's experience-like sections.
pub fn extract_experience(text: &str, lex: &Lexicon) -> Vec<ExperienceEntry> {
    dedupe_experience(entries_from_lines(section_lines(text, lex, is_experience_like)))
}

fn entry_from_record(record: &ExperienceRecord) -> ExperienceEntry {
    let field = |value: &Option<String>| value.as_deref().map(clean_field).unwrap_or_default();
    let start_date = field(&record.start_date);
    let mut end_date = field(&record.end_date);
    if end_date.is_empty() && !start_date.is_empty() {
        end_date = "Present".to_string();
    }
    ExperienceEntry {
        company: field(&record.company),
        title: field(&record.title),
        start_date,
        end_date,
        responsibilities: record
            .responsibilities
            .clone()
            .map(|list| list.into_lines())
            .unwrap_or_default()
            .iter()
            .filter_map(|line| responsibility_text(line))
            .collect(),
    }
}

/// Resolves supplementary experience (strings or records) into entries.
pub fn resolve_experience_inputs(inputs: &[ExperienceInput]) -> Vec<ExperienceEntry> {
    let mut out = Vec::new();
    for input in inputs {
        match input {
            ExperienceInput::Line(text) => {
                let parsed = entries_from_lines(text.lines());
                if parsed.is_empty() {
                    if let Some(title) = responsibility_text(text) {
                        out.push(ExperienceEntry {
                            title,
                            ..Default::default()
                        });
                    }
                } else {
                    out.extend(parsed);
                }
            }
            ExperienceInput::Record(record) => {
                let entry = entry_from_record(record);
                if !entry.title.is_empty() || !entry.company.is_empty() {
                    out.push(entry);
                }
            }
        }
    }
    out
}

/// Collapses entries sharing an identity key. The first occurrence wins; later
/// duplicates contribute responsibilities it does not already have.
pub fn dedupe_experience(entries: Vec<ExperienceEntry>) -> Vec<ExperienceEntry> {
    let mut index: HashMap<(String, String, String, String), usize> = HashMap::new();
    let mut out: Vec<ExperienceEntry> = Vec::new();
    for entry in entries {
        match index.get(&entry.identity_key()) {
            Some(&pos) => {
                let kept = &mut out[pos];
                for line in entry.responsibilities {
                    if !kept
                        .responsibilities
                        .iter()
                        .any(|r| r.eq_ignore_ascii_case(&line))
                    {
                        kept.responsibilities.push(line);
                    }
                }
            }
            None => {
                index.insert(entry.identity_key(), out.len());
                out.push(entry);
            }
        }
    }
    out
}
