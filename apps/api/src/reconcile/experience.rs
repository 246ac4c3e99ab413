//! Work Experience reconciliation.
//!
//! Items are grouped into job blocks (a header line plus the lines under it), merged
//! with profile entries, deduplicated by identity key and ordered newest first.
//! Headers written in the résumé keep their tokens; headers for profile entries, or
//! for an entry whose title was overridden, are synthesized.

use std::collections::HashMap;

use tracing::debug;

use super::sections::{ensure_section, placeholder_item, PLACEHOLDER, WORK_EXPERIENCE};
use super::ReconcileContext;
use crate::extract::dates::{cmp_newest_first, end_date_sort_key};
use crate::extract::experience::{is_job_header, parse_job_line};
use crate::models::{Document, Entry, ExperienceEntry, Item, Style, Token};
use crate::parser::headings::is_experience_like;

#[derive(Debug, Clone)]
struct JobBlock {
    entry: ExperienceEntry,
    /// `None` when the header must be synthesized from `entry`.
    header: Option<Item>,
    body: Vec<Item>,
}

impl JobBlock {
    fn from_profile(entry: ExperienceEntry) -> Self {
        let body = entry
            .responsibilities
            .iter()
            .map(|line| vec![Token::Tab, Token::Bullet, Token::text(line.clone())])
            .collect();
        Self {
            entry,
            header: None,
            body,
        }
    }

    fn absorb(&mut self, other: JobBlock) {
        let existing: Vec<String> = self
            .body
            .iter()
            .map(|item| Entry::from_tokens(item).text.to_lowercase())
            .collect();
        for item in other.body {
            let text = Entry::from_tokens(&item).text.to_lowercase();
            if !existing.contains(&text) {
                self.body.push(item);
            }
        }
    }

    fn render(self) -> Vec<Item> {
        let header = self.header.unwrap_or_else(|| synthesize_header(&self.entry));
        std::iter::once(header).chain(self.body).collect()
    }
}

/// `[bullet, title(bold), jobsep, company, jobsep, "start - end"]`, skipping empty parts.
pub fn synthesize_header(entry: &ExperienceEntry) -> Item {
    let dates = match (entry.start_date.is_empty(), entry.end_date.is_empty()) {
        (false, false) => format!("{} - {}", entry.start_date, entry.end_date),
        (false, true) => entry.start_date.clone(),
        (true, false) => entry.end_date.clone(),
        (true, true) => String::new(),
    };
    let mut item = vec![Token::Bullet];
    let parts = [
        (entry.title.as_str(), Style::Bold),
        (entry.company.as_str(), Style::None),
        (dates.as_str(), Style::None),
    ];
    for (text, style) in parts.into_iter().filter(|(t, _)| !t.is_empty()) {
        if item.len() > 1 {
            item.push(Token::Jobsep);
        }
        item.push(Token::styled(text, style));
    }
    item
}

/// Splits section items into a preamble (before any job header) and job blocks.
fn group_blocks(items: Vec<Item>) -> (Vec<Item>, Vec<JobBlock>) {
    let mut preamble = Vec::new();
    let mut blocks: Vec<JobBlock> = Vec::new();
    for item in items {
        let entry = Entry::from_tokens(&item);
        let nested = entry.bullet || item.first() == Some(&Token::Tab);
        let header = is_job_header(&entry.text, nested)
            .then(|| parse_job_line(&entry.text))
            .flatten();
        match header {
            Some(entry) => blocks.push(JobBlock {
                entry,
                header: Some(item),
                body: Vec::new(),
            }),
            None => match blocks.last_mut() {
                Some(block) => block.body.push(item),
                None => preamble.push(item),
            },
        }
    }
    (preamble, blocks)
}

fn dedupe_blocks(blocks: Vec<JobBlock>) -> Vec<JobBlock> {
    let mut index: HashMap<(String, String, String, String), usize> = HashMap::new();
    let mut out: Vec<JobBlock> = Vec::new();
    for block in blocks {
        let key = block.entry.identity_key();
        match index.get(&key) {
            Some(&pos) => out[pos].absorb(block),
            None => {
                index.insert(key, out.len());
                out.push(block);
            }
        }
    }
    out
}

fn sibling_has_content(doc: &Document) -> bool {
    doc.sections.iter().any(|s| {
        s.heading != WORK_EXPERIENCE && is_experience_like(&s.heading) && !s.items.is_empty()
    })
}

pub fn reconcile_experience(doc: &mut Document, ctx: &ReconcileContext) {
    let has_sibling = sibling_has_content(doc);
    let section = ensure_section(doc, WORK_EXPERIENCE);
    let items: Vec<Item> = std::mem::take(&mut section.items)
        .into_iter()
        .filter(|item| Entry::from_tokens(item).text != PLACEHOLDER)
        .collect();
    let had_resume_content = !items.is_empty();

    let (preamble, mut blocks) = group_blocks(items);
    blocks.extend(ctx.profile_experience.iter().cloned().map(JobBlock::from_profile));
    let mut blocks = dedupe_blocks(blocks);
    blocks.sort_by(|a, b| {
        cmp_newest_first(
            end_date_sort_key(&a.entry.end_date),
            end_date_sort_key(&b.entry.end_date),
        )
    });

    if !had_resume_content {
        if let (Some(title), Some(newest)) = (
            ctx.job_title.as_deref().map(str::trim).filter(|t| !t.is_empty()),
            blocks.first_mut(),
        ) {
            newest.entry.title = title.to_string();
            newest.header = None;
        }
    }

    debug!(
        jobs = blocks.len(),
        preamble = preamble.len(),
        "Reconciled work experience"
    );

    section.items = preamble
        .into_iter()
        .chain(blocks.into_iter().flat_map(JobBlock::render))
        .collect();
    if section.items.is_empty() && !has_sibling {
        section.items.push(placeholder_item());
    }
}
