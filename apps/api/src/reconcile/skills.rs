//! Skill splitting, filtering against the job's skill list, and umbrella grouping.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::Lexicon;
use crate::models::{Document, Entry, Item, Style, Token};

static LABEL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[^:,;]{1,30}:\s+").unwrap());

const MAX_LABEL_WORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Skill {
    text: String,
    href: Option<String>,
}

impl Skill {
    fn render(&self) -> Item {
        match &self.href {
            Some(href) => vec![Token::Bullet, Token::link(self.text.clone(), href.clone())],
            None => vec![Token::Bullet, Token::text(self.text.clone())],
        }
    }
}

fn strip_label(text: &str) -> &str {
    match LABEL_PREFIX_RE.find(text) {
        Some(m) if m.as_str().split_whitespace().count() <= MAX_LABEL_WORDS => &text[m.end()..],
        _ => text,
    }
}

fn word_seq(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && !matches!(c, '+' | '#'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when `needle` appears in `haystack` as a run of whole words.
fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn split_entry(entry: &Entry) -> Vec<Skill> {
    strip_label(&entry.text)
        .split([',', ';'])
        .map(|s| s.trim().trim_end_matches('.').trim())
        .filter(|s| !s.is_empty())
        .map(|text| {
            let words = word_seq(text);
            let href = entry
                .links
                .iter()
                .find(|l| {
                    let label = word_seq(&l.text);
                    contains_run(&label, &words) || contains_run(&words, &label)
                })
                .map(|l| l.href.clone());
            Skill {
                text: text.to_string(),
                href,
            }
        })
        .collect()
}

fn category_label(category: &str) -> String {
    if category.contains('/') {
        return category.to_uppercase();
    }
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keeps skills named by the job, plus skills whose category umbrella holds a job
/// skill that the résumé also lists.
fn filter_to_job(skills: Vec<Skill>, job_skills: &[String], lex: &Lexicon) -> Vec<Skill> {
    let wanted: HashSet<String> = job_skills.iter().map(|s| s.trim().to_lowercase()).collect();
    let matched_categories: HashSet<&str> = skills
        .iter()
        .map(|s| s.text.to_lowercase())
        .filter(|lower| wanted.contains(lower))
        .filter_map(|lower| lex.skill_category(&lower))
        .collect();
    skills
        .into_iter()
        .filter(|s| {
            let lower = s.text.to_lowercase();
            wanted.contains(&lower)
                || lex
                    .skill_category(&lower)
                    .is_some_and(|cat| matched_categories.contains(cat))
        })
        .collect()
}

/// Renders skills one bullet each; categories with two or more members collapse into
/// a bold umbrella bullet followed by an indented member line.
fn render_grouped(skills: &[Skill], lex: &Lexicon) -> Vec<Item> {
    let category_of = |s: &Skill| lex.skill_category(&s.text.to_lowercase());
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut items = Vec::new();
    for skill in skills {
        let Some(category) = category_of(skill) else {
            items.push(skill.render());
            continue;
        };
        let members: Vec<&Skill> = skills
            .iter()
            .filter(|&s| category_of(s) == Some(category))
            .collect();
        if members.len() < 2 {
            items.push(skill.render());
            continue;
        }
        if !emitted.insert(category) {
            continue;
        }
        let names: Vec<&str> = members.iter().map(|s| s.text.as_str()).collect();
        items.push(vec![
            Token::Bullet,
            Token::styled(category_label(category), Style::Bold),
        ]);
        items.push(vec![Token::Tab, Token::Bullet, Token::text(names.join(", "))]);
    }
    items
}

/// Explodes delimited skill lines in every skills section into bullets, filtered
/// against `job_skills` when one is given.
pub fn split_skills(doc: &mut Document, job_skills: &[String], lex: &Lexicon) {
    for section in doc
        .sections
        .iter_mut()
        .filter(|s| s.heading.to_lowercase().contains("skill"))
    {
        let mut seen = HashSet::new();
        let mut skills = Vec::new();
        let mut verbatim = Vec::new();
        for item in &section.items {
            let entry = Entry::from_tokens(item);
            let delimited = entry.text.contains([',', ';']);
            if !delimited && job_skills.is_empty() {
                verbatim.push(item.clone());
                continue;
            }
            for skill in split_entry(&entry) {
                if seen.insert(skill.text.to_lowercase()) {
                    skills.push(skill);
                }
            }
        }

        if !job_skills.is_empty() {
            skills = filter_to_job(skills, job_skills, lex);
        }
        verbatim.extend(render_grouped(&skills, lex));
        section.items = verbatim;
    }
}
