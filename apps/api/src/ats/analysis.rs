//! The shared analysis snapshot every ATS analyzer reads.
//!
//! Built once per request from the raw résumé text (structured input is flattened
//! to lines first) and never mutated afterwards, so analyzers can run concurrently
//! over one `Arc<TextAnalysis>`.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::tunables::Tunables;
use crate::extract::contact::extract_contact;
use crate::extract::{line_view, section_lines};
use crate::lexicon::Lexicon;
use crate::parser::assembler::heading_text;
use crate::parser::emphasis::strip_markers;
use crate::parser::tokenizer::strip_bullet;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z][A-Za-z0-9+#]*(?:[.\-/][A-Za-z0-9+#]+)*").unwrap()
});

const SKILL_SEPARATORS: &[char] = &[',', ';', '|', '•'];
const MAX_SKILL_WORDS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAnalysis {
    /// Every line of the line view, untrimmed.
    pub lines: Vec<String>,
    pub bullets: Vec<String>,
    /// Non-bulleted text blocks separated by blank lines or headings.
    pub paragraphs: Vec<String>,
    /// Lowercased heading text.
    pub headings: Vec<String>,
    /// Non-blank, non-heading lines.
    pub content_lines: usize,
    pub word_count: usize,
    /// Words that are not stop words.
    pub content_word_count: usize,
    /// Distinct lowercased non-stop words, in first-seen order.
    pub keyword_candidates: Vec<String>,
    /// Job skills followed by the most frequent job-description terms.
    pub job_keywords: Vec<String>,
    pub job_skills: Vec<String>,
    pub resume_skills: Vec<String>,
    pub summary: String,
    pub has_email: bool,
    pub has_phone: bool,
    pub has_linkedin: bool,
    lower_text: String,
}

/// Lowercased terms that look like words, including `c++`, `node.js` and `ci/cd`.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_lowercase())
}

/// True when `term` occurs in `haystack` on word boundaries. Both are lowercase.
pub fn mentions(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

pub fn word_len(text: &str) -> usize {
    text.split_whitespace().count()
}

fn is_caps_heading(line: &str, max_words: usize) -> bool {
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 3
        && letters.iter().all(|c| c.is_uppercase())
        && word_len(line) <= max_words
        && !line.chars().any(|c| c.is_ascii_digit() || matches!(c, '@' | ',' | ';' | '|'))
}

fn flush(block: &mut Vec<String>, paragraphs: &mut Vec<String>) {
    if !block.is_empty() {
        paragraphs.push(block.join(" "));
        block.clear();
    }
}

fn clean(line: &str) -> String {
    let trimmed = line.trim();
    strip_markers(strip_bullet(trimmed).unwrap_or(trimmed))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_summary_heading(heading: &str) -> bool {
    let lower = heading.to_lowercase();
    ["summary", "objective", "profile", "about"]
        .iter()
        .any(|k| lower.contains(k))
}

fn is_skills_heading(heading: &str) -> bool {
    let lower = heading.to_lowercase();
    lower.contains("skill") || lower.contains("competenc")
}

fn resume_skills(text: &str, lex: &Lexicon) -> Vec<String> {
    let mut seen = HashSet::new();
    section_lines(text, lex, is_skills_heading)
        .into_iter()
        .map(clean)
        .flat_map(|line| {
            let body = match line.split_once(':') {
                Some((label, rest)) if word_len(label) <= 3 => rest.to_string(),
                _ => line,
            };
            body.split(SKILL_SEPARATORS)
                .map(|s| s.trim().trim_end_matches('.').to_lowercase())
                .collect::<Vec<_>>()
        })
        .filter(|s| !s.is_empty() && word_len(s) <= MAX_SKILL_WORDS)
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Job skills first, then job-description terms by descending frequency (ties keep
/// first occurrence), capped at `limit`.
fn job_keywords(
    job_description: Option<&str>,
    job_skills: &[String],
    lex: &Lexicon,
    limit: usize,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = job_skills
        .iter()
        .filter(|s| seen.insert((*s).clone()))
        .cloned()
        .collect();

    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, word) in words(job_description.unwrap_or_default()).enumerate() {
        if word.len() < 2 || lex.is_stop_word(&word) {
            continue;
        }
        counts.entry(word).or_insert((0, position)).0 += 1;
    }
    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

    out.extend(
        ranked
            .into_iter()
            .map(|(word, _)| word)
            .filter(|w| seen.insert(w.clone())),
    );
    out.truncate(limit);
    out
}

impl TextAnalysis {
    pub fn build(
        raw: &str,
        job_description: Option<&str>,
        job_skills: &[String],
        lex: &Lexicon,
        tunables: &Tunables,
    ) -> Self {
        let text = line_view(raw);
        let mut analysis = TextAnalysis {
            lines: text.lines().map(str::to_string).collect(),
            ..Default::default()
        };

        let mut block: Vec<String> = Vec::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                flush(&mut block, &mut analysis.paragraphs);
                continue;
            }
            if let Some(heading) = heading_text(trimmed, lex)
                .or_else(|| is_caps_heading(trimmed, tunables.max_heading_words).then(|| trimmed.to_string()))
            {
                flush(&mut block, &mut analysis.paragraphs);
                analysis.headings.push(strip_markers(&heading).trim().to_lowercase());
                continue;
            }
            analysis.content_lines += 1;
            match strip_bullet(trimmed) {
                Some(rest) => {
                    flush(&mut block, &mut analysis.paragraphs);
                    let rest = strip_markers(rest).trim().to_string();
                    if !rest.is_empty() {
                        analysis.bullets.push(rest);
                    }
                }
                None => block.push(strip_markers(trimmed)),
            }
        }
        flush(&mut block, &mut analysis.paragraphs);

        let mut seen = HashSet::new();
        for word in words(&text) {
            analysis.word_count += 1;
            if lex.is_stop_word(&word) {
                continue;
            }
            analysis.content_word_count += 1;
            if word.len() >= 3 && seen.insert(word.clone()) {
                analysis.keyword_candidates.push(word);
            }
        }

        analysis.job_skills = job_skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        analysis.job_keywords = job_keywords(
            job_description,
            &analysis.job_skills,
            lex,
            tunables.max_job_keywords,
        );
        analysis.resume_skills = resume_skills(&text, lex);
        analysis.summary = section_lines(&text, lex, is_summary_heading)
            .into_iter()
            .map(clean)
            .collect::<Vec<_>>()
            .join(" ");

        let contact = extract_contact(&text, None);
        analysis.has_email = contact.email.is_some();
        analysis.has_phone = contact.phone.is_some();
        analysis.has_linkedin = contact.linkedin.is_some();

        analysis.lower_text = text.to_lowercase();
        analysis
    }

    /// No scorable words at all.
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Whole-document mention check for a lowercase term.
    pub fn mentions(&self, term: &str) -> bool {
        mentions(&self.lower_text, term)
    }

    /// How well the summary echoes the job keywords and listed skills, in [0, 1].
    /// No summary scores 0; a summary with nothing to compare against is neutral.
    pub fn summary_alignment(&self, tunables: &Tunables) -> f64 {
        if self.summary.is_empty() {
            return 0.0;
        }
        let terms: HashSet<&str> = self
            .job_keywords
            .iter()
            .chain(&self.resume_skills)
            .map(String::as_str)
            .collect();
        if terms.is_empty() {
            return tunables.neutral_ratio;
        }
        let summary = self.summary.to_lowercase();
        let hits = terms.iter().filter(|t| mentions(&summary, t)).count();
        (hits as f64 / tunables.summary_hit_target.max(1) as f64).min(1.0)
    }
}
