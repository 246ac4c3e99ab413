//! ATS Readability: starts at 100 and subtracts a fixed penalty per formatting
//! pattern that trips up résumé parsers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use super::analysis::TextAnalysis;
use super::tunables::Tunables;
use crate::lexicon::Lexicon;
use crate::models::metrics::MISSING_INPUT_TIP;
use crate::models::{Category, Metric};

static TABLE_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|.*\|\s*$|^\s*\|?\s*:?-{3,}:?\s*\|").unwrap());

static TOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btable of contents\b|^\s*contents\s*$").unwrap());

static PAGE_FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpage\s+\d+\s*(?:of|/)\s*\d+\b").unwrap());

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)!\[[^\]]*\]\([^)]*\)|<img\b|\S+\.(?:png|jpe?g|gif|svg|webp)\b").unwrap()
});

const DECORATIVE_BRACKETS: &[char] = &[
    '【', '】', '〖', '〗', '〔', '〕', '「', '」', '『', '』', '《', '》', '⟦', '⟧', '⟨', '⟩', '«', '»',
];

const ENCOURAGEMENT: &str =
    "Formatting is ATS-friendly: no tables, columns, images or decorative characters.";

/// Box drawing, block elements and enclosed alphanumerics.
fn is_decorative_glyph(c: char) -> bool {
    matches!(c as u32,
        0x2460..=0x24FF | 0x2500..=0x257F | 0x2580..=0x259F | 0x2776..=0x2793 | 0x1F100..=0x1F1FF)
}

fn has_column_gap(line: &str, min_spaces: usize) -> bool {
    let gap = " ".repeat(min_spaces.max(1));
    line.trim().contains(&gap)
}

fn is_table_line(line: &str) -> bool {
    TABLE_ROW_RE.is_match(line) || line.trim().matches('\t').count() >= 2
}

pub fn analyze(analysis: &TextAnalysis, _lex: &Lexicon, tunables: &Tunables) -> Metric {
    let category = Category::AtsReadability;
    if analysis.is_empty() {
        return Metric::zero(category, MISSING_INPUT_TIP);
    }
    let t = &tunables.readability;
    let lines = &analysis.lines;
    let mut score = 100.0;
    let mut tips = Vec::new();

    let tables = lines.iter().filter(|l| is_table_line(l)).count();
    if tables > 0 {
        score -= t.table_penalty;
        tips.push("Replace tables with plain lines; many ATS parsers scramble table cells.".to_string());
    }

    let toc = lines.iter().any(|l| TOC_RE.is_match(l));
    if toc {
        score -= t.toc_penalty;
        tips.push("Remove the table of contents; résumés should not need one.".to_string());
    }

    let footers = lines.iter().any(|l| PAGE_FOOTER_RE.is_match(l));
    if footers {
        score -= t.page_footer_penalty;
        tips.push("Drop \"Page X of Y\" footers; they get parsed as résumé content.".to_string());
    }

    let images = lines.iter().any(|l| IMAGE_RE.is_match(l));
    if images {
        score -= t.image_penalty;
        tips.push("Remove embedded images and logos; ATS software cannot read them.".to_string());
    }

    let column_lines = lines
        .iter()
        .filter(|l| has_column_gap(l, t.column_min_spaces))
        .count();
    if column_lines >= t.column_min_lines {
        score -= (column_lines as f64 * t.column_penalty_per_line).min(t.column_penalty_cap);
        tips.push("Use a single-column layout; spaced-out columns are read out of order.".to_string());
    }

    let brackets = lines
        .iter()
        .any(|l| l.contains(DECORATIVE_BRACKETS));
    if brackets {
        score -= t.bracket_penalty;
        tips.push("Replace decorative brackets with plain punctuation.".to_string());
    }

    let glyphs = lines
        .iter()
        .flat_map(|l| l.chars())
        .filter(|c| is_decorative_glyph(*c))
        .count();
    if glyphs > 0 {
        score -= (glyphs as f64 * t.glyph_penalty).min(t.glyph_penalty_cap);
        tips.push(format!(
            "Remove {glyphs} box-drawing or enclosed characters; they break text extraction."
        ));
    }

    Metric::new(
        category,
        score,
        tips,
        ENCOURAGEMENT,
        json!({
            "tableLines": tables,
            "tableOfContents": toc,
            "pageFooters": footers,
            "images": images,
            "columnLines": column_lines,
            "decorativeBrackets": brackets,
            "decorativeGlyphs": glyphs,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(raw: &str) -> Metric {
        let t = Tunables::default();
        let analysis = TextAnalysis::build(raw, None, &[], Lexicon::shared(), &t);
        analyze(&analysis, Lexicon::shared(), &t)
    }

    #[test]
    fn test_clean_text_is_perfect_with_encouragement() {
        let metric = score("Alex\n# Experience\nStaff Engineer | Acme | 2020 - Present\n- Led things");
        assert_eq!(metric.score, 100);
        assert_eq!(metric.tips, vec![ENCOURAGEMENT.to_string()]);
    }

    #[test]
    fn test_each_pattern_costs_its_penalty() {
        let t = Tunables::default().readability;
        assert_eq!(score("| Skill | Years |\n|---|---|").score as f64, 100.0 - t.table_penalty);
        assert_eq!(score("Table of Contents\nAlex").score as f64, 100.0 - t.toc_penalty);
        assert_eq!(score("Alex\nPage 1 of 2").score as f64, 100.0 - t.page_footer_penalty);
        assert_eq!(score("Alex ![logo](logo.png)").score as f64, 100.0 - t.image_penalty);
        assert_eq!(score("【Alex】").score as f64, 100.0 - t.bracket_penalty);
    }

    #[test]
    fn test_column_gaps_need_three_lines() {
        assert_eq!(score("Alex     Rust\nBob     Go").score, 100);
        let metric = score("Alex     Rust\nBob     Go\nCat     Zig\nDan     C");
        assert_eq!(metric.score, 84);
        assert_eq!(metric.details["columnLines"], 4);
    }

    #[test]
    fn test_glyph_penalty_is_capped() {
        assert_eq!(score("Alex ①②").score, 97);
        let boxes = format!("Alex {}", "═".repeat(40));
        assert_eq!(score(&boxes).score, 82);
    }
}
