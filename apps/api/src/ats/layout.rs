use serde_json::json;

use super::analysis::{word_len, TextAnalysis};
use super::tunables::Tunables;
use crate::lexicon::Lexicon;
use crate::models::metrics::MISSING_INPUT_TIP;
use crate::models::{Category, Metric};

/// The four sections every ATS looks for, each with the heading words that count.
const KEY_SECTIONS: &[(&str, &[&str])] = &[
    ("experience", &["experience", "employment", "work history"]),
    ("education", &["education", "academic"]),
    ("skills", &["skill", "competenc"]),
    ("summary", &["summary", "profile", "objective"]),
];

const ENCOURAGEMENT: &str =
    "Layout is clean and easy to search: clear headings, scannable bullets and contact details.";

pub fn analyze(analysis: &TextAnalysis, _lex: &Lexicon, tunables: &Tunables) -> Metric {
    let category = Category::LayoutSearchability;
    if analysis.is_empty() {
        return Metric::zero(category, MISSING_INPUT_TIP);
    }
    let t = &tunables.layout;
    let mut tips = Vec::new();

    let heading_score = (analysis.headings.len() as f64 / t.target_headings.max(1) as f64).min(1.0);
    if analysis.headings.len() < t.target_headings {
        tips.push(format!(
            "Use at least {} clear section headings so ATS parsers can segment the résumé.",
            t.target_headings
        ));
    }

    let missing: Vec<&str> = KEY_SECTIONS
        .iter()
        .filter(|(_, words)| {
            !analysis
                .headings
                .iter()
                .any(|h| words.iter().any(|w| h.contains(w)))
        })
        .map(|(name, _)| *name)
        .collect();
    let key_score = (KEY_SECTIONS.len() - missing.len()) as f64 / KEY_SECTIONS.len() as f64;
    if !missing.is_empty() {
        tips.push(format!("Add the missing key sections: {}.", missing.join(", ")));
    }

    let bullet_ratio = if analysis.content_lines == 0 {
        0.0
    } else {
        analysis.bullets.len() as f64 / analysis.content_lines as f64
    };
    let bullet_score = (1.0
        - (bullet_ratio - t.ideal_bullet_ratio).abs() / t.bullet_ratio_tolerance)
        .max(0.0);
    if bullet_ratio < t.ideal_bullet_ratio - t.bullet_ratio_tolerance / 2.0 {
        tips.push("Break long descriptions into bullet points recruiters can scan.".to_string());
    } else if bullet_ratio > t.ideal_bullet_ratio + t.bullet_ratio_tolerance / 2.0 {
        tips.push("Balance bullets with short headers and context lines.".to_string());
    }

    let contact_score = match (analysis.has_email, analysis.has_phone) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.6,
        (false, false) => 0.0,
    };
    if contact_score < 1.0 {
        tips.push("Put an email address and phone number at the top of the résumé.".to_string());
    }

    let mut score = 100.0
        * (t.heading_weight * heading_score
            + t.key_section_weight * key_score
            + t.bullet_weight * bullet_score
            + t.contact_weight * contact_score);

    let dense = analysis
        .paragraphs
        .iter()
        .filter(|p| word_len(p) >= t.dense_paragraph_words)
        .count();
    if dense > 0 {
        score -= (dense as f64 * t.dense_paragraph_penalty).min(t.dense_paragraph_penalty_cap);
        tips.push(format!(
            "Split {dense} dense paragraph(s) of {}+ words into bullets.",
            t.dense_paragraph_words
        ));
    }

    let line_count = analysis.lines.len();
    let pages = line_count.div_ceil(t.lines_per_page.max(1));
    if pages > t.max_pages {
        score -= (pages - t.max_pages) as f64 * t.extra_page_penalty;
        tips.push(format!(
            "Trim the résumé to {} pages or fewer (currently about {pages}).",
            t.max_pages
        ));
    }
    if line_count > t.max_lines {
        score -= t.long_document_penalty;
        tips.push("Cut older or less relevant lines; the document is unusually long.".to_string());
    }

    Metric::new(
        category,
        score,
        tips,
        ENCOURAGEMENT,
        json!({
            "headings": analysis.headings.len(),
            "missingSections": missing,
            "bulletRatio": (bullet_ratio * 100.0).round() / 100.0,
            "hasEmail": analysis.has_email,
            "hasPhone": analysis.has_phone,
            "hasLinkedin": analysis.has_linkedin,
            "denseParagraphs": dense,
            "estimatedPages": pages,
            "lineCount": line_count,
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

    const WELL_FORMED: &str = "Alex Doe\nalex@example.com | 555-123-4567\n\
        # Summary\nBackend engineer.\n\
        # Experience\nStaff Engineer | Acme | 2020 - Present\n- Led the billing rewrite\n- Cut costs by 30%\n\
        - Mentored four engineers\n- Automated deploys\nSRE | Globex | 2017 - 2019\n- Ran on-call\n\
        # Education\nBSc, MIT\n# Skills\nRust, Go\n# Projects\nQuill\n# Awards\nHackathon winner";

    #[test]
    fn test_well_formed_resume_scores_high() {
        let metric = score(WELL_FORMED);
        assert!(metric.score >= 85, "score was {}", metric.score);
        assert_eq!(metric.details["missingSections"], json!([]));
        assert!(!metric.tips.is_empty());
    }

    #[test]
    fn test_wall_of_text_is_penalized() {
        let paragraph = vec!["word"; 90].join(" ");
        let metric = score(&paragraph);
        assert!(metric.score < 30, "score was {}", metric.score);
        assert_eq!(metric.details["denseParagraphs"], 1);
        assert!(metric.tips.iter().any(|t| t.contains("key sections")));
    }

    #[test]
    fn test_long_documents_lose_points() {
        let long: String = WELL_FORMED.to_string() + &"\n- Did a thing".repeat(120);
        let metric = score(&long);
        assert_eq!(metric.details["estimatedPages"], 3);
        assert!(metric.score < score(WELL_FORMED).score);
    }

    #[test]
    fn test_empty_text_is_zero() {
        let metric = score("");
        assert_eq!(metric.score, 0);
        assert_eq!(metric.tips.len(), 1);
    }
}
