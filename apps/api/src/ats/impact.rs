use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use super::analysis::{mentions, words, TextAnalysis};
use super::tunables::Tunables;
use crate::lexicon::Lexicon;
use crate::models::metrics::MISSING_INPUT_TIP;
use crate::models::{Category, Metric};

static QUANTIFIED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d|[%$€£¥]").unwrap());

const ENCOURAGEMENT: &str =
    "Bullets lead with results and echo the job's language. Keep quantifying new wins.";

/// A bullet that names an action verb or quantifies something.
pub fn is_achievement(bullet: &str, lex: &Lexicon) -> bool {
    QUANTIFIED_RE.is_match(bullet) || words(bullet).any(|w| lex.is_action_verb(&w))
}

pub fn analyze(analysis: &TextAnalysis, lex: &Lexicon, tunables: &Tunables) -> Metric {
    let category = Category::Impact;
    if analysis.is_empty() {
        return Metric::zero(category, MISSING_INPUT_TIP);
    }
    let t = &tunables.impact;
    let mut tips = Vec::new();

    let achievements = analysis
        .bullets
        .iter()
        .filter(|b| is_achievement(b, lex))
        .count();
    let achievement_ratio = if analysis.bullets.is_empty() {
        0.0
    } else {
        achievements as f64 / analysis.bullets.len() as f64
    };
    if analysis.bullets.is_empty() {
        tips.push("Describe each role with bullets that state what you achieved.".to_string());
    } else if achievement_ratio < 0.6 {
        tips.push(
            "Start more bullets with a strong verb and add numbers: %, $, counts, time saved."
                .to_string(),
        );
    }

    let bullet_text = analysis.bullets.join("\n").to_lowercase();
    let missing_keywords: Vec<&str> = analysis
        .job_keywords
        .iter()
        .map(String::as_str)
        .filter(|k| !mentions(&bullet_text, k))
        .collect();
    let keyword_ratio = if analysis.job_keywords.is_empty() {
        tunables.neutral_ratio
    } else {
        1.0 - missing_keywords.len() as f64 / analysis.job_keywords.len() as f64
    };
    if !analysis.job_keywords.is_empty() && keyword_ratio < 0.5 {
        let sample: Vec<&str> = missing_keywords.iter().take(5).copied().collect();
        tips.push(format!(
            "Work these job keywords into your bullets: {}.",
            sample.join(", ")
        ));
    }

    let volume = (achievements as f64 / t.achievement_target.max(1) as f64).min(1.0);
    if achievements < t.achievement_target && !analysis.bullets.is_empty() {
        tips.push(format!(
            "Aim for at least {} achievement bullets across your roles (found {achievements}).",
            t.achievement_target
        ));
    }

    let alignment = analysis.summary_alignment(tunables);
    if analysis.summary.is_empty() {
        tips.push("Add a short summary that names your strongest skills.".to_string());
    } else if alignment < 0.5 {
        tips.push("Mention your core skills and the target role in the summary.".to_string());
    }

    let score = 100.0
        * (t.achievement_weight * achievement_ratio
            + t.keyword_weight * keyword_ratio
            + t.volume_weight * volume
            + t.summary_weight * alignment);

    Metric::new(
        category,
        score,
        tips,
        ENCOURAGEMENT,
        json!({
            "bullets": analysis.bullets.len(),
            "achievementBullets": achievements,
            "achievementRatio": (achievement_ratio * 100.0).round() / 100.0,
            "keywordHitRatio": (keyword_ratio * 100.0).round() / 100.0,
            "missingKeywords": missing_keywords,
            "summaryAlignment": (alignment * 100.0).round() / 100.0,
        }),
    )
}
