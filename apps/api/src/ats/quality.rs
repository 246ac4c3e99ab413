use serde_json::json;

use super::analysis::TextAnalysis;
use super::tunables::{QualityTunables, Tunables};
use crate::lexicon::Lexicon;
use crate::models::metrics::MISSING_INPUT_TIP;
use crate::models::{Category, Metric};

const ENCOURAGEMENT: &str = "Skills and keywords line up well with what recruiters search for.";

fn band_closeness(value: f64, t: &QualityTunables) -> f64 {
    let (lo, hi) = t.density_band;
    if value < lo {
        value / lo
    } else if value > hi {
        (1.0 - (value - hi) / (1.0 - hi)).max(0.0)
    } else {
        1.0
    }
}

pub fn analyze(analysis: &TextAnalysis, _lex: &Lexicon, tunables: &Tunables) -> Metric {
    let category = Category::OtherQuality;
    if analysis.is_empty() {
        return Metric::zero(category, MISSING_INPUT_TIP);
    }
    let t = &tunables.quality;
    let mut tips = Vec::new();

    let has_job_skills = !analysis.job_skills.is_empty();
    let missing_skills: Vec<&str> = analysis
        .job_skills
        .iter()
        .map(String::as_str)
        .filter(|s| !analysis.resume_skills.iter().any(|r| r == s) && !analysis.mentions(s))
        .collect();
    let coverage = if has_job_skills {
        1.0 - missing_skills.len() as f64 / analysis.job_skills.len() as f64
    } else {
        (analysis.resume_skills.len() as f64 / t.raw_skill_target.max(1) as f64).min(1.0)
    };
    if has_job_skills && !missing_skills.is_empty() {
        let sample: Vec<&str> = missing_skills.iter().take(5).copied().collect();
        tips.push(format!(
            "List the job skills you have but did not mention: {}.",
            sample.join(", ")
        ));
    } else if !has_job_skills && coverage < 1.0 {
        tips.push(format!(
            "List at least {} concrete skills in a Skills section.",
            t.raw_skill_target
        ));
    }

    let density = if analysis.job_keywords.is_empty() {
        let share = analysis.content_word_count as f64 / analysis.word_count.max(1) as f64;
        band_closeness(share, t)
    } else {
        let hits = analysis
            .job_keywords
            .iter()
            .filter(|k| analysis.mentions(k))
            .count();
        hits as f64 / analysis.job_keywords.len() as f64
    };
    if density < 0.6 {
        tips.push(if analysis.job_keywords.is_empty() {
            "Trade filler words for concrete tools, domains and outcomes.".to_string()
        } else {
            "Mirror more of the job description's keywords where they are true for you.".to_string()
        });
    }

    let alignment = analysis.summary_alignment(tunables);
    if analysis.summary.is_empty() {
        tips.push("A summary that names your key skills earns extra credit.".to_string());
    }

    let coverage_weight = if has_job_skills {
        t.coverage_weight_with_job_skills
    } else {
        t.coverage_weight_without_job_skills
    };
    let score = 100.0 * (coverage_weight * coverage + (1.0 - coverage_weight) * density)
        + t.summary_bonus * alignment;

    Metric::new(
        category,
        score,
        tips,
        ENCOURAGEMENT,
        json!({
            "skillCoverage": (coverage * 100.0).round() / 100.0,
            "missingSkills": missing_skills,
            "resumeSkills": analysis.resume_skills.len(),
            "keywordDensity": (density * 100.0).round() / 100.0,
            "coverageWeight": coverage_weight,
            "summaryAlignment": (alignment * 100.0).round() / 100.0,
        }),
    )
}
