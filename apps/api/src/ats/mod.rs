//! ATS scoring engine: five independent analyzers over one shared `TextAnalysis`,
//! then a weighted composite.

pub mod analysis;
pub mod composite;
pub mod crispness;
pub mod handlers;
pub mod impact;
pub mod layout;
pub mod quality;
pub mod readability;
pub mod tunables;

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use crate::lexicon::Lexicon;
use crate::models::{Category, Metric, Rating, ScoreBreakdown};

use self::analysis::TextAnalysis;
use self::composite::{composite_score, explain_composite, Phase};
use self::tunables::Tunables;

pub type Analyzer = fn(&TextAnalysis, &Lexicon, &Tunables) -> Metric;

pub const ANALYZERS: [(Category, Analyzer); 5] = [
    (Category::LayoutSearchability, layout::analyze),
    (Category::AtsReadability, readability::analyze),
    (Category::Impact, impact::analyze),
    (Category::Crispness, crispness::analyze),
    (Category::OtherQuality, quality::analyze),
];

/// Runs every analyzer in order on the calling thread.
pub fn score_breakdown(analysis: &TextAnalysis, lex: &Lexicon, tunables: &Tunables) -> ScoreBreakdown {
    if analysis.is_empty() {
        return ScoreBreakdown::zero();
    }
    ScoreBreakdown::from_parts(
        ANALYZERS
            .iter()
            .map(|(_, analyze)| analyze(analysis, lex, tunables))
            .collect(),
    )
}

/// Fans the analyzers out as blocking tasks over the shared snapshot and joins them.
/// Produces the same breakdown as [`score_breakdown`].
pub async fn score_breakdown_concurrent(
    analysis: Arc<TextAnalysis>,
    lex: Arc<Lexicon>,
    tunables: Arc<Tunables>,
) -> anyhow::Result<ScoreBreakdown> {
    if analysis.is_empty() {
        return Ok(ScoreBreakdown::zero());
    }

    let handles: Vec<_> = ANALYZERS
        .iter()
        .map(|&(category, analyze)| {
            let (analysis, lex, tunables) = (analysis.clone(), lex.clone(), tunables.clone());
            let handle =
                tokio::task::spawn_blocking(move || analyze(&analysis, &lex, &tunables));
            (category, handle)
        })
        .collect();

    let mut metrics = Vec::with_capacity(handles.len());
    for (category, handle) in handles {
        let metric = handle
            .await
            .with_context(|| format!("{} analyzer task failed", category.key()))?;
        metrics.push(metric);
    }
    Ok(ScoreBreakdown::from_parts(metrics))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub composite_score: u8,
    pub rating: Rating,
    pub breakdown: ScoreBreakdown,
    pub explanation: String,
}

impl ScoreReport {
    pub fn new(breakdown: ScoreBreakdown, tunables: &Tunables, phase: Phase) -> Self {
        let composite_score = composite_score(&breakdown, &tunables.composite);
        let explanation = explain_composite(&breakdown, &tunables.composite, phase);
        debug!(composite_score, ?phase, "Scored résumé");
        Self {
            composite_score,
            rating: Rating::from_score(composite_score),
            breakdown,
            explanation,
        }
    }
}

/// Synchronous end-to-end scoring of raw résumé text.
pub fn score_resume(
    raw: &str,
    job_description: Option<&str>,
    job_skills: &[String],
    phase: Phase,
    lex: &Lexicon,
    tunables: &Tunables,
) -> ScoreReport {
    let analysis = TextAnalysis::build(raw, job_description, job_skills, lex, tunables);
    ScoreReport::new(score_breakdown(&analysis, lex, tunables), tunables, phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Alex Doe\nalex@example.com | 555-123-4567 | linkedin.com/in/alex\n\
        # Summary\nBackend engineer shipping Rust services on AWS.\n\
        # Experience\nStaff Engineer | Acme | Jan 2020 - Present\n\
        - Led the migration of forty billing services to Rust across three regions\n\
        - Reduced cloud spend by 30% by rightsizing Kubernetes clusters and removing idle nodes\n\
        - Responsible for on-call\n\
        # Education\nBSc Computer Science, MIT\n# Skills\nRust, AWS, Kubernetes, SQL";

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_text_gives_complete_zero_breakdown() {
        for raw in ["", "   \n\t\n"] {
            let report = score_resume(raw, None, &[], Phase::Uploaded, Lexicon::shared(), &Tunables::default());
            assert_eq!(report.composite_score, 0);
            for metric in report.breakdown.ordered() {
                assert_eq!(metric.score, 0);
                assert_eq!(metric.rating, Rating::NeedsImprovement);
                assert!(!metric.tips.is_empty());
            }
        }
    }

    #[test]
    fn test_breakdown_is_complete_for_any_input() {
        let t = Tunables::default();
        for raw in [RESUME, "x", "{\"sections\": []}", "| a | b |", "①②③"] {
            let report = score_resume(raw, Some("Rust Kafka"), &skills(&["rust"]), Phase::Enhanced, Lexicon::shared(), &t);
            let metrics = report.breakdown.ordered();
            assert_eq!(metrics.len(), 5);
            for (metric, category) in metrics.iter().zip(Category::ALL) {
                assert_eq!(metric.category, category);
                assert!(metric.score <= 100);
                assert!(!metric.tips.is_empty());
            }
            let min = metrics.iter().map(|m| m.score).min().unwrap_or(0);
            let max = metrics.iter().map(|m| m.score).max().unwrap_or(0);
            assert!((min..=max).contains(&report.composite_score));
        }
    }

    #[test]
    fn test_realistic_resume_scores_reasonably() {
        let report = score_resume(
            RESUME,
            Some("Senior Rust engineer with AWS and Kubernetes experience"),
            &skills(&["Rust", "AWS"]),
            Phase::Uploaded,
            Lexicon::shared(),
            &Tunables::default(),
        );
        assert!(report.composite_score >= 60, "composite was {}", report.composite_score);
        assert_eq!(report.breakdown.ats_readability.score, 100);
        assert!(report.explanation.starts_with("Uploaded résumé ATS score:"));
    }

    #[tokio::test]
    async fn test_concurrent_fan_out_matches_sequential() {
        let lex = Arc::new(Lexicon::default());
        let tunables = Arc::new(Tunables::default());
        let analysis = Arc::new(TextAnalysis::build(
            RESUME,
            Some("Rust AWS Terraform"),
            &skills(&["Rust"]),
            &lex,
            &tunables,
        ));
        let sequential = score_breakdown(&analysis, &lex, &tunables);
        let concurrent = score_breakdown_concurrent(analysis, lex, tunables).await.unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn test_concurrent_empty_is_zero() {
        let t = Tunables::default();
        let analysis = Arc::new(TextAnalysis::build("", None, &[], Lexicon::shared(), &t));
        let breakdown = score_breakdown_concurrent(analysis, Arc::new(Lexicon::default()), Arc::new(t))
            .await
            .unwrap();
        assert_eq!(breakdown, ScoreBreakdown::zero());
    }
}
