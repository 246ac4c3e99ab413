use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::{Metric, Rating, ScoreBreakdown};
use crate::parser::input::SkillList;
use crate::state::AppState;

use super::analysis::TextAnalysis;
use super::composite::Phase;
use super::{score_breakdown_concurrent, ScoreReport};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[serde(alias = "text", alias = "resumeText")]
    pub raw_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub job_skills: Option<SkillList>,
    #[serde(default)]
    pub phase: Phase,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub composite_score: u8,
    pub rating: Rating,
    /// The five metrics in fixed category order.
    pub metrics: Vec<Metric>,
    pub breakdown: ScoreBreakdown,
    pub explanation: String,
}

impl From<ScoreReport> for ScoreResponse {
    fn from(report: ScoreReport) -> Self {
        Self {
            composite_score: report.composite_score,
            rating: report.rating,
            metrics: report.breakdown.ordered().into_iter().cloned().collect(),
            breakdown: report.breakdown,
            explanation: report.explanation,
        }
    }
}

/// POST /api/v1/resume/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    state.ensure_resume_size(&req.raw_text)?;
    let job_skills = req.job_skills.as_ref().map(SkillList::flatten).unwrap_or_default();

    let analysis = Arc::new(TextAnalysis::build(
        &req.raw_text,
        req.job_description.as_deref(),
        &job_skills,
        &state.lexicon,
        &state.tunables,
    ));
    let breakdown =
        score_breakdown_concurrent(analysis, state.lexicon.clone(), state.tunables.clone()).await?;
    let report = ScoreReport::new(breakdown, &state.tunables, req.phase);

    info!(
        bytes = req.raw_text.len(),
        composite = report.composite_score,
        phase = ?req.phase,
        "Scored résumé"
    );
    Ok(Json(report.into()))
}
