use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::ats::ANALYZERS;
use crate::state::AppState;

/// GET /health
/// Service version plus what the scoring engine was loaded with.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let weights = &state.tunables.composite;
    let analyzers: Vec<Value> = ANALYZERS
        .iter()
        .map(|(category, _)| {
            json!({
                "category": category.key(),
                "weight": weights.weight(*category),
            })
        })
        .collect();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "quill-api",
        "analyzers": analyzers,
        "lexicon": {
            "knownHeadings": state.lexicon.known_headings.len(),
            "skillCategories": state.lexicon.skill_categories.len(),
            "actionVerbs": state.lexicon.action_verbs.len(),
        },
        "maxResumeBytes": state.config.max_resume_bytes,
    }))
}
