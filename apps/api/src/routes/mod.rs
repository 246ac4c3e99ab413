pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::ats::handlers as ats;
use crate::errors::AppError;
use crate::parser::handlers as resume;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resume/parse", post(resume::handle_parse))
        .route("/api/v1/resume/extract", post(resume::handle_extract))
        .route("/api/v1/resume/score", post(ats::handle_score))
        .fallback(not_found)
        .with_state(state)
}
