use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extract::certification::extract_certifications;
use crate::extract::contact::extract_contact;
use crate::extract::education::extract_education;
use crate::extract::experience::extract_experience;
use crate::extract::line_view;
use crate::models::{CertificationEntry, ContactDetails, Document, ExperienceEntry, VerifiedProfile};
use crate::parser::input::SkillList;
use crate::parser::parse_document;
use crate::parser::tokenizer::TokenizeOptions;
use crate::reconcile::{reconcile, ReconcileContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    #[serde(alias = "text", alias = "resumeText")]
    pub raw_text: String,
    #[serde(default)]
    pub job_skills: Option<SkillList>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub project_blurb: Option<String>,
    #[serde(default)]
    pub profile: Option<VerifiedProfile>,
    #[serde(default)]
    pub preserve_link_labels: bool,
    /// Explicit LinkedIn URL; wins over one found in the text.
    #[serde(default)]
    pub linkedin: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub document: Document,
    pub contact: ContactDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    #[serde(alias = "text", alias = "resumeText")]
    pub raw_text: String,
    #[serde(default)]
    pub linkedin: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<String>,
    pub certifications: Vec<CertificationEntry>,
    pub contact: ContactDetails,
}

/// POST /api/v1/resume/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    state.ensure_resume_size(&req.raw_text)?;
    let lex = state.lexicon.as_ref();
    let text = line_view(&req.raw_text);

    let mut ctx = req
        .profile
        .as_ref()
        .map(ReconcileContext::from_profile)
        .unwrap_or_default();
    ctx.job_skills = req.job_skills.as_ref().map(SkillList::flatten).unwrap_or_default();
    ctx.job_title = req.job_title;
    ctx.project_blurb = req.project_blurb;
    ctx.resume_certifications = extract_certifications(&text, lex);

    let opts = TokenizeOptions {
        preserve_link_labels: req.preserve_link_labels,
    };
    let document = reconcile(parse_document(&req.raw_text, lex, opts), &ctx, lex);
    let contact = extract_contact(&text, req.linkedin.as_deref());

    info!(
        bytes = req.raw_text.len(),
        sections = document.sections.len(),
        job_skills = ctx.job_skills.len(),
        "Parsed résumé"
    );
    Ok(Json(ParseResponse { document, contact }))
}

/// POST /api/v1/resume/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    state.ensure_resume_size(&req.raw_text)?;
    let lex = state.lexicon.as_ref();
    let text = line_view(&req.raw_text);

    let response = ExtractResponse {
        experience: extract_experience(&text, lex),
        education: extract_education(&text, lex),
        certifications: extract_certifications(&text, lex),
        contact: extract_contact(&text, req.linkedin.as_deref()),
    };
    info!(
        jobs = response.experience.len(),
        education = response.education.len(),
        certifications = response.certifications.len(),
        "Extracted résumé entities"
    );
    Ok(Json(response))
}
