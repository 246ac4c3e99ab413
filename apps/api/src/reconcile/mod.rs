//! Section reconciliation: turns an assembled document into the final, complete one.
//!
//! Pass order matters. Headings are canonicalized and duplicates merged first so
//! every later pass can look sections up by their canonical name; the same two
//! passes run again at the end because synthesized sections may collide with
//! existing ones. Pruning is always last.

pub mod certifications;
pub mod experience;
pub mod sections;
pub mod skills;
pub mod summary;

use tracing::debug;

use crate::extract::certification::resolve_certification_inputs;
use crate::extract::education::resolve_education_inputs;
use crate::extract::experience::resolve_experience_inputs;
use crate::lexicon::Lexicon;
use crate::models::{CertificationEntry, Document, ExperienceEntry, VerifiedProfile};

use self::certifications::reconcile_certifications;
use self::experience::reconcile_experience;
use self::sections::{canonicalize_headings, ensure_education, ensure_projects, merge_sections, prune};
use self::skills::split_skills;
use self::summary::rescue_summary_jobs;

/// Everything reconciliation knows beyond the document itself. Supplementary inputs
/// are resolved into entities before they get here.
#[derive(Debug, Clone, Default)]
pub struct ReconcileContext {
    pub job_skills: Vec<String>,
    pub job_title: Option<String>,
    pub project_blurb: Option<String>,
    pub profile_experience: Vec<ExperienceEntry>,
    pub profile_education: Vec<String>,
    pub profile_certifications: Vec<CertificationEntry>,
    pub verified_credentials: Vec<CertificationEntry>,
    /// Certifications re-derived from the raw résumé text.
    pub resume_certifications: Vec<CertificationEntry>,
    pub profile_url: Option<String>,
}

impl ReconcileContext {
    pub fn from_profile(profile: &VerifiedProfile) -> Self {
        Self {
            profile_experience: resolve_experience_inputs(&profile.experience),
            profile_education: resolve_education_inputs(&profile.education),
            profile_certifications: resolve_certification_inputs(&profile.certifications),
            verified_credentials: resolve_certification_inputs(&profile.credentials),
            profile_url: profile.profile_url.clone(),
            ..Default::default()
        }
    }
}

pub fn reconcile(mut doc: Document, ctx: &ReconcileContext, lex: &Lexicon) -> Document {
    canonicalize_headings(&mut doc, lex);
    merge_sections(&mut doc);

    split_skills(&mut doc, &ctx.job_skills, lex);
    rescue_summary_jobs(&mut doc);
    reconcile_experience(&mut doc, ctx);
    ensure_education(&mut doc, ctx);
    reconcile_certifications(&mut doc, ctx);
    ensure_projects(&mut doc, ctx);

    canonicalize_headings(&mut doc, lex);
    merge_sections(&mut doc);
    prune(&mut doc);

    debug!(sections = doc.sections.len(), "Reconciled document");
    doc
}
