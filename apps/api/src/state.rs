use std::sync::Arc;

use crate::ats::tunables::Tunables;
use crate::config::Config;
use crate::errors::AppError;
use crate::lexicon::Lexicon;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Vocabulary tables shared by the parser, reconciler and analyzers.
    pub lexicon: Arc<Lexicon>,
    pub tunables: Arc<Tunables>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            lexicon: Arc::new(Lexicon::default()),
            tunables: Arc::new(Tunables::default()),
        }
    }

    pub fn ensure_resume_size(&self, raw_text: &str) -> Result<(), AppError> {
        let limit = self.config.max_resume_bytes;
        if raw_text.len() > limit {
            return Err(AppError::Validation(format!(
                "rawText is {} bytes; the limit is {limit}",
                raw_text.len()
            )));
        }
        Ok(())
    }
}
