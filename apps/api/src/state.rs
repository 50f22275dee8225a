use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::documents::extract::TextExtractor;
use crate::errors::AppError;
use crate::screening::scorer::MatchScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when `DATABASE_URL` is unset; screening still works, history does not.
    pub db: Option<PgPool>,
    pub config: Config,
    /// Pluggable match scorer. Default: TfidfMatchScorer over the loaded taxonomy.
    pub scorer: Arc<dyn MatchScorer>,
    /// Pluggable upload-to-text extractor. Default: DocumentExtractor (pdf, txt).
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    /// The pool, or `PersistenceDisabled` for routes that cannot work without one.
    pub fn require_db(&self) -> Result<&PgPool, AppError> {
        self.db.as_ref().ok_or(AppError::PersistenceDisabled)
    }
}
