use filmi_model::{ModelError, MovieId};
use thiserror::Error;

/// Failure of an upstream collaborator (TMDB, YouTube, Groq).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("{0} is not configured")]
    Unconfigured(&'static str),
}

/// Failure of the composite record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "database")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt record for {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Resolution-level failure surfaced to callers of
/// [`ResolutionOrchestrator::resolve`](crate::orchestrator::ResolutionOrchestrator::resolve).
///
/// `Clone` because every caller joined on one in-flight resolution receives
/// the same outcome.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("Invalid movie id: {0}")]
    InvalidId(#[from] ModelError),

    #[error("Movie {id} not found")]
    NotFound { id: MovieId },

    #[error("Primary details unavailable for {id}: {reason}")]
    PrimaryUnavailable { id: MovieId, reason: String },

    #[error("Resolution for {id} was interrupted: {reason}")]
    Interrupted { id: MovieId, reason: String },
}

impl ResolveError {
    pub(crate) fn primary(id: &MovieId, err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound => ResolveError::NotFound { id: id.clone() },
            other => ResolveError::PrimaryUnavailable {
                id: id.clone(),
                reason: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
