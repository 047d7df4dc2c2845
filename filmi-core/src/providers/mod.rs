//! Upstream collaborators.
//!
//! Each capability is a narrow async trait so the orchestrator can be driven
//! by the real HTTP clients in production and by in-process fakes in tests.

pub mod groq;
pub mod tmdb;
pub mod youtube;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use filmi_model::{EditorialBlog, MediaRef, MovieId, WatchProviders};

use crate::{details::PrimaryDetails, error::ProviderError};

pub use groq::GroqBlogGenerator;
pub use tmdb::TmdbClient;
pub use youtube::YoutubeClient;

/// Official metadata lookup. The only collaborator whose failure aborts a
/// resolution.
#[async_trait]
pub trait DetailsSource: Send + Sync {
    async fn movie_details(
        &self,
        id: &MovieId,
    ) -> Result<PrimaryDetails, ProviderError>;
}

#[async_trait]
pub trait TrailerSource: Send + Sync {
    async fn trailer(
        &self,
        title: &str,
    ) -> Result<Option<MediaRef>, ProviderError>;
}

/// Song playlist lookup. Implementations may fall back to a single jukebox
/// video; callers do not distinguish the two.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    async fn playlist(
        &self,
        title: &str,
    ) -> Result<Option<MediaRef>, ProviderError>;
}

#[async_trait]
pub trait WatchProviderSource: Send + Sync {
    async fn watch_providers(
        &self,
        id: &MovieId,
    ) -> Result<WatchProviders, ProviderError>;
}

#[async_trait]
pub trait BlogGenerator: Send + Sync {
    async fn editorial_blog(
        &self,
        details: &PrimaryDetails,
    ) -> Result<EditorialBlog, ProviderError>;
}

/// The full set of collaborators one orchestrator fans out to.
#[derive(Clone)]
pub struct Upstreams {
    pub details: Arc<dyn DetailsSource>,
    pub trailer: Arc<dyn TrailerSource>,
    pub playlist: Arc<dyn PlaylistSource>,
    pub watch_providers: Arc<dyn WatchProviderSource>,
    pub blog: Arc<dyn BlogGenerator>,
}

impl fmt::Debug for Upstreams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upstreams")
            .field("details", &"dyn DetailsSource")
            .field("trailer", &"dyn TrailerSource")
            .field("playlist", &"dyn PlaylistSource")
            .field("watch_providers", &"dyn WatchProviderSource")
            .field("blog", &"dyn BlogGenerator")
            .finish()
    }
}

impl Upstreams {
    /// Wire the production HTTP clients together.
    pub fn from_clients(
        tmdb: Arc<TmdbClient>,
        youtube: Arc<YoutubeClient>,
        groq: Arc<GroqBlogGenerator>,
    ) -> Self {
        Self {
            details: tmdb.clone(),
            trailer: youtube.clone(),
            playlist: youtube,
            watch_providers: tmdb,
            blog: groq,
        }
    }
}

/// Maps a non-success HTTP status onto the provider error taxonomy.
pub(crate) fn status_error(status: reqwest::StatusCode, message: String) -> ProviderError {
    match status.as_u16() {
        401 => ProviderError::InvalidApiKey,
        404 => ProviderError::NotFound,
        429 => ProviderError::RateLimited,
        _ => ProviderError::Api(message),
    }
}
