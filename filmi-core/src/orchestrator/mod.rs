//! Resolve-or-fetch orchestration.
//!
//! [`ResolutionOrchestrator::resolve`] answers from the composite store when
//! the stored record is fresh. Otherwise it fetches primary details, fans out
//! to the secondary collaborators in parallel, assembles a new record, writes
//! it back and returns it. Concurrent resolutions of the same id share one
//! run.

pub mod assembly;
mod single_flight;

use std::{future::Future, sync::Arc, time::Duration};

use chrono::Utc;
use filmi_model::{CompositeRecord, MovieId};
use tracing::{debug, info, instrument, warn};

use crate::{
    details::PrimaryDetails,
    error::{ProviderError, ResolveError, Result},
    providers::Upstreams,
    staleness::is_stale,
    store::CompositeStore,
};
use assembly::SecondaryData;
use single_flight::InFlightResolutions;

pub use assembly::derive_flags;

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Maximum age of a stored record that is still served as-is.
    pub freshness_window: Duration,
    /// Deadline for the primary fetch and each non-generative secondary.
    pub upstream_timeout: Duration,
    /// Deadline for editorial blog generation.
    pub blog_timeout: Duration,
    /// Popularity strictly above this marks a title as trending.
    pub trending_popularity: f64,
    /// Titles released fewer than this many days ago are new.
    pub new_release_days: i64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            freshness_window: Duration::from_secs(24 * 60 * 60),
            upstream_timeout: Duration::from_secs(10),
            blog_timeout: Duration::from_secs(15),
            trending_popularity: 100.0,
            new_release_days: 60,
        }
    }
}

/// A resolved record tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Served from the store without contacting any upstream.
    Cached(CompositeRecord),
    /// Assembled by this resolution (or one it joined).
    Fresh(CompositeRecord),
}

impl Resolved {
    pub fn record(&self) -> &CompositeRecord {
        match self {
            Resolved::Cached(record) | Resolved::Fresh(record) => record,
        }
    }

    pub fn into_record(self) -> CompositeRecord {
        match self {
            Resolved::Cached(record) | Resolved::Fresh(record) => record,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Resolved::Cached(_))
    }
}

struct Inner {
    upstreams: Upstreams,
    store: Arc<dyn CompositeStore>,
    settings: ResolverSettings,
}

#[derive(Clone)]
pub struct ResolutionOrchestrator {
    inner: Arc<Inner>,
    in_flight: InFlightResolutions,
}

impl std::fmt::Debug for ResolutionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionOrchestrator")
            .field("upstreams", &self.inner.upstreams)
            .field("settings", &self.inner.settings)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl ResolutionOrchestrator {
    pub fn new(
        upstreams: Upstreams,
        store: Arc<dyn CompositeStore>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                upstreams,
                store,
                settings,
            }),
            in_flight: InFlightResolutions::new(),
        }
    }

    /// Validate `raw_id` and resolve it.
    pub async fn resolve(&self, raw_id: &str) -> Result<Resolved> {
        let id = MovieId::parse(raw_id)?;
        self.resolve_id(&id).await
    }

    pub async fn resolve_id(&self, id: &MovieId) -> Result<Resolved> {
        if let Some(record) = self.inner.stored_fresh(id).await {
            return Ok(Resolved::Cached(record));
        }

        let inner = Arc::clone(&self.inner);
        self.in_flight.run(id, move |id| inner.refresh(id)).await
    }
}

impl Inner {
    /// The stored record for `id` when it is still within the freshness
    /// window. A failed read counts as a miss.
    async fn stored_fresh(&self, id: &MovieId) -> Option<CompositeRecord> {
        let cached = match self.store.get(id).await {
            Ok(cached) => cached,
            Err(err) => {
                warn!(tmdb_id = %id, error = %err, "Store read failed, treating as miss");
                None
            }
        };

        let window = chrono::Duration::from_std(self.settings.freshness_window)
            .unwrap_or(chrono::Duration::MAX);
        match cached {
            Some(record)
                if !is_stale(Some(record.last_updated), Utc::now(), window) =>
            {
                debug!(tmdb_id = %id, "Serving fresh composite record from store");
                Some(record)
            }
            Some(record) => {
                debug!(
                    tmdb_id = %id,
                    last_updated = %record.last_updated,
                    "Stored composite record is stale"
                );
                None
            }
            None => {
                debug!(tmdb_id = %id, "No stored composite record");
                None
            }
        }
    }

    /// Runs once per id at a time. A record written by a flight that ended
    /// after the caller's own store read is served as `Cached`.
    #[instrument(name = "resolver.refresh", skip(self, id), fields(tmdb_id = %id), err)]
    async fn refresh(self: Arc<Self>, id: MovieId) -> Result<Resolved> {
        if let Some(record) = self.stored_fresh(&id).await {
            return Ok(Resolved::Cached(record));
        }

        let started = std::time::Instant::now();
        let limit = self.settings.upstream_timeout;

        let details = match tokio::time::timeout(
            limit,
            self.upstreams.details.movie_details(&id),
        )
        .await
        {
            Ok(Ok(details)) if details.is_object() => details,
            Ok(Ok(_)) => {
                return Err(ResolveError::primary(
                    &id,
                    ProviderError::Parse("primary details are not an object".to_string()),
                ));
            }
            Ok(Err(err)) => return Err(ResolveError::primary(&id, err)),
            Err(_) => {
                return Err(ResolveError::primary(&id, ProviderError::Timeout(limit)));
            }
        };

        let secondary = self.fetch_secondary(&id, details.clone()).await;
        let record = assembly::assemble(id, details, secondary, Utc::now(), &self.settings);

        // The fresh record is returned even when it could not be persisted.
        if let Err(err) = self.store.upsert(&record).await {
            warn!(tmdb_id = %record.id, error = %err, "Failed to persist composite record");
        }

        info!(
            tmdb_id = %record.id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            empty_fields = ?record.empty_fields(),
            "Resolved composite record"
        );
        Ok(Resolved::Fresh(record))
    }

    async fn fetch_secondary(&self, id: &MovieId, details: PrimaryDetails) -> SecondaryData {
        let title = details.title().unwrap_or_default().to_owned();
        let limit = self.settings.upstream_timeout;

        let trailer = {
            let source = Arc::clone(&self.upstreams.trailer);
            let title = title.clone();
            async move { source.trailer(&title).await }
        };
        let playlist = {
            let source = Arc::clone(&self.upstreams.playlist);
            async move { source.playlist(&title).await }
        };
        let watch_providers = {
            let source = Arc::clone(&self.upstreams.watch_providers);
            let id = id.clone();
            async move { source.watch_providers(&id).await }
        };
        let editorial_blog = {
            let source = Arc::clone(&self.upstreams.blog);
            async move { source.editorial_blog(&details).await }
        };

        let (trailer, playlist, watch_providers, editorial_blog) = tokio::join!(
            soft_fetch(id, "trailer", limit, trailer),
            soft_fetch(id, "playlist", limit, playlist),
            soft_fetch(id, "watch_providers", limit, watch_providers),
            soft_fetch(id, "editorial_blog", self.settings.blog_timeout, editorial_blog),
        );

        SecondaryData {
            trailer,
            playlist,
            watch_providers,
            editorial_blog,
        }
    }
}

/// Run one secondary fetch on its own task under a deadline. Errors, timeouts
/// and panics all collapse to the type's empty value.
async fn soft_fetch<T, Fut>(id: &MovieId, source: &'static str, limit: Duration, fut: Fut) -> T
where
    T: Default + Send + 'static,
    Fut: Future<Output = std::result::Result<T, ProviderError>> + Send + 'static,
{
    match tokio::spawn(tokio::time::timeout(limit, fut)).await {
        Ok(Ok(Ok(value))) => value,
        Ok(Ok(Err(err))) => {
            warn!(tmdb_id = %id, source, error = %err, "Secondary fetch failed, using default");
            T::default()
        }
        Ok(Err(_)) => {
            warn!(tmdb_id = %id, source, timeout = ?limit, "Secondary fetch timed out, using default");
            T::default()
        }
        Err(err) => {
            warn!(tmdb_id = %id, source, error = %err, "Secondary fetch task aborted, using default");
            T::default()
        }
    }
}
