//! Fake collaborators and an instrumented store for resolution scenarios.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use filmi_core::{
    BlogGenerator, CompositeStore, DetailsSource, InMemoryCompositeStore,
    PlaylistSource, PrimaryDetails, ProviderError, ResolutionOrchestrator,
    ResolverSettings, StoreError, TrailerSource, Upstreams,
    WatchProviderSource,
};
use filmi_model::{
    CompositeRecord, DerivedFlags, EditorialBlog, MediaKind, MediaRef,
    MovieId, WatchProvider, WatchProviders,
};
use serde_json::json;

/// Id the fake details source reports as unknown.
pub const UNKNOWN_ID: &str = "999999";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    Fail,
    Hang,
    Panic,
    /// Details answer with a JSON `null` instead of an object.
    NonObject,
}

/// One fake upstream. A single type serves every collaborator slot; each slot
/// gets its own instance so calls are counted separately.
#[derive(Debug)]
pub struct Fake {
    behavior: Behavior,
    delay: Duration,
    calls: AtomicUsize,
}

impl Fake {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Self::with_delay(behavior, Duration::ZERO)
    }

    pub fn with_delay(behavior: Behavior, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn act<T>(
        &self,
        value: impl FnOnce() -> T,
    ) -> Result<T, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.behavior {
            Behavior::Succeed | Behavior::NonObject => Ok(value()),
            Behavior::Fail => Err(ProviderError::Api("upstream said no".into())),
            Behavior::Hang => std::future::pending().await,
            Behavior::Panic => panic!("fake upstream panicked"),
        }
    }
}

#[async_trait]
impl DetailsSource for Fake {
    async fn movie_details(
        &self,
        id: &MovieId,
    ) -> Result<PrimaryDetails, ProviderError> {
        if id.as_str() == UNKNOWN_ID {
            self.calls.fetch_add(1, Ordering::SeqCst);
            return Err(ProviderError::NotFound);
        }
        if self.behavior == Behavior::NonObject {
            return self.act(|| PrimaryDetails::new(serde_json::Value::Null)).await;
        }
        let id = id.clone();
        self.act(move || {
            PrimaryDetails::new(json!({
                "id": id.as_str(),
                "title": "Inception",
                "poster_path": "/inception.jpg",
                "release_date": "2010-07-15",
                "overview": "A thief who steals corporate secrets through dreams.",
                "popularity": 123.4,
                "vote_average": 8.4,
                "original_language": "en"
            }))
        })
        .await
    }
}

#[async_trait]
impl TrailerSource for Fake {
    async fn trailer(
        &self,
        title: &str,
    ) -> Result<Option<MediaRef>, ProviderError> {
        let title = format!("{title} Official Trailer");
        self.act(move || {
            Some(MediaRef::video(MediaKind::Trailer, "YoHD9XEInc0", title, "thumb.jpg"))
        })
        .await
    }
}

#[async_trait]
impl PlaylistSource for Fake {
    async fn playlist(
        &self,
        title: &str,
    ) -> Result<Option<MediaRef>, ProviderError> {
        let title = format!("{title} Jukebox");
        self.act(move || Some(MediaRef::playlist("PL123", title, "list.jpg")))
            .await
    }
}

#[async_trait]
impl WatchProviderSource for Fake {
    async fn watch_providers(
        &self,
        id: &MovieId,
    ) -> Result<WatchProviders, ProviderError> {
        let link = format!("https://www.themoviedb.org/movie/{id}/watch?locale=IN");
        self.act(move || WatchProviders {
            link: Some(link),
            flatrate: vec![WatchProvider {
                provider_id: 8,
                provider_name: "Netflix".into(),
                logo_path: Some("/netflix.jpg".into()),
                display_priority: Some(1),
            }],
            ..WatchProviders::default()
        })
        .await
    }
}

#[async_trait]
impl BlogGenerator for Fake {
    async fn editorial_blog(
        &self,
        details: &PrimaryDetails,
    ) -> Result<EditorialBlog, ProviderError> {
        let title = details.title().unwrap_or("Untitled").to_owned();
        self.act(move || EditorialBlog {
            synopsis: format!("{title} bends reality."),
            verdict: "Must watch.".into(),
            pros: vec!["Visuals".into()],
            ..EditorialBlog::default()
        })
        .await
    }
}

/// In-memory store that counts calls and can be told to fail.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: InMemoryCompositeStore,
    gets: AtomicUsize,
    upserts: AtomicUsize,
    pub fail_gets: bool,
    pub fail_upserts: bool,
    /// Report the first read as empty, as if another writer landed just
    /// after it.
    pub miss_first_get: bool,
}

impl CountingStore {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Place a record directly, bypassing the counters.
    pub async fn seed(&self, record: &CompositeRecord) {
        self.inner.upsert(record).await.expect("seed store");
    }

    pub async fn stored(&self, id: &str) -> Option<CompositeRecord> {
        let id = MovieId::parse(id).expect("id");
        self.inner.get(&id).await.expect("read store")
    }
}

#[async_trait]
impl CompositeStore for CountingStore {
    async fn get(
        &self,
        id: &MovieId,
    ) -> Result<Option<CompositeRecord>, StoreError> {
        let earlier_gets = self.gets.fetch_add(1, Ordering::SeqCst);
        if self.miss_first_get && earlier_gets == 0 {
            return Ok(None);
        }
        if self.fail_gets {
            return Err(StoreError::Unavailable("read refused".into()));
        }
        self.inner.get(id).await
    }

    async fn upsert(&self, record: &CompositeRecord) -> Result<(), StoreError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_upserts {
            return Err(StoreError::Unavailable("write refused".into()));
        }
        self.inner.upsert(record).await
    }
}

/// Knobs for one scenario. Everything succeeds unless told otherwise.
#[derive(Debug, Clone)]
pub struct Setup {
    pub details: Behavior,
    pub details_delay: Duration,
    pub trailer: Behavior,
    pub playlist: Behavior,
    pub watch_providers: Behavior,
    pub blog: Behavior,
    pub fail_gets: bool,
    pub fail_upserts: bool,
    pub miss_first_get: bool,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            details: Behavior::Succeed,
            details_delay: Duration::ZERO,
            trailer: Behavior::Succeed,
            playlist: Behavior::Succeed,
            watch_providers: Behavior::Succeed,
            blog: Behavior::Succeed,
            fail_gets: false,
            fail_upserts: false,
            miss_first_get: false,
        }
    }
}

impl Setup {
    pub fn build(self) -> Harness {
        let details = Fake::with_delay(self.details, self.details_delay);
        let trailer = Fake::new(self.trailer);
        let playlist = Fake::new(self.playlist);
        let watch_providers = Fake::new(self.watch_providers);
        let blog = Fake::new(self.blog);
        let store = Arc::new(CountingStore {
            fail_gets: self.fail_gets,
            fail_upserts: self.fail_upserts,
            miss_first_get: self.miss_first_get,
            ..CountingStore::default()
        });

        let upstreams = Upstreams {
            details: details.clone(),
            trailer: trailer.clone(),
            playlist: playlist.clone(),
            watch_providers: watch_providers.clone(),
            blog: blog.clone(),
        };
        let orchestrator = ResolutionOrchestrator::new(
            upstreams,
            store.clone(),
            ResolverSettings::default(),
        );

        Harness {
            details,
            trailer,
            playlist,
            watch_providers,
            blog,
            store,
            orchestrator,
        }
    }
}

#[derive(Debug)]
pub struct Harness {
    pub details: Arc<Fake>,
    pub trailer: Arc<Fake>,
    pub playlist: Arc<Fake>,
    pub watch_providers: Arc<Fake>,
    pub blog: Arc<Fake>,
    pub store: Arc<CountingStore>,
    pub orchestrator: ResolutionOrchestrator,
}

impl Harness {
    pub fn secondary_calls(&self) -> usize {
        self.trailer.calls()
            + self.playlist.calls()
            + self.watch_providers.calls()
            + self.blog.calls()
    }

    pub fn total_upstream_calls(&self) -> usize {
        self.details.calls() + self.secondary_calls()
    }
}

/// A stored record for `id` last refreshed at `last_updated`, carrying a
/// trailer and a title that no fake produces.
pub fn stored_record(id: &str, last_updated: DateTime<Utc>) -> CompositeRecord {
    CompositeRecord {
        id: MovieId::parse(id).expect("id"),
        title: Some("Old Title".into()),
        poster_path: Some("/old.jpg".into()),
        release_date: Some("2010-07-15".into()),
        details: json!({"title": "Old Title"}),
        trailer: Some(MediaRef::video(
            MediaKind::Trailer,
            "old-trailer",
            "Old Trailer",
            "old.jpg",
        )),
        playlist: None,
        editorial_blog: EditorialBlog::default(),
        watch_providers: WatchProviders::default(),
        flags: DerivedFlags::default(),
        last_updated,
    }
}
