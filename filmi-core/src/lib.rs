//! # Filmi Core
//!
//! Resolves a TMDB movie id into a [`CompositeRecord`] that merges official
//! metadata with a trailer, a song playlist, streaming availability and a
//! generated editorial blog.
//!
//! ## Overview
//!
//! - **Orchestration**: [`ResolutionOrchestrator`] serves fresh records from
//!   the store and re-resolves stale or missing ones, sharing one run between
//!   concurrent callers for the same id.
//! - **Collaborators**: narrow async traits in [`providers`] with production
//!   clients for TMDB, YouTube and Groq.
//! - **Persistence**: the [`CompositeStore`] trait with in-memory and
//!   PostgreSQL backends.
//!
//! ## Feature Flags
//!
//! - `database`: enables the PostgreSQL store and embedded migrations.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use filmi_core::{
//!     GroqBlogGenerator, InMemoryCompositeStore, ResolutionOrchestrator,
//!     ResolverSettings, TmdbClient, Upstreams, YoutubeClient,
//!     providers::{groq::GroqSettings, tmdb::TmdbSettings, youtube::YoutubeSettings},
//! };
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let upstreams = Upstreams::from_clients(
//!         Arc::new(TmdbClient::new(TmdbSettings::default())?),
//!         Arc::new(YoutubeClient::new(YoutubeSettings::default())?),
//!         Arc::new(GroqBlogGenerator::new(GroqSettings::default())?),
//!     );
//!     let orchestrator = ResolutionOrchestrator::new(
//!         upstreams,
//!         Arc::new(InMemoryCompositeStore::new()),
//!         ResolverSettings::default(),
//!     );
//!
//!     let resolved = orchestrator.resolve("27205").await?;
//!     println!("{:?}", resolved.record().title);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod details;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod staleness;
pub mod store;

/// Embedded schema migrations for the PostgreSQL store.
#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use details::PrimaryDetails;
pub use error::{ProviderError, ResolveError, Result, StoreError};
pub use orchestrator::{ResolutionOrchestrator, Resolved, ResolverSettings};
pub use providers::{
    BlogGenerator, DetailsSource, GroqBlogGenerator, PlaylistSource, TmdbClient,
    TrailerSource, Upstreams, WatchProviderSource, YoutubeClient,
};
pub use staleness::is_stale;
pub use store::CompositeStore;
pub use store::InMemoryCompositeStore;
#[cfg(feature = "database")]
pub use store::PostgresCompositeStore;

pub use filmi_model::{CompositeRecord, MovieId};
