//! Core data model definitions shared across Filmi crates.
#![allow(missing_docs)]

pub mod blog;
pub mod error;
pub mod flags;
pub mod ids;
pub mod media_ref;
pub mod record;
pub mod watch_providers;

pub use blog::EditorialBlog;
pub use error::{ModelError, Result as ModelResult};
pub use flags::DerivedFlags;
pub use ids::MovieId;
pub use media_ref::{MediaKind, MediaRef};
pub use record::CompositeRecord;
pub use watch_providers::{WatchProvider, WatchProviders};
