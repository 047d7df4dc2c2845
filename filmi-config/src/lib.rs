//! Configuration loading for Filmi.
//!
//! A TOML file, the process environment and an optional `.env` file are
//! merged into a typed [`Config`]. Environment values win over the file and
//! the file wins over built-in defaults. The [`Config`] then hands out the
//! settings structs `filmi-core` consumes.

pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::{
    Config, ConfigMetadata, DatabaseConfig, GroqConfig, ResolverConfig,
    TmdbConfig, YoutubeConfig,
};
pub use validation::{ConfigWarning, ConfigWarnings};
