use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::util::non_empty_var;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub tmdb: FileTmdbConfig,
    #[serde(default)]
    pub youtube: FileYoutubeConfig,
    #[serde(default)]
    pub groq: FileGroqConfig,
    #[serde(default)]
    pub resolver: FileResolverConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileTmdbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileYoutubeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileGroqConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Durations are humantime strings (`"24h"`, `"10s"`).
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileResolverConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness_window: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trending_popularity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_release_days: Option<i64>,
}

/// Environment-derived configuration values. Numeric and duration values are
/// kept raw so the loader can report them precisely when they do not parse.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub database_url: Option<String>,
    pub database_url_file: Option<PathBuf>,
    pub tmdb_api_key: Option<String>,
    pub tmdb_language: Option<String>,
    pub tmdb_region: Option<String>,
    pub youtube_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub groq_model: Option<String>,
    pub freshness_window: Option<String>,
    pub upstream_timeout: Option<String>,
    pub blog_timeout: Option<String>,
    pub trending_popularity: Option<String>,
    pub new_release_days: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| non_empty_var(&lookup, name);
        Self {
            config_path: var("FILMI_CONFIG").map(PathBuf::from),
            database_url: var("DATABASE_URL"),
            database_url_file: var("DATABASE_URL_FILE").map(PathBuf::from),
            tmdb_api_key: var("TMDB_API_KEY"),
            tmdb_language: var("TMDB_LANG"),
            tmdb_region: var("TMDB_REGION"),
            youtube_api_key: var("YOUTUBE_API_KEY"),
            groq_api_key: var("GROQ_API_KEY"),
            groq_model: var("GROQ_MODEL"),
            freshness_window: var("FILMI_FRESHNESS_WINDOW"),
            upstream_timeout: var("FILMI_UPSTREAM_TIMEOUT"),
            blog_timeout: var("FILMI_BLOG_TIMEOUT"),
            trending_popularity: var("FILMI_TRENDING_POPULARITY"),
            new_release_days: var("FILMI_NEW_RELEASE_DAYS"),
        }
    }
}
