pub mod sources;

use std::{fmt, path::PathBuf, time::Duration};

use filmi_core::{
    ResolverSettings,
    providers::{
        groq::GroqSettings, tmdb::TmdbSettings, youtube::YoutubeSettings,
    },
};
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub tmdb: TmdbConfig,
    pub youtube: YoutubeConfig,
    pub groq: GroqConfig,
    pub resolver: ResolverConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            freshness_window: self.resolver.freshness_window,
            upstream_timeout: self.resolver.upstream_timeout,
            blog_timeout: self.resolver.blog_timeout,
            trending_popularity: self.resolver.trending_popularity,
            new_release_days: self.resolver.new_release_days,
        }
    }

    pub fn tmdb_settings(&self) -> TmdbSettings {
        TmdbSettings {
            api_key: self.tmdb.api_key.clone(),
            language: self.tmdb.language.clone(),
            region: self.tmdb.region.clone(),
            base_url: base_url(&self.tmdb.base_url),
            request_timeout: self.resolver.upstream_timeout,
        }
    }

    pub fn youtube_settings(&self) -> YoutubeSettings {
        YoutubeSettings {
            api_key: self.youtube.api_key.clone(),
            base_url: base_url(&self.youtube.base_url),
            request_timeout: self.resolver.upstream_timeout,
        }
    }

    pub fn groq_settings(&self) -> GroqSettings {
        GroqSettings {
            api_key: self.groq.api_key.clone(),
            model: self.groq.model.clone(),
            base_url: base_url(&self.groq.base_url),
            request_timeout: self.resolver.blog_timeout,
            ..GroqSettings::default()
        }
    }
}

/// Clients append paths with a leading slash.
fn base_url(url: &Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

fn redacted(key: &Option<String>) -> Option<&'static str> {
    key.as_ref().map(|_| "<redacted>")
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = self.url.as_deref().map(|raw| match Url::parse(raw) {
            Ok(mut parsed) if parsed.password().is_some() => {
                let _ = parsed.set_password(Some("***"));
                parsed.to_string()
            }
            _ => raw.to_string(),
        });
        f.debug_struct("DatabaseConfig").field("url", &url).finish()
    }
}

#[derive(Clone)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub language: String,
    pub region: String,
    pub base_url: Url,
}

impl fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("language", &self.language)
            .field("region", &self.region)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[derive(Clone)]
pub struct YoutubeConfig {
    pub api_key: Option<String>,
    pub base_url: Url,
}

impl fmt::Debug for YoutubeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YoutubeConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[derive(Clone)]
pub struct GroqConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Url,
}

impl fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub freshness_window: Duration,
    pub upstream_timeout: Duration,
    pub blog_timeout: Duration,
    pub trending_popularity: f64,
    pub new_release_days: i64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let defaults = ResolverSettings::default();
        Self {
            freshness_window: defaults.freshness_window,
            upstream_timeout: defaults.upstream_timeout,
            blog_timeout: defaults.blog_timeout,
            trending_popularity: defaults.trending_popularity,
            new_release_days: defaults.new_release_days,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
