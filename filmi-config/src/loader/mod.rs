pub mod db_url;
pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use filmi_core::providers::{
    groq::GROQ_OPENAI_BASE, tmdb::TMDB_V3_BASE, youtube::YOUTUBE_V3_BASE,
};
use tracing::debug;
use url::Url;

use crate::{
    models::{
        Config, ConfigMetadata, DatabaseConfig, GroqConfig, ResolverConfig,
        TmdbConfig, YoutubeConfig,
        sources::{EnvConfig, FileConfig},
    },
    util::{parse_duration, parse_number},
    validation::{self, ConfigWarnings},
};
use error::ConfigLoadError;

const DEFAULT_CONFIG_LOCATIONS: &[&str] = &["filmi.toml", "config/filmi.toml"];
const DEFAULT_LANGUAGE: &str = "en-IN";
const DEFAULT_REGION: &str = "IN";
const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    /// Load `.env` into the process environment, then compose the config from
    /// the environment and the TOML file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_from(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Compose the config from an already-gathered environment. Does not touch
    /// the process environment.
    pub fn load_from(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No filmi.toml detected; using environment variables and defaults",
                "Pass --config <path> or set FILMI_CONFIG",
            );
        }

        let config = compose_config(file_config.unwrap_or_default(), env, config_path)?;
        warnings.extend(validation::credential_warnings(&config));

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose_config(
    file: FileConfig,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<Config, ConfigLoadError> {
    let FileConfig {
        database: file_database,
        tmdb: file_tmdb,
        youtube: file_youtube,
        groq: file_groq,
        resolver: file_resolver,
    } = file;

    let database = DatabaseConfig {
        url: db_url::resolve_database_url(&env, &file_database)?,
    };

    let tmdb = TmdbConfig {
        api_key: env.tmdb_api_key.or(file_tmdb.api_key),
        language: env
            .tmdb_language
            .or(file_tmdb.language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        region: env
            .tmdb_region
            .or(file_tmdb.region)
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        base_url: parse_base_url(
            "tmdb.base_url",
            file_tmdb.base_url.as_deref().unwrap_or(TMDB_V3_BASE),
        )?,
    };

    let youtube = YoutubeConfig {
        api_key: env.youtube_api_key.or(file_youtube.api_key),
        base_url: parse_base_url(
            "youtube.base_url",
            file_youtube.base_url.as_deref().unwrap_or(YOUTUBE_V3_BASE),
        )?,
    };

    let groq = GroqConfig {
        api_key: env.groq_api_key.or(file_groq.api_key),
        model: env
            .groq_model
            .or(file_groq.model)
            .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
        base_url: parse_base_url(
            "groq.base_url",
            file_groq.base_url.as_deref().unwrap_or(GROQ_OPENAI_BASE),
        )?,
    };

    let defaults = ResolverConfig::default();
    let resolver = ResolverConfig {
        freshness_window: duration_setting(
            "resolver.freshness_window",
            env.freshness_window.or(file_resolver.freshness_window),
            defaults.freshness_window,
        )?,
        upstream_timeout: duration_setting(
            "resolver.upstream_timeout",
            env.upstream_timeout.or(file_resolver.upstream_timeout),
            defaults.upstream_timeout,
        )?,
        blog_timeout: duration_setting(
            "resolver.blog_timeout",
            env.blog_timeout.or(file_resolver.blog_timeout),
            defaults.blog_timeout,
        )?,
        trending_popularity: match env.trending_popularity {
            Some(raw) => parse_number("resolver.trending_popularity", &raw)?,
            None => file_resolver
                .trending_popularity
                .unwrap_or(defaults.trending_popularity),
        },
        new_release_days: match env.new_release_days {
            Some(raw) => parse_number("resolver.new_release_days", &raw)?,
            None => file_resolver
                .new_release_days
                .unwrap_or(defaults.new_release_days),
        },
    };

    Ok(Config {
        database,
        tmdb,
        youtube,
        groq,
        resolver,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    })
}

fn duration_setting(
    key: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    raw.map_or(Ok(default), |raw| parse_duration(key, &raw))
}

fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigLoadError> {
    Url::parse(raw.trim()).map_err(|source| ConfigLoadError::InvalidBaseUrl {
        key,
        value: raw.to_string(),
        source,
    })
}
