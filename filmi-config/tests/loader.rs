use std::{io::Write, time::Duration};

use filmi_config::{ConfigLoadError, ConfigLoader, models::sources::EnvConfig};
use tempfile::NamedTempFile;

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn env(pairs: &[(&str, &str)]) -> EnvConfig {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvConfig::from_lookup(move |name| {
        owned
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    })
}

#[test]
fn defaults_apply_when_nothing_is_configured() {
    let file = toml_file("");
    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .load_from(EnvConfig::default())
        .expect("load");
    let config = load.config;

    assert_eq!(config.tmdb.language, "en-IN");
    assert_eq!(config.tmdb.region, "IN");
    assert_eq!(config.groq.model, "llama3-70b-8192");
    assert_eq!(config.resolver.freshness_window, Duration::from_secs(86_400));
    assert_eq!(config.resolver.upstream_timeout, Duration::from_secs(10));
    assert_eq!(config.resolver.blog_timeout, Duration::from_secs(15));
    assert_eq!(config.resolver.trending_popularity, 100.0);
    assert_eq!(config.resolver.new_release_days, 60);
    assert!(config.database.url.is_none());
    assert_eq!(config.metadata.config_path.as_deref(), Some(file.path()));

    let settings = config.tmdb_settings();
    assert_eq!(settings.base_url, "https://api.themoviedb.org/3");
    assert!(settings.api_key.is_none());
}

#[test]
fn missing_keys_are_warnings_not_errors() {
    let file = toml_file("");
    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .load_from(EnvConfig::default())
        .expect("load");

    let messages: Vec<&str> = load
        .warnings
        .items
        .iter()
        .map(|w| w.message.as_str())
        .collect();
    assert!(messages.iter().any(|m| m.contains("TMDB_API_KEY")));
    assert!(messages.iter().any(|m| m.contains("YOUTUBE_API_KEY")));
    assert!(messages.iter().any(|m| m.contains("GROQ_API_KEY")));
}

#[test]
fn file_values_are_read() {
    let file = toml_file(
        r#"
        [database]
        url = "postgres://filmi@localhost/filmi"

        [tmdb]
        api_key = "file-tmdb"
        language = "hi-IN"

        [groq]
        model = "llama-3.1-8b-instant"

        [resolver]
        freshness_window = "6h"
        blog_timeout = "30s"
        trending_popularity = 250.0
        new_release_days = 30
        "#,
    );
    let config = ConfigLoader::new()
        .with_config_path(file.path())
        .load_from(EnvConfig::default())
        .expect("load")
        .config;

    assert_eq!(
        config.database.url.as_deref(),
        Some("postgres://filmi@localhost/filmi")
    );
    assert_eq!(config.tmdb.api_key.as_deref(), Some("file-tmdb"));
    assert_eq!(config.tmdb.language, "hi-IN");
    assert_eq!(config.groq.model, "llama-3.1-8b-instant");

    let resolver = config.resolver_settings();
    assert_eq!(resolver.freshness_window, Duration::from_secs(6 * 3600));
    assert_eq!(resolver.blog_timeout, Duration::from_secs(30));
    assert_eq!(resolver.trending_popularity, 250.0);
    assert_eq!(resolver.new_release_days, 30);
    assert_eq!(config.groq_settings().request_timeout, Duration::from_secs(30));
}

#[test]
fn environment_wins_over_file() {
    let file = toml_file(
        r#"
        [tmdb]
        api_key = "file-tmdb"
        region = "US"

        [resolver]
        freshness_window = "6h"
        "#,
    );
    let config = ConfigLoader::new()
        .with_config_path(file.path())
        .load_from(env(&[
            ("TMDB_API_KEY", "env-tmdb"),
            ("FILMI_FRESHNESS_WINDOW", "2h"),
            ("FILMI_UPSTREAM_TIMEOUT", "3s"),
        ]))
        .expect("load")
        .config;

    assert_eq!(config.tmdb.api_key.as_deref(), Some("env-tmdb"));
    assert_eq!(config.tmdb.region, "US");
    assert_eq!(config.resolver.freshness_window, Duration::from_secs(7200));
    assert_eq!(config.tmdb_settings().request_timeout, Duration::from_secs(3));
    assert_eq!(config.youtube_settings().request_timeout, Duration::from_secs(3));
}

#[test]
fn invalid_duration_is_a_load_error() {
    let file = toml_file("");
    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .load_from(env(&[("FILMI_BLOG_TIMEOUT", "whenever")]))
        .expect_err("invalid duration");

    assert!(matches!(
        err,
        ConfigLoadError::InvalidDuration {
            key: "resolver.blog_timeout",
            ..
        }
    ));
}

#[test]
fn invalid_number_is_a_load_error() {
    let file = toml_file("");
    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .load_from(env(&[("FILMI_NEW_RELEASE_DAYS", "sixty")]))
        .expect_err("invalid number");

    assert!(matches!(err, ConfigLoadError::InvalidNumber { .. }));
}

#[test]
fn invalid_base_url_is_a_load_error() {
    let file = toml_file(
        r#"
        [youtube]
        base_url = "not a url"
        "#,
    );
    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .load_from(EnvConfig::default())
        .expect_err("invalid url");

    assert!(matches!(
        err,
        ConfigLoadError::InvalidBaseUrl {
            key: "youtube.base_url",
            ..
        }
    ));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .load_from(EnvConfig::default())
        .expect_err("missing file");

    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn unknown_sections_are_rejected() {
    let file = toml_file(
        r#"
        [redis]
        url = "redis://localhost"
        "#,
    );
    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .load_from(EnvConfig::default())
        .expect_err("unknown section");

    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}
