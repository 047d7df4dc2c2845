use std::{fs::read_to_string, path::Path};

use url::Url;

use crate::{
    ConfigLoadError,
    models::sources::{EnvConfig, FileDatabaseConfig},
};

/// Pick the effective PostgreSQL URL: `DATABASE_URL`, then the contents of
/// `DATABASE_URL_FILE`, then `database.url` from the file. Absent everywhere
/// is not an error; only the postgres-backed store needs one.
pub fn resolve_database_url(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    let candidate = if let Some(url) = env.database_url.clone() {
        Some(url)
    } else if let Some(path) = env.database_url_file.as_ref() {
        read_secret_file(path)?
    } else {
        file_database
            .url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    candidate.map(|raw| validate_database_url(&raw)).transpose()
}

fn validate_database_url(raw: &str) -> Result<String, ConfigLoadError> {
    let parsed = Url::parse(raw)
        .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
    match parsed.scheme() {
        "postgres" | "postgresql" => Ok(raw.to_string()),
        other => Err(ConfigLoadError::UnsupportedDatabaseScheme {
            scheme: other.to_string(),
        }),
    }
}

fn read_secret_file(path: &Path) -> Result<Option<String>, ConfigLoadError> {
    let contents =
        read_to_string(path).map_err(|source| ConfigLoadError::SecretFileIo {
            path: path.to_path_buf(),
            source,
        })?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
