//! Non-fatal findings produced while loading configuration.

use crate::models::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

/// Flag credentials that are missing. None of these stop a load: a missing
/// key only surfaces when the matching collaborator is first called.
pub fn credential_warnings(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.tmdb.api_key.is_none() {
        warnings.push_with_hint(
            "TMDB_API_KEY is not set; every uncached resolution will fail",
            "Create a key at https://www.themoviedb.org/settings/api",
        );
    }
    if config.youtube.api_key.is_none() {
        warnings.push("YOUTUBE_API_KEY is not set; trailers and playlists will be empty");
    }
    if config.groq.api_key.is_none() {
        warnings.push("GROQ_API_KEY is not set; editorial blogs will be empty");
    }

    warnings
}
