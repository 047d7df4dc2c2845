use serde::{Deserialize, Serialize};

/// AI-written editorial review of a movie.
///
/// Every field defaults to empty and empty fields are skipped on
/// serialization, so a blank blog renders as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorialBlog {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub synopsis: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub performance: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pros: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cons: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub verdict: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub audience: String,
}

impl EditorialBlog {
    pub fn is_empty(&self) -> bool {
        self.synopsis.is_empty()
            && self.performance.is_empty()
            && self.pros.is_empty()
            && self.cons.is_empty()
            && self.verdict.is_empty()
            && self.audience.is_empty()
    }
}
