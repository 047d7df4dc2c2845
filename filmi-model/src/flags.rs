use serde::{Deserialize, Serialize};

/// Display hints computed from primary details at assembly time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivedFlags {
    pub is_trending: bool,
    pub is_new: bool,
    pub popularity: f64,
    pub rating_score: f64,
}
