//! Opaque primary-details payload.
//!
//! The metadata provider owns this schema. The core only reads the handful
//! of fields its own logic needs, and every accessor falls back to a default
//! instead of failing when a field is missing or has an unexpected type.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::ProviderError;

const MAX_CAST_NAMES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryDetails(Value);

impl PrimaryDetails {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Accept a provider payload, rejecting anything that is not a JSON
    /// object. A `null` or scalar body means the provider returned nothing.
    pub fn from_payload(raw: Value) -> Result<Self, ProviderError> {
        if raw.is_object() {
            Ok(Self(raw))
        } else {
            Err(ProviderError::Parse(format!(
                "details payload is not an object: {}",
                json_kind(&raw)
            )))
        }
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn into_raw(self) -> Value {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn number_field(&self, key: &str) -> f64 {
        self.0.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.str_field("poster_path")
    }

    pub fn release_date(&self) -> Option<&str> {
        self.str_field("release_date")
    }

    /// Release date parsed as `YYYY-MM-DD`; unparseable dates are treated as
    /// unknown.
    pub fn parsed_release_date(&self) -> Option<NaiveDate> {
        self.release_date()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    }

    pub fn popularity(&self) -> f64 {
        self.number_field("popularity")
    }

    pub fn rating(&self) -> f64 {
        self.number_field("vote_average")
    }

    pub fn overview(&self) -> Option<&str> {
        self.str_field("overview")
    }

    pub fn original_language(&self) -> Option<&str> {
        self.str_field("original_language")
    }

    /// Top-billed cast names from an appended `credits` block.
    pub fn cast_names(&self) -> Vec<&str> {
        self.0
            .pointer("/credits/cast")
            .and_then(Value::as_array)
            .map(|cast| {
                cast.iter()
                    .filter_map(|member| member.get("name")?.as_str())
                    .take(MAX_CAST_NAMES)
                    .collect()
            })
            .unwrap_or_default()
    }
}


fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
