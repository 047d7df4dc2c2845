use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    blog::EditorialBlog, flags::DerivedFlags, ids::MovieId, media_ref::MediaRef,
    watch_providers::WatchProviders,
};

/// One fully-assembled resolution of a movie across every upstream source.
///
/// This is both the unit of caching and the unit of response. Optional
/// sub-fields are always present in the struct; missing upstream data shows
/// up as `None` or an empty value, never as a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRecord {
    pub id: MovieId,
    /// Denormalized from `details` for display without re-reading the blob.
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    /// Raw primary metadata payload; schema owned by the metadata provider.
    pub details: Value,
    pub trailer: Option<MediaRef>,
    pub playlist: Option<MediaRef>,
    #[serde(default)]
    pub editorial_blog: EditorialBlog,
    #[serde(default)]
    pub watch_providers: WatchProviders,
    #[serde(default)]
    pub flags: DerivedFlags,
    pub last_updated: DateTime<Utc>,
}

impl CompositeRecord {
    /// Names of the optional sub-fields that came back empty.
    pub fn empty_fields(&self) -> Vec<&'static str> {
        let mut empty = Vec::new();
        if self.trailer.is_none() {
            empty.push("trailer");
        }
        if self.playlist.is_none() {
            empty.push("playlist");
        }
        if self.editorial_blog.is_empty() {
            empty.push("editorial_blog");
        }
        if self.watch_providers.is_empty() {
            empty.push("watch_providers");
        }
        empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_optional_fields_serialize_as_null_or_empty_object() {
        let record = CompositeRecord {
            id: MovieId::parse("27205").expect("id"),
            title: Some("Inception".into()),
            poster_path: None,
            release_date: Some("2010-07-15".into()),
            details: json!({"id": 27205, "title": "Inception"}),
            trailer: None,
            playlist: None,
            editorial_blog: EditorialBlog::default(),
            watch_providers: WatchProviders::default(),
            flags: DerivedFlags::default(),
            last_updated: Utc::now(),
        };

        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["trailer"], Value::Null);
        assert_eq!(value["editorial_blog"], json!({}));
        assert_eq!(value["watch_providers"], json!({}));
        assert_eq!(
            record.empty_fields(),
            vec!["trailer", "playlist", "editorial_blog", "watch_providers"]
        );
    }
}
