use async_trait::async_trait;
use dashmap::DashMap;
use filmi_model::{CompositeRecord, MovieId};

use super::CompositeStore;
use crate::error::StoreError;

/// Process-local store. Records live as long as the process does.
#[derive(Debug, Default)]
pub struct InMemoryCompositeStore {
    records: DashMap<MovieId, CompositeRecord>,
}

impl InMemoryCompositeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CompositeStore for InMemoryCompositeStore {
    async fn get(
        &self,
        id: &MovieId,
    ) -> Result<Option<CompositeRecord>, StoreError> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, record: &CompositeRecord) -> Result<(), StoreError> {
        self.records.insert(record.id.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use filmi_model::{
        DerivedFlags, EditorialBlog, MediaKind, MediaRef, WatchProviders,
    };
    use serde_json::json;

    fn record(trailer: Option<MediaRef>) -> CompositeRecord {
        CompositeRecord {
            id: MovieId::parse("27205").expect("id"),
            title: Some("Inception".into()),
            poster_path: Some("/poster.jpg".into()),
            release_date: Some("2010-07-15".into()),
            details: json!({"title": "Inception"}),
            trailer,
            playlist: None,
            editorial_blog: EditorialBlog::default(),
            watch_providers: WatchProviders::default(),
            flags: DerivedFlags::default(),
            last_updated: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_twice_matches_upsert_once() {
        let store = InMemoryCompositeStore::new();
        let record = record(None);

        store.upsert(&record).await.expect("first upsert");
        let after_once = store.get(&record.id).await.expect("get");
        store.upsert(&record).await.expect("second upsert");
        let after_twice = store.get(&record.id).await.expect("get");

        assert_eq!(store.len(), 1);
        assert_eq!(after_once, after_twice);
    }

    #[tokio::test]
    async fn upsert_replaces_whole_record() {
        let store = InMemoryCompositeStore::new();
        let old = record(Some(MediaRef::video(
            MediaKind::Trailer,
            "old",
            "Old trailer",
            "old.jpg",
        )));
        store.upsert(&old).await.expect("upsert old");

        let new = record(None);
        store.upsert(&new).await.expect("upsert new");

        let stored = store.get(&new.id).await.expect("get").expect("present");
        assert_eq!(stored.trailer, None);
        assert_eq!(stored, new);
    }

    #[tokio::test]
    async fn missing_id_reads_as_absent() {
        let store = InMemoryCompositeStore::new();
        let id = MovieId::parse("999999").expect("id");
        assert!(store.get(&id).await.expect("get").is_none());
    }
}
