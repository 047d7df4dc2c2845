use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use filmi_model::{
    CompositeRecord, DerivedFlags, EditorialBlog, MediaRef, MovieId,
    WatchProviders,
};
use serde_json::Value;
use sqlx::{PgPool, Row, postgres::PgPoolOptions, postgres::PgRow, types::Json};
use tracing::{debug, info};

use super::CompositeStore;
use crate::error::StoreError;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PostgresCompositeStore {
    pool: PgPool,
}

impl PostgresCompositeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL composite store");
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        crate::MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<CompositeRecord, StoreError> {
        let raw_id: String = row.try_get("tmdb_id")?;
        let id = MovieId::parse(&raw_id).map_err(|e| StoreError::Corrupt {
            id: raw_id.clone(),
            reason: e.to_string(),
        })?;

        let trailer: Option<Json<MediaRef>> = row.try_get("trailer")?;
        let playlist: Option<Json<MediaRef>> = row.try_get("playlist")?;
        let Json(editorial_blog): Json<EditorialBlog> =
            row.try_get("editorial_blog")?;
        let Json(watch_providers): Json<WatchProviders> =
            row.try_get("watch_providers")?;
        let Json(details): Json<Value> = row.try_get("details")?;
        let last_updated: DateTime<Utc> = row.try_get("last_updated")?;

        Ok(CompositeRecord {
            id,
            title: row.try_get("title")?,
            poster_path: row.try_get("poster_path")?,
            release_date: row.try_get("release_date")?,
            details,
            trailer: trailer.map(|Json(value)| value),
            playlist: playlist.map(|Json(value)| value),
            editorial_blog,
            watch_providers,
            flags: DerivedFlags {
                is_trending: row.try_get("is_trending")?,
                is_new: row.try_get("is_new")?,
                popularity: row.try_get("popularity")?,
                rating_score: row.try_get("rating_score")?,
            },
            last_updated,
        })
    }
}

#[async_trait]
impl CompositeStore for PostgresCompositeStore {
    async fn get(
        &self,
        id: &MovieId,
    ) -> Result<Option<CompositeRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                tmdb_id,
                title,
                poster_path,
                release_date,
                details,
                trailer,
                playlist,
                editorial_blog,
                watch_providers,
                is_trending,
                is_new,
                popularity,
                rating_score,
                last_updated
            FROM composite_records
            WHERE tmdb_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn upsert(&self, record: &CompositeRecord) -> Result<(), StoreError> {
        debug!(tmdb_id = %record.id, "Upserting composite record");

        sqlx::query(
            r#"
            INSERT INTO composite_records (
                tmdb_id,
                title,
                poster_path,
                release_date,
                details,
                trailer,
                playlist,
                editorial_blog,
                watch_providers,
                is_trending,
                is_new,
                popularity,
                rating_score,
                last_updated
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (tmdb_id) DO UPDATE SET
                title = EXCLUDED.title,
                poster_path = EXCLUDED.poster_path,
                release_date = EXCLUDED.release_date,
                details = EXCLUDED.details,
                trailer = EXCLUDED.trailer,
                playlist = EXCLUDED.playlist,
                editorial_blog = EXCLUDED.editorial_blog,
                watch_providers = EXCLUDED.watch_providers,
                is_trending = EXCLUDED.is_trending,
                is_new = EXCLUDED.is_new,
                popularity = EXCLUDED.popularity,
                rating_score = EXCLUDED.rating_score,
                last_updated = EXCLUDED.last_updated,
                updated_at = NOW()
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.title.as_deref())
        .bind(record.poster_path.as_deref())
        .bind(record.release_date.as_deref())
        .bind(Json(&record.details))
        .bind(record.trailer.as_ref().map(Json))
        .bind(record.playlist.as_ref().map(Json))
        .bind(Json(&record.editorial_blog))
        .bind(Json(&record.watch_providers))
        .bind(record.flags.is_trending)
        .bind(record.flags.is_new)
        .bind(record.flags.popularity)
        .bind(record.flags.rating_score)
        .bind(record.last_updated)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
