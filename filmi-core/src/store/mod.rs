//! Composite record persistence.
//!
//! The orchestrator only ever reads a whole record by id or replaces a whole
//! record by id; there is no partial update.

pub mod memory;
#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod postgres;

use async_trait::async_trait;
use filmi_model::{CompositeRecord, MovieId};

use crate::error::StoreError;

pub use memory::InMemoryCompositeStore;
#[cfg(feature = "database")]
pub use postgres::PostgresCompositeStore;

#[async_trait]
pub trait CompositeStore: Send + Sync {
    async fn get(
        &self,
        id: &MovieId,
    ) -> Result<Option<CompositeRecord>, StoreError>;

    /// Insert or replace the record keyed by `record.id`. Idempotent.
    async fn upsert(&self, record: &CompositeRecord) -> Result<(), StoreError>;
}
