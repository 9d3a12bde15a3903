use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreResult;

/// A persisted record together with the id the store assigned on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stored<R> {
    pub id: Uuid,
    pub record: R,
}

impl<R> Stored<R> {
    pub fn new(id: Uuid, record: R) -> Self {
        Self { id, record }
    }
}

/// One logical datastore.
///
/// Object-safe so engines can hold `Arc<dyn RecordStore<R>>` and tests can
/// swap in [`MemoryStore`](crate::memory::MemoryStore). `query` scans with a
/// caller-supplied predicate; the engines only ever filter on ids and dates,
/// so a full scan is the contract, not an optimization target.
#[async_trait]
pub trait RecordStore<R>: Send + Sync
where
    R: Clone + Send + Sync + 'static,
{
    /// Persist a record and return its generated id.
    async fn insert(&self, record: R) -> StoreResult<Uuid>;

    /// Fetch one record by id, `None` if absent.
    async fn get(&self, id: Uuid) -> StoreResult<Option<Stored<R>>>;

    /// Replace one record by id. Fails with `StoreError::NotFound` if absent.
    async fn update(&self, id: Uuid, record: R) -> StoreResult<()>;

    /// Delete one record by id. Fails with `StoreError::NotFound` if absent.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// All records in insertion-stable order.
    async fn all(&self) -> StoreResult<Vec<Stored<R>>>;

    /// Records matching a predicate.
    async fn query(
        &self,
        predicate: &(dyn for<'a> Fn(&'a R) -> bool + Sync),
    ) -> StoreResult<Vec<Stored<R>>> {
        let rows = self.all().await?;
        Ok(rows.into_iter().filter(|s| predicate(&s.record)).collect())
    }
}
