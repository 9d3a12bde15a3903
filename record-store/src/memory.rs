use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{RecordStore, Stored};
use async_trait::async_trait;

/// In-memory `RecordStore` backed by a `tokio::sync::RwLock`.
///
/// Every test builds its own instances, so there is no shared process-wide
/// state and no teardown to forget.
pub struct MemoryStore<R> {
    rows: RwLock<Vec<Stored<R>>>,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> RecordStore<R> for MemoryStore<R>
where
    R: Clone + Send + Sync + 'static,
{
    async fn insert(&self, record: R) -> StoreResult<Uuid> {
        let id = Uuid::new_v4();
        self.rows.write().await.push(Stored::new(id, record));
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Stored<R>>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, id: Uuid, record: R) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|s| s.id == id) {
            Some(slot) => {
                slot.record = record;
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|s| s.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn all(&self) -> StoreResult<Vec<Stored<R>>> {
        Ok(self.rows.read().await.clone())
    }
}
