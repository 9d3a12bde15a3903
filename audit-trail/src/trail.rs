use std::sync::Arc;

use record_store::{RecordStore, Stored};
use tracing::debug;

use crate::entry::AuditEntry;
use crate::error::AuditResult;

/// Append-only audit log over a [`RecordStore`].
#[derive(Clone)]
pub struct AuditTrail {
    store: Arc<dyn RecordStore<AuditEntry>>,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn RecordStore<AuditEntry>>) -> Self {
        Self { store }
    }

    /// Record an action performed by `actor`.
    pub async fn log(
        &self,
        actor: &str,
        action: &str,
        details: serde_json::Value,
    ) -> AuditResult<()> {
        debug!(actor, action, "audit");
        self.store
            .insert(AuditEntry::new(actor, action, details))
            .await?;
        Ok(())
    }

    /// All entries recorded for one actor, oldest first.
    pub async fn entries_for(&self, actor: &str) -> AuditResult<Vec<Stored<AuditEntry>>> {
        Ok(self.store.query(&|e: &AuditEntry| e.actor == actor).await?)
    }
}
