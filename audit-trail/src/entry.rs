// Audit entry types and structures
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One audit-log line: who did what, when, with a free-form detail payload.
///
/// Timestamps are naive per the single-institutional-clock convention used
/// everywhere else in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub actor: String,
    pub action: String,
    pub details: serde_json::Value,
}

impl AuditEntry {
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().naive_utc(),
            actor: actor.into(),
            action: action.into(),
            details,
        }
    }
}
