use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BillingError {
    /// Shift insertion rejected by the overlap rule. A normal outcome during
    /// bulk entry; callers count these instead of aborting the batch.
    #[error("shift for staff member {staff_id} overlaps an existing shift beyond the {tolerance_minutes}-minute tolerance")]
    Overlap {
        staff_id: Uuid,
        tolerance_minutes: i64,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(#[from] record_store::StoreError),

    #[error("audit error: {0}")]
    Audit(#[from] audit_trail::AuditError),
}

impl BillingError {
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn is_overlap(&self) -> bool {
        matches!(self, Self::Overlap { .. })
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
