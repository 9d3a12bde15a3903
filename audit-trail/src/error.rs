use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("audit entry could not be persisted: {0}")]
    Storage(#[from] record_store::StoreError),
}

pub type AuditResult<T> = Result<T, AuditError>;
