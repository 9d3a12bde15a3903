//! Audit logging and access-control seam for the WardLedger engines
//!
//! Mutating operations in the billing core (add/remove shift, add
//! intervention, add stay, ...) attribute themselves to the acting user via
//! [`AccessControl`] and append an [`AuditEntry`] through [`AuditTrail`].
//! The core never gates behavior on privileges — that belongs to the UI
//! layer; this crate only records who did what.

pub mod access;
pub mod entry;
pub mod error;
pub mod trail;

pub use access::*;
pub use entry::*;
pub use error::*;
pub use trail::*;
