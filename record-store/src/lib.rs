//! Logical datastore abstraction for the WardLedger engines
//!
//! Each logical store (doctors, nurses, patients, items, interventions) is an
//! independent `RecordStore` instance handed to the engines at construction.
//! The engines only require id lookups and predicate scans; whether the rows
//! live in SQL, a key-value store, or an in-memory map is the store's concern.
//!
//! The stores are deliberately not joined by a transactional boundary, so
//! cross-store consistency is best-effort: a shift may reference a patient id
//! that no longer resolves, and the read paths must tolerate that.

pub mod error;
pub mod memory;
pub mod store;

pub use error::*;
pub use memory::*;
pub use store::*;
