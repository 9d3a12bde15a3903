//! Billing & cost aggregation core for hospital operations
//!
//! Provides the back-office computations behind the record-keeping screens:
//! - Shift bookkeeping with tolerance-based overlap rejection
//! - Intervention bonus bookkeeping against a shared catalog
//! - Stay-day and equipment-rental charges, prorated against reporting windows
//! - Per-staff salary figures and itemized salary sheets
//! - Per-patient cost sheets across stays, items, equipment, and staff time
//! - Company-wide revenue/cost/profit reporting
//!
//! All engines receive their `RecordStore` instances at construction; there
//! is no process-wide connection state. Mutations attribute themselves to
//! the current user through the audit trail.

pub mod config;
pub mod costing;
pub mod error;
pub mod export;
pub mod interventions;
pub mod models;
pub mod overlap;
pub mod proration;
pub mod rentals;
pub mod reporting;
pub mod salary;
pub mod shifts;
pub mod stays;

pub use config::*;
pub use costing::*;
pub use error::*;
pub use interventions::*;
pub use models::*;
pub use rentals::*;
pub use reporting::*;
pub use salary::*;
pub use shifts::*;
pub use stays::*;
