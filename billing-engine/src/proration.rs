//! Proration of date-ranged resources against a reporting window.
//!
//! Stays and rentals bill in whole-day units, inclusive on both ends: a
//! one-day overlap still bills one full day. Open-ended rentals are capped
//! at the window end, never extrapolated beyond it.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::DateRange;

/// Whole days of `resource_start..=resource_end` falling inside `window`.
pub fn billable_days(
    resource_start: NaiveDate,
    resource_end: Option<NaiveDate>,
    window: &DateRange,
) -> i64 {
    let effective_end = resource_end.unwrap_or(window.to);
    let overlap_start = resource_start.max(window.from);
    let overlap_end = effective_end.min(window.to);
    if overlap_start > overlap_end {
        return 0;
    }
    (overlap_end - overlap_start).num_days() + 1
}

/// Prorated cost of a daily-rated resource restricted to `window`.
pub fn prorate(
    resource_start: NaiveDate,
    resource_end: Option<NaiveDate>,
    daily_rate: Decimal,
    window: &DateRange,
) -> Decimal {
    Decimal::from(billable_days(resource_start, resource_end, window)) * daily_rate
}
