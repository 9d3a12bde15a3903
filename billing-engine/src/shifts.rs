use std::sync::Arc;

use audit_trail::{AccessControl, AuditTrail};
use chrono::NaiveDateTime;
use record_store::{RecordStore, Stored};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::config::BillingConfig;
use crate::error::{BillingError, BillingResult};
use crate::models::{DateRange, Shift};
use crate::overlap;

/// Outcome of entering one shift for several staff members at once.
/// Overlap rejections are expected; the caller reports
/// "added for N, failed for M" instead of aborting the batch.
#[derive(Debug, Clone)]
pub struct BulkShiftOutcome {
    pub added: Vec<Uuid>,
    pub rejected: Vec<Uuid>,
}

/// Owns shift records and enforces the overlap rule on insert.
#[derive(Clone)]
pub struct ShiftLedger {
    shifts: Arc<dyn RecordStore<Shift>>,
    audit: AuditTrail,
    auth: Arc<dyn AccessControl>,
    tolerance_minutes: i64,
}

impl ShiftLedger {
    pub fn new(
        shifts: Arc<dyn RecordStore<Shift>>,
        audit: AuditTrail,
        auth: Arc<dyn AccessControl>,
        config: &BillingConfig,
    ) -> Self {
        Self {
            shifts,
            audit,
            auth,
            tolerance_minutes: config.shift_overlap_tolerance_minutes,
        }
    }

    /// Persist a new shift. Fails with `Overlap` when the new interval
    /// conflicts with one of the staff member's existing shifts, and with
    /// `Validation` when the interval itself is malformed.
    pub async fn add_shift(
        &self,
        staff_id: Uuid,
        patient_id: Option<Uuid>,
        arrival: NaiveDateTime,
        leave: NaiveDateTime,
    ) -> BillingResult<Stored<Shift>> {
        if leave <= arrival {
            return Err(BillingError::Validation(
                "shift leave time must be after arrival time".into(),
            ));
        }

        let shift = Shift {
            staff_id,
            patient_id,
            arrival,
            leave,
        };
        let existing: Vec<_> = self
            .shifts
            .query(&|s: &Shift| s.staff_id == staff_id)
            .await?
            .into_iter()
            .map(|s| s.record.span())
            .collect();
        if overlap::overlaps(&shift.span(), &existing, self.tolerance_minutes) {
            return Err(BillingError::Overlap {
                staff_id,
                tolerance_minutes: self.tolerance_minutes,
            });
        }

        let id = self.shifts.insert(shift.clone()).await?;
        info!(%staff_id, %arrival, %leave, "shift added");
        self.audit
            .log(
                &self.actor().await,
                "ADD_SHIFT",
                json!({
                    "shift_id": id,
                    "staff_id": staff_id,
                    "patient_id": patient_id,
                    "arrival": arrival,
                    "leave": leave,
                }),
            )
            .await?;
        Ok(Stored::new(id, shift))
    }

    /// Enter the same interval for several staff members, partitioning them
    /// into added and overlap-rejected. Malformed input still aborts the
    /// whole batch before any insert.
    pub async fn add_shift_for_many(
        &self,
        staff_ids: &[Uuid],
        patient_id: Option<Uuid>,
        arrival: NaiveDateTime,
        leave: NaiveDateTime,
    ) -> BillingResult<BulkShiftOutcome> {
        if leave <= arrival {
            return Err(BillingError::Validation(
                "shift leave time must be after arrival time".into(),
            ));
        }

        let mut outcome = BulkShiftOutcome {
            added: Vec::new(),
            rejected: Vec::new(),
        };
        for &staff_id in staff_ids {
            match self.add_shift(staff_id, patient_id, arrival, leave).await {
                Ok(_) => outcome.added.push(staff_id),
                Err(err) if err.is_overlap() => outcome.rejected.push(staff_id),
                Err(err) => return Err(err),
            }
        }
        Ok(outcome)
    }

    /// Delete one shift. Fails with `NotFound` if absent.
    pub async fn remove_shift(&self, shift_id: Uuid) -> BillingResult<()> {
        let stored = self
            .shifts
            .get(shift_id)
            .await?
            .ok_or(BillingError::not_found("shift", shift_id))?;
        self.shifts.delete(shift_id).await?;
        self.audit
            .log(
                &self.actor().await,
                "REMOVE_SHIFT",
                json!({
                    "shift_id": shift_id,
                    "staff_id": stored.record.staff_id,
                    "arrival": stored.record.arrival,
                }),
            )
            .await?;
        Ok(())
    }

    /// Shifts whose arrival date falls inside `window`, for one staff member.
    pub async fn shifts_in_window(
        &self,
        staff_id: Uuid,
        window: &DateRange,
    ) -> BillingResult<Vec<Stored<Shift>>> {
        let window = *window;
        Ok(self
            .shifts
            .query(&move |s: &Shift| s.staff_id == staff_id && window.contains(s.arrival.date()))
            .await?)
    }

    /// Total hours worked in `window`, rounded to two decimals per shift
    /// before summing.
    pub async fn hours_in_window(&self, staff_id: Uuid, window: &DateRange) -> BillingResult<Decimal> {
        let shifts = self.shifts_in_window(staff_id, window).await?;
        Ok(shifts.iter().map(|s| s.record.hours()).sum())
    }

    /// Shifts attributed to one patient whose arrival date falls in `window`.
    pub async fn shifts_for_patient(
        &self,
        patient_id: Uuid,
        window: &DateRange,
    ) -> BillingResult<Vec<Stored<Shift>>> {
        let window = *window;
        Ok(self
            .shifts
            .query(&move |s: &Shift| {
                s.patient_id == Some(patient_id) && window.contains(s.arrival.date())
            })
            .await?)
    }

    /// Delete every shift owned by one staff member (roster cascade).
    pub async fn remove_all_for_staff(&self, staff_id: Uuid) -> BillingResult<()> {
        let owned = self
            .shifts
            .query(&|s: &Shift| s.staff_id == staff_id)
            .await?;
        for shift in owned {
            self.shifts.delete(shift.id).await?;
        }
        Ok(())
    }

    async fn actor(&self) -> String {
        self.auth
            .current_user()
            .await
            .unwrap_or_else(|| "system".to_string())
    }
}
