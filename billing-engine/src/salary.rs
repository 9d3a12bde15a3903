use std::sync::Arc;

use audit_trail::{AccessControl, AuditTrail};
use chrono::{NaiveDate, NaiveDateTime};
use record_store::{RecordStore, Stored};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::interventions::InterventionLedger;
use crate::models::{DateRange, PaymentRecord, StaffKind, StaffMember, StaffRole};
use crate::shifts::ShiftLedger;

/// One shift line of a salary sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftLine {
    pub arrival: NaiveDateTime,
    pub leave: NaiveDateTime,
    pub patient: Option<String>,
    pub hours: Decimal,
}

/// One intervention line of a salary sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionLine {
    pub date: NaiveDate,
    pub intervention: String,
    pub patient: Option<String>,
    pub bonus: Decimal,
}

/// Salary figures for one staff member over a reporting window, itemized
/// deeply enough to reproduce the export sheet line for line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryStatement {
    pub staff_id: Uuid,
    pub name: String,
    pub role: StaffRole,
    pub hourly_rate: Decimal,
    pub total_hours: Decimal,
    pub base_salary: Decimal,
    pub total_bonus: Decimal,
    pub total_salary: Decimal,
    pub shift_details: Vec<ShiftLine>,
    pub intervention_details: Vec<InterventionLine>,
}

/// One shift line of a per-patient staff attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributedShiftLine {
    pub arrival: NaiveDateTime,
    pub leave: NaiveDateTime,
    pub staff_name: String,
    pub hours: Decimal,
    pub hourly_rate: Decimal,
    pub cost: Decimal,
}

/// One intervention line of a per-patient staff attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributedInterventionLine {
    pub date: NaiveDate,
    pub intervention: String,
    pub staff_name: String,
    pub bonus: Decimal,
}

/// Doctor or nurse time and bonuses attributed to one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAttribution {
    pub total_cost: Decimal,
    pub shift_lines: Vec<AttributedShiftLine>,
    pub intervention_lines: Vec<AttributedInterventionLine>,
}

impl StaffAttribution {
    fn empty() -> Self {
        Self {
            total_cost: Decimal::ZERO,
            shift_lines: Vec::new(),
            intervention_lines: Vec::new(),
        }
    }
}

/// Combines the shift ledger, intervention ledger, and the roster's hourly
/// rates into salary figures and itemized salary sheets.
#[derive(Clone)]
pub struct StaffCostEngine {
    roster: Arc<dyn RecordStore<StaffMember>>,
    patients: Arc<dyn RecordStore<crate::models::Patient>>,
    payments: Arc<dyn RecordStore<PaymentRecord>>,
    shifts: ShiftLedger,
    interventions: InterventionLedger,
    audit: AuditTrail,
    auth: Arc<dyn AccessControl>,
}

impl StaffCostEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        roster: Arc<dyn RecordStore<StaffMember>>,
        patients: Arc<dyn RecordStore<crate::models::Patient>>,
        payments: Arc<dyn RecordStore<PaymentRecord>>,
        shifts: ShiftLedger,
        interventions: InterventionLedger,
        audit: AuditTrail,
        auth: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            roster,
            patients,
            payments,
            shifts,
            interventions,
            audit,
            auth,
        }
    }

    pub fn shifts(&self) -> &ShiftLedger {
        &self.shifts
    }

    pub fn interventions(&self) -> &InterventionLedger {
        &self.interventions
    }

    /// Salary for one staff member over `window`.
    ///
    /// `base_salary = total_hours * hourly_rate`, `total_salary = base +
    /// bonus`. A staff id that does not resolve is an explicit `NotFound`,
    /// never a zero salary.
    pub async fn calculate_salary(
        &self,
        staff_id: Uuid,
        window: &DateRange,
    ) -> BillingResult<SalaryStatement> {
        let staff = self
            .roster
            .get(staff_id)
            .await?
            .ok_or(BillingError::not_found("staff member", staff_id))?;

        let mut shift_details = Vec::new();
        for shift in self.shifts.shifts_in_window(staff_id, window).await? {
            shift_details.push(ShiftLine {
                arrival: shift.record.arrival,
                leave: shift.record.leave,
                patient: self.patient_name(shift.record.patient_id).await?,
                hours: shift.record.hours(),
            });
        }

        let mut intervention_details = Vec::new();
        for (event, kind) in self.interventions.events_in_window(staff_id, window).await? {
            intervention_details.push(InterventionLine {
                date: event.record.date,
                intervention: kind.name,
                patient: self.patient_name(Some(event.record.patient_id)).await?,
                bonus: kind.bonus_amount,
            });
        }

        let total_hours: Decimal = shift_details.iter().map(|s| s.hours).sum();
        let total_bonus: Decimal = intervention_details.iter().map(|i| i.bonus).sum();
        let base_salary = (total_hours * staff.record.hourly_rate).round_dp(2);
        let total_salary = base_salary + total_bonus;

        Ok(SalaryStatement {
            staff_id,
            name: staff.record.name,
            role: staff.record.role,
            hourly_rate: staff.record.hourly_rate,
            total_hours,
            base_salary,
            total_bonus,
            total_salary,
            shift_details,
            intervention_details,
        })
    }

    /// The hours-times-rate-plus-bonus computation filtered to one patient:
    /// what the given kind of staff (doctors or nurses) cost while attributed
    /// to that patient inside `window`.
    pub async fn attributed_cost(
        &self,
        patient_id: Uuid,
        kind: StaffKind,
        window: &DateRange,
    ) -> BillingResult<StaffAttribution> {
        let mut attribution = StaffAttribution::empty();

        for shift in self.shifts.shifts_for_patient(patient_id, window).await? {
            let Some(staff) = self.roster.get(shift.record.staff_id).await? else {
                warn!(staff_id = %shift.record.staff_id, "shift references unknown staff member, skipping");
                continue;
            };
            if staff.record.role.kind() != kind {
                continue;
            }
            let hours = shift.record.hours();
            let cost = (hours * staff.record.hourly_rate).round_dp(2);
            attribution.total_cost += cost;
            attribution.shift_lines.push(AttributedShiftLine {
                arrival: shift.record.arrival,
                leave: shift.record.leave,
                staff_name: staff.record.name,
                hours,
                hourly_rate: staff.record.hourly_rate,
                cost,
            });
        }

        for (event, event_kind) in self.interventions.events_for_patient(patient_id, window).await? {
            let Some(staff) = self.roster.get(event.record.staff_id).await? else {
                warn!(staff_id = %event.record.staff_id, "intervention references unknown staff member, skipping");
                continue;
            };
            if staff.record.role.kind() != kind {
                continue;
            }
            attribution.total_cost += event_kind.bonus_amount;
            attribution.intervention_lines.push(AttributedInterventionLine {
                date: event.record.date,
                intervention: event_kind.name,
                staff_name: staff.record.name,
                bonus: event_kind.bonus_amount,
            });
        }

        Ok(attribution)
    }

    /// Snapshot the salary for a period into the payment history, unpaid.
    pub async fn record_payment(
        &self,
        staff_id: Uuid,
        window: &DateRange,
    ) -> BillingResult<Stored<PaymentRecord>> {
        let statement = self.calculate_salary(staff_id, window).await?;
        let record = PaymentRecord {
            staff_id,
            period: *window,
            total_hours: statement.total_hours,
            total_bonus: statement.total_bonus,
            total_salary: statement.total_salary,
            paid: false,
            paid_date: None,
        };
        let id = self.payments.insert(record.clone()).await?;
        self.audit
            .log(
                &self.actor().await,
                "RECORD_PAYMENT",
                json!({
                    "payment_id": id,
                    "staff_id": staff_id,
                    "period": window,
                    "total_salary": statement.total_salary,
                }),
            )
            .await?;
        Ok(Stored::new(id, record))
    }

    /// Stamp a recorded payment as paid.
    pub async fn mark_paid(&self, payment_id: Uuid) -> BillingResult<()> {
        let stored = self
            .payments
            .get(payment_id)
            .await?
            .ok_or(BillingError::not_found("payment", payment_id))?;
        if stored.record.paid {
            return Err(BillingError::Validation(
                "payment is already marked paid".into(),
            ));
        }
        let mut record = stored.record;
        record.paid = true;
        record.paid_date = Some(chrono::Utc::now().naive_utc());
        self.payments.update(payment_id, record).await?;
        Ok(())
    }

    /// Payment history for one staff member.
    pub async fn payments_for(&self, staff_id: Uuid) -> BillingResult<Vec<Stored<PaymentRecord>>> {
        Ok(self
            .payments
            .query(&|p: &PaymentRecord| p.staff_id == staff_id)
            .await?)
    }

    /// Delete a staff member and cascade to their shifts, intervention
    /// events, and payment history.
    pub async fn remove_staff(&self, staff_id: Uuid) -> BillingResult<()> {
        let staff = self
            .roster
            .get(staff_id)
            .await?
            .ok_or(BillingError::not_found("staff member", staff_id))?;

        self.shifts.remove_all_for_staff(staff_id).await?;
        self.interventions.remove_all_for_staff(staff_id).await?;
        for payment in self.payments_for(staff_id).await? {
            self.payments.delete(payment.id).await?;
        }
        self.roster.delete(staff_id).await?;

        info!(%staff_id, name = %staff.record.name, "staff member removed");
        self.audit
            .log(
                &self.actor().await,
                "REMOVE_STAFF",
                json!({
                    "staff_id": staff_id,
                    "name": staff.record.name,
                }),
            )
            .await?;
        Ok(())
    }

    async fn patient_name(&self, patient_id: Option<Uuid>) -> BillingResult<Option<String>> {
        let Some(id) = patient_id else {
            return Ok(None);
        };
        Ok(self.patients.get(id).await?.map(|p| p.record.name))
    }

    async fn actor(&self) -> String {
        self.auth
            .current_user()
            .await
            .unwrap_or_else(|| "system".to_string())
    }
}
