use std::sync::Arc;

use record_store::RecordStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::costing::PatientChargeEngine;
use crate::error::BillingResult;
use crate::models::{DateRange, NurseLevel, Patient, StaffKind, StaffMember, StaffRole};
use crate::salary::StaffCostEngine;

/// One staff member's cost contribution to the company report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCostLine {
    pub staff_id: Uuid,
    pub name: String,
    pub level: Option<NurseLevel>,
    pub cost: Decimal,
}

/// One patient's revenue contribution to the company report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRevenueLine {
    pub patient_id: Uuid,
    pub name: String,
    pub revenue: Decimal,
}

/// Organization-wide revenue/cost/profit statement for a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyReport {
    pub window: DateRange,
    /// Stays + items + equipment billed to patients. Staff attribution is
    /// excluded: it belongs to staff cost, not revenue.
    pub total_patient_revenue: Decimal,
    /// Org-wide salaries across all doctors and nurses.
    pub total_staff_cost: Decimal,
    /// Items and equipment are billed at purchase cost with no markup, so
    /// they count as both revenue and an offsetting operational cost.
    pub pass_through_cost: Decimal,
    pub total_operational_cost: Decimal,
    pub net_profit: Decimal,
    pub per_doctor: Vec<StaffCostLine>,
    pub per_nurse: Vec<StaffCostLine>,
    pub per_patient: Vec<PatientRevenueLine>,
}

/// Rolls staff salaries and patient charges into one company statement.
#[derive(Clone)]
pub struct CompanyReportEngine {
    roster: Arc<dyn RecordStore<StaffMember>>,
    patients: Arc<dyn RecordStore<Patient>>,
    staff_costs: StaffCostEngine,
    patient_charges: PatientChargeEngine,
}

impl CompanyReportEngine {
    pub fn new(
        roster: Arc<dyn RecordStore<StaffMember>>,
        patients: Arc<dyn RecordStore<Patient>>,
        staff_costs: StaffCostEngine,
        patient_charges: PatientChargeEngine,
    ) -> Self {
        Self {
            roster,
            patients,
            staff_costs,
            patient_charges,
        }
    }

    /// Company-wide profit/loss for `window`.
    ///
    /// Aggregation is best-effort: an entity whose data cannot be computed is
    /// skipped and logged, never aborting the report. Itemized lines include
    /// only entities with strictly positive figures.
    pub async fn calculate_report(&self, window: &DateRange) -> BillingResult<CompanyReport> {
        let mut total_staff_cost = Decimal::ZERO;
        let mut per_doctor = Vec::new();
        let mut per_nurse = Vec::new();

        for staff in self.roster.all().await? {
            let statement = match self.staff_costs.calculate_salary(staff.id, window).await {
                Ok(statement) => statement,
                Err(err) => {
                    warn!(staff_id = %staff.id, %err, "skipping staff member in company report");
                    continue;
                }
            };
            total_staff_cost += statement.total_salary;
            if statement.total_salary > Decimal::ZERO {
                let line = StaffCostLine {
                    staff_id: staff.id,
                    name: statement.name,
                    level: match staff.record.role {
                        StaffRole::Nurse { level } => Some(level),
                        StaffRole::Doctor => None,
                    },
                    cost: statement.total_salary,
                };
                match staff.record.role.kind() {
                    StaffKind::Doctor => per_doctor.push(line),
                    StaffKind::Nurse => per_nurse.push(line),
                }
            }
        }

        let mut total_patient_revenue = Decimal::ZERO;
        let mut pass_through_cost = Decimal::ZERO;
        let mut per_patient = Vec::new();

        for patient in self.patients.all().await? {
            let breakdown = match self
                .patient_charges
                .calculate_patient_cost(patient.id, window)
                .await
            {
                Ok(breakdown) => breakdown,
                Err(err) => {
                    warn!(patient_id = %patient.id, %err, "skipping patient in company report");
                    continue;
                }
            };
            let revenue = breakdown.billed_revenue();
            total_patient_revenue += revenue;
            pass_through_cost += breakdown.item_costs.sum() + breakdown.equipment_cost;
            if revenue > Decimal::ZERO {
                per_patient.push(PatientRevenueLine {
                    patient_id: patient.id,
                    name: breakdown.name,
                    revenue,
                });
            }
        }

        let total_operational_cost = total_staff_cost + pass_through_cost;
        let net_profit = total_patient_revenue - total_operational_cost;
        info!(
            %total_patient_revenue,
            %total_operational_cost,
            %net_profit,
            "company report computed"
        );

        Ok(CompanyReport {
            window: *window,
            total_patient_revenue,
            total_staff_cost,
            pass_through_cost,
            total_operational_cost,
            net_profit,
            per_doctor,
            per_nurse,
            per_patient,
        })
    }
}
