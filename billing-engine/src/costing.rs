use std::sync::Arc;

use audit_trail::{AccessControl, AuditTrail};
use chrono::NaiveDate;
use record_store::{RecordStore, Stored};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::{
    BillableItem, CareLevel, DateRange, Equipment, ItemCategory, ItemCharge, Patient, RentalCharge,
    StaffKind,
};
use crate::proration;
use crate::rentals::{self, RentalLedger};
use crate::salary::{StaffAttribution, StaffCostEngine};
use crate::stays::StayLedger;

/// One store per item category. The closed enum keeps dispatch exhaustive;
/// there is no string-built store name anywhere.
#[derive(Clone)]
pub struct ItemChargeStores {
    pub labs: Arc<dyn RecordStore<ItemCharge>>,
    pub drugs: Arc<dyn RecordStore<ItemCharge>>,
    pub radiology: Arc<dyn RecordStore<ItemCharge>>,
    pub consultations: Arc<dyn RecordStore<ItemCharge>>,
}

impl ItemChargeStores {
    pub fn store(&self, category: ItemCategory) -> &Arc<dyn RecordStore<ItemCharge>> {
        match category {
            ItemCategory::Labs => &self.labs,
            ItemCategory::Drugs => &self.drugs,
            ItemCategory::Radiology => &self.radiology,
            ItemCategory::Consultations => &self.consultations,
        }
    }
}

/// Per-category item cost totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCostTotals {
    pub labs: Decimal,
    pub drugs: Decimal,
    pub radiology: Decimal,
    pub consultations: Decimal,
}

impl ItemCostTotals {
    pub fn get(&self, category: ItemCategory) -> Decimal {
        match category {
            ItemCategory::Labs => self.labs,
            ItemCategory::Drugs => self.drugs,
            ItemCategory::Radiology => self.radiology,
            ItemCategory::Consultations => self.consultations,
        }
    }

    fn add(&mut self, category: ItemCategory, amount: Decimal) {
        match category {
            ItemCategory::Labs => self.labs += amount,
            ItemCategory::Drugs => self.drugs += amount,
            ItemCategory::Radiology => self.radiology += amount,
            ItemCategory::Consultations => self.consultations += amount,
        }
    }

    pub fn sum(&self) -> Decimal {
        self.labs + self.drugs + self.radiology + self.consultations
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StayLine {
    pub date: NaiveDate,
    pub care_level: String,
    pub daily_rate: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemLine {
    pub category: ItemCategory,
    pub date: NaiveDate,
    pub item: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentLine {
    pub equipment: String,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub days: i64,
    pub daily_rate: Decimal,
    pub cost: Decimal,
}

/// Full per-patient cost sheet for a reporting window.
///
/// This is the single costing implementation; the live cost view, the cost
/// sheet export, and the company rollup all consume this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientCostBreakdown {
    pub patient_id: Uuid,
    pub name: String,
    pub admission_date: NaiveDate,
    pub discharge_date: Option<NaiveDate>,
    pub stay_cost: Decimal,
    pub item_costs: ItemCostTotals,
    pub equipment_cost: Decimal,
    pub doctor_cost: Decimal,
    pub nurse_cost: Decimal,
    pub total_cost: Decimal,
    pub stay_lines: Vec<StayLine>,
    pub item_lines: Vec<ItemLine>,
    pub equipment_lines: Vec<EquipmentLine>,
    pub doctor_detail: StaffAttribution,
    pub nurse_detail: StaffAttribution,
}

impl PatientCostBreakdown {
    /// Revenue billed to the patient: stays, items, and equipment. Staff
    /// attribution is a company cost, not patient revenue.
    pub fn billed_revenue(&self) -> Decimal {
        self.stay_cost + self.item_costs.sum() + self.equipment_cost
    }
}

/// Combines stay records, itemized services, equipment rentals, and staff
/// attribution into per-patient revenue and itemized cost sheets.
#[derive(Clone)]
pub struct PatientChargeEngine {
    patients: Arc<dyn RecordStore<Patient>>,
    care_levels: Arc<dyn RecordStore<CareLevel>>,
    items: Arc<dyn RecordStore<BillableItem>>,
    equipment: Arc<dyn RecordStore<Equipment>>,
    charges: ItemChargeStores,
    stays: StayLedger,
    rentals: RentalLedger,
    staff: StaffCostEngine,
    audit: AuditTrail,
    auth: Arc<dyn AccessControl>,
}

impl PatientChargeEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        patients: Arc<dyn RecordStore<Patient>>,
        care_levels: Arc<dyn RecordStore<CareLevel>>,
        items: Arc<dyn RecordStore<BillableItem>>,
        equipment: Arc<dyn RecordStore<Equipment>>,
        charges: ItemChargeStores,
        stays: StayLedger,
        rentals: RentalLedger,
        staff: StaffCostEngine,
        audit: AuditTrail,
        auth: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            patients,
            care_levels,
            items,
            equipment,
            charges,
            stays,
            rentals,
            staff,
            audit,
            auth,
        }
    }

    pub fn stays(&self) -> &StayLedger {
        &self.stays
    }

    pub fn rentals(&self) -> &RentalLedger {
        &self.rentals
    }

    /// Charge an itemized service to a patient. Quantity must be at least
    /// one and the item must belong to the charged category.
    pub async fn add_item_charge(
        &self,
        patient_id: Uuid,
        category: ItemCategory,
        date: NaiveDate,
        item_id: Uuid,
        quantity: u32,
    ) -> BillingResult<Stored<ItemCharge>> {
        if quantity == 0 {
            return Err(BillingError::Validation(
                "item charge quantity must be at least 1".into(),
            ));
        }
        self.patients
            .get(patient_id)
            .await?
            .ok_or(BillingError::not_found("patient", patient_id))?;
        let item = self
            .items
            .get(item_id)
            .await?
            .ok_or(BillingError::not_found("item", item_id))?;
        if item.record.category != category {
            return Err(BillingError::Validation(format!(
                "item '{}' belongs to {}, not {}",
                item.record.name, item.record.category, category
            )));
        }

        let charge = ItemCharge {
            patient_id,
            date,
            item_id,
            quantity,
        };
        let id = self.charges.store(category).insert(charge.clone()).await?;
        self.audit
            .log(
                &self.actor().await,
                "ADD_ITEM",
                json!({
                    "charge_id": id,
                    "patient_id": patient_id,
                    "category": category,
                    "item": item.record.name,
                    "quantity": quantity,
                }),
            )
            .await?;
        Ok(Stored::new(id, charge))
    }

    /// The one patient-cost computation. Touches every ledger and store;
    /// rows referencing catalog entries that no longer resolve are skipped
    /// and logged rather than failing the whole sheet.
    pub async fn calculate_patient_cost(
        &self,
        patient_id: Uuid,
        window: &DateRange,
    ) -> BillingResult<PatientCostBreakdown> {
        let patient = self
            .patients
            .get(patient_id)
            .await?
            .ok_or(BillingError::not_found("patient", patient_id))?;

        // Stays: one daily rate per recorded stay-day, already day-granular.
        let mut stay_cost = Decimal::ZERO;
        let mut stay_lines = Vec::new();
        for stay in self.stays.stays_for_patient(patient_id, window).await? {
            let Some(level) = self.care_levels.get(stay.record.care_level_id).await? else {
                warn!(
                    stay_id = %stay.id,
                    care_level_id = %stay.record.care_level_id,
                    "stay references unknown care level, skipping"
                );
                continue;
            };
            stay_cost += level.record.daily_rate;
            stay_lines.push(StayLine {
                date: stay.record.stay_date,
                care_level: level.record.name,
                daily_rate: level.record.daily_rate,
            });
        }

        // Itemized services per category.
        let mut item_costs = ItemCostTotals::default();
        let mut item_lines = Vec::new();
        for category in ItemCategory::ALL {
            let window = *window;
            let rows = self
                .charges
                .store(category)
                .query(&move |c: &ItemCharge| {
                    c.patient_id == patient_id && window.contains(c.date)
                })
                .await?;
            for row in rows {
                let Some(item) = self.items.get(row.record.item_id).await? else {
                    warn!(
                        charge_id = %row.id,
                        item_id = %row.record.item_id,
                        "charge references unknown item, skipping"
                    );
                    continue;
                };
                let total = Decimal::from(row.record.quantity) * item.record.unit_price;
                item_costs.add(category, total);
                item_lines.push(ItemLine {
                    category,
                    date: row.record.date,
                    item: item.record.name,
                    quantity: row.record.quantity,
                    unit_price: item.record.unit_price,
                    total,
                });
            }
        }
        item_lines.sort_by_key(|l| l.date);

        // Equipment rentals, both billing representations.
        let mut equipment_cost = Decimal::ZERO;
        let mut equipment_lines = Vec::new();
        for rental in self.rentals.rentals_for_patient(patient_id).await? {
            let cost = rentals::cost_in_window(&rental.record.charge, window);
            if cost.is_zero() {
                continue;
            }
            equipment_cost += cost;
            let name = match self.equipment.get(rental.record.equipment_id).await? {
                Some(e) => e.record.name,
                None => {
                    warn!(
                        rental_id = %rental.id,
                        equipment_id = %rental.record.equipment_id,
                        "rental references unknown equipment"
                    );
                    "(unknown equipment)".to_string()
                }
            };
            let line = match rental.record.charge {
                RentalCharge::Ranged {
                    start,
                    end,
                    daily_rate,
                } => EquipmentLine {
                    equipment: name,
                    start,
                    end,
                    days: proration::billable_days(start, end, window),
                    daily_rate,
                    cost,
                },
                RentalCharge::FixedDay { date, amount } => EquipmentLine {
                    equipment: name,
                    start: date,
                    end: Some(date),
                    days: 1,
                    daily_rate: amount,
                    cost,
                },
            };
            equipment_lines.push(line);
        }

        // Staff time spent on this patient, via the salary engine.
        let doctor_detail = self
            .staff
            .attributed_cost(patient_id, StaffKind::Doctor, window)
            .await?;
        let nurse_detail = self
            .staff
            .attributed_cost(patient_id, StaffKind::Nurse, window)
            .await?;
        let doctor_cost = doctor_detail.total_cost;
        let nurse_cost = nurse_detail.total_cost;

        let total_cost =
            stay_cost + item_costs.sum() + equipment_cost + doctor_cost + nurse_cost;

        Ok(PatientCostBreakdown {
            patient_id,
            name: patient.record.name,
            admission_date: patient.record.admission_date,
            discharge_date: patient.record.discharge_date,
            stay_cost,
            item_costs,
            equipment_cost,
            doctor_cost,
            nurse_cost,
            total_cost,
            stay_lines,
            item_lines,
            equipment_lines,
            doctor_detail,
            nurse_detail,
        })
    }

    async fn actor(&self) -> String {
        self.auth
            .current_user()
            .await
            .unwrap_or_else(|| "system".to_string())
    }
}
