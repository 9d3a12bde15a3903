#![allow(dead_code)]

use std::sync::Arc;

use audit_trail::{AuditTrail, StaticUser};
use billing_engine::*;
use chrono::{NaiveDate, NaiveDateTime};
use record_store::{MemoryStore, RecordStore};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid datetime")
}

pub fn october() -> DateRange {
    DateRange::new(date("2023-10-01"), date("2023-10-31"))
}

/// A full engine stack over fresh in-memory stores.
pub struct World {
    pub roster: Arc<MemoryStore<StaffMember>>,
    pub patients: Arc<MemoryStore<Patient>>,
    pub care_levels: Arc<MemoryStore<CareLevel>>,
    pub items: Arc<MemoryStore<BillableItem>>,
    pub equipment: Arc<MemoryStore<Equipment>>,
    pub intervention_types: Arc<MemoryStore<InterventionType>>,
    pub staff_costs: StaffCostEngine,
    pub patient_charges: PatientChargeEngine,
    pub company: CompanyReportEngine,
}

impl World {
    pub fn new() -> Self {
        let roster: Arc<MemoryStore<StaffMember>> = Arc::new(MemoryStore::new());
        let patients: Arc<MemoryStore<Patient>> = Arc::new(MemoryStore::new());
        let care_levels: Arc<MemoryStore<CareLevel>> = Arc::new(MemoryStore::new());
        let items: Arc<MemoryStore<BillableItem>> = Arc::new(MemoryStore::new());
        let equipment: Arc<MemoryStore<Equipment>> = Arc::new(MemoryStore::new());
        let intervention_types: Arc<MemoryStore<InterventionType>> = Arc::new(MemoryStore::new());
        let stays: Arc<MemoryStore<StayRecord>> = Arc::new(MemoryStore::new());
        let rentals: Arc<MemoryStore<EquipmentRental>> = Arc::new(MemoryStore::new());

        let audit = AuditTrail::new(Arc::new(MemoryStore::new()));
        let auth: Arc<dyn audit_trail::AccessControl> = Arc::new(StaticUser::new("admin"));
        let config = BillingConfig::default();

        let shift_ledger = ShiftLedger::new(
            Arc::new(MemoryStore::new()),
            audit.clone(),
            auth.clone(),
            &config,
        );
        let intervention_ledger = InterventionLedger::new(
            Arc::new(MemoryStore::new()),
            intervention_types.clone(),
            audit.clone(),
            auth.clone(),
        );
        let stay_ledger = StayLedger::new(
            stays,
            patients.clone(),
            care_levels.clone(),
            rentals.clone(),
            equipment.clone(),
            audit.clone(),
            auth.clone(),
        );
        let rental_ledger = RentalLedger::new(
            rentals,
            equipment.clone(),
            audit.clone(),
            auth.clone(),
        );

        let staff_costs = StaffCostEngine::new(
            roster.clone(),
            patients.clone(),
            Arc::new(MemoryStore::new()),
            shift_ledger,
            intervention_ledger,
            audit.clone(),
            auth.clone(),
        );
        let patient_charges = PatientChargeEngine::new(
            patients.clone(),
            care_levels.clone(),
            items.clone(),
            equipment.clone(),
            ItemChargeStores {
                labs: Arc::new(MemoryStore::new()),
                drugs: Arc::new(MemoryStore::new()),
                radiology: Arc::new(MemoryStore::new()),
                consultations: Arc::new(MemoryStore::new()),
            },
            stay_ledger,
            rental_ledger,
            staff_costs.clone(),
            audit,
            auth,
        );
        let company = CompanyReportEngine::new(
            roster.clone(),
            patients.clone(),
            staff_costs.clone(),
            patient_charges.clone(),
        );

        Self {
            roster,
            patients,
            care_levels,
            items,
            equipment,
            intervention_types,
            staff_costs,
            patient_charges,
            company,
        }
    }

    pub async fn add_doctor(&self, name: &str, hourly_rate: Decimal) -> Uuid {
        self.roster
            .insert(StaffMember {
                name: name.into(),
                role: StaffRole::Doctor,
                hourly_rate,
            })
            .await
            .unwrap()
    }

    pub async fn add_nurse(&self, name: &str, level: NurseLevel, hourly_rate: Decimal) -> Uuid {
        self.roster
            .insert(StaffMember {
                name: name.into(),
                role: StaffRole::Nurse { level },
                hourly_rate,
            })
            .await
            .unwrap()
    }

    pub async fn add_patient(&self, name: &str, admission: &str) -> Uuid {
        self.patients
            .insert(Patient {
                name: name.into(),
                admission_date: date(admission),
                discharge_date: None,
            })
            .await
            .unwrap()
    }

    pub async fn add_care_level(
        &self,
        name: &str,
        daily_rate: Decimal,
        default_equipment: Vec<Uuid>,
    ) -> Uuid {
        self.care_levels
            .insert(CareLevel {
                name: name.into(),
                daily_rate,
                default_equipment,
            })
            .await
            .unwrap()
    }

    pub async fn add_item(&self, category: ItemCategory, name: &str, unit_price: Decimal) -> Uuid {
        self.items
            .insert(BillableItem {
                category,
                name: name.into(),
                unit_price,
            })
            .await
            .unwrap()
    }

    pub async fn add_equipment(&self, name: &str, daily_rental_price: Decimal) -> Uuid {
        self.equipment
            .insert(Equipment {
                name: name.into(),
                daily_rental_price,
            })
            .await
            .unwrap()
    }

    pub async fn add_intervention_type(&self, name: &str, bonus_amount: Decimal) -> Uuid {
        self.intervention_types
            .insert(InterventionType {
                name: name.into(),
                bonus_amount,
            })
            .await
            .unwrap()
    }
}
