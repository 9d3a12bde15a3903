use std::sync::Arc;

use audit_trail::{AccessControl, AuditTrail};
use chrono::NaiveDate;
use record_store::{RecordStore, Stored};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::{
    CareLevel, DateRange, Equipment, EquipmentRental, Patient, RentalCharge, StayRecord,
};

/// Owns care-level stay records, one per (patient, calendar day).
#[derive(Clone)]
pub struct StayLedger {
    stays: Arc<dyn RecordStore<StayRecord>>,
    patients: Arc<dyn RecordStore<Patient>>,
    care_levels: Arc<dyn RecordStore<CareLevel>>,
    rentals: Arc<dyn RecordStore<EquipmentRental>>,
    equipment: Arc<dyn RecordStore<Equipment>>,
    audit: AuditTrail,
    auth: Arc<dyn AccessControl>,
}

impl StayLedger {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        stays: Arc<dyn RecordStore<StayRecord>>,
        patients: Arc<dyn RecordStore<Patient>>,
        care_levels: Arc<dyn RecordStore<CareLevel>>,
        rentals: Arc<dyn RecordStore<EquipmentRental>>,
        equipment: Arc<dyn RecordStore<Equipment>>,
        audit: AuditTrail,
        auth: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            stays,
            patients,
            care_levels,
            rentals,
            equipment,
            audit,
            auth,
        }
    }

    /// Record one billed stay-day. Patient and care level must resolve, and a
    /// second stay for the same (patient, date) is rejected before any write.
    pub async fn add_stay(
        &self,
        patient_id: Uuid,
        stay_date: NaiveDate,
        care_level_id: Uuid,
    ) -> BillingResult<Stored<StayRecord>> {
        self.patients
            .get(patient_id)
            .await?
            .ok_or(BillingError::not_found("patient", patient_id))?;
        self.care_levels
            .get(care_level_id)
            .await?
            .ok_or(BillingError::not_found("care level", care_level_id))?;

        let duplicates = self
            .stays
            .query(&move |s: &StayRecord| s.patient_id == patient_id && s.stay_date == stay_date)
            .await?;
        if !duplicates.is_empty() {
            return Err(BillingError::Validation(format!(
                "patient {patient_id} already has a stay recorded on {stay_date}"
            )));
        }

        let stay = StayRecord {
            patient_id,
            stay_date,
            care_level_id,
        };
        let id = self.stays.insert(stay.clone()).await?;
        self.audit
            .log(
                &self.actor().await,
                "ADD_STAY",
                json!({
                    "stay_id": id,
                    "patient_id": patient_id,
                    "stay_date": stay_date,
                    "care_level_id": care_level_id,
                }),
            )
            .await?;
        Ok(Stored::new(id, stay))
    }

    /// Record a stay-day and seed the care level's default equipment list as
    /// fixed daily charges for that date.
    pub async fn add_stay_with_default_equipment(
        &self,
        patient_id: Uuid,
        stay_date: NaiveDate,
        care_level_id: Uuid,
    ) -> BillingResult<Stored<StayRecord>> {
        let stay = self.add_stay(patient_id, stay_date, care_level_id).await?;

        // add_stay already verified the care level exists.
        let level = self
            .care_levels
            .get(care_level_id)
            .await?
            .ok_or(BillingError::not_found("care level", care_level_id))?;
        for equipment_id in &level.record.default_equipment {
            let Some(equipment) = self.equipment.get(*equipment_id).await? else {
                warn!(%equipment_id, "default equipment missing from catalog, skipping");
                continue;
            };
            let rental = EquipmentRental {
                patient_id,
                equipment_id: *equipment_id,
                charge: RentalCharge::FixedDay {
                    date: stay_date,
                    amount: equipment.record.daily_rental_price,
                },
            };
            let rental_id = self.rentals.insert(rental).await?;
            self.audit
                .log(
                    &self.actor().await,
                    "ADD_EQUIPMENT",
                    json!({
                        "rental_id": rental_id,
                        "patient_id": patient_id,
                        "equipment": equipment.record.name,
                        "date": stay_date,
                    }),
                )
                .await?;
        }
        Ok(stay)
    }

    /// Delete one stay record. Fails with `NotFound` if absent.
    pub async fn remove_stay(&self, stay_id: Uuid) -> BillingResult<()> {
        let stored = self
            .stays
            .get(stay_id)
            .await?
            .ok_or(BillingError::not_found("stay", stay_id))?;
        self.stays.delete(stay_id).await?;
        self.audit
            .log(
                &self.actor().await,
                "REMOVE_STAY",
                json!({
                    "stay_id": stay_id,
                    "patient_id": stored.record.patient_id,
                    "stay_date": stored.record.stay_date,
                }),
            )
            .await?;
        Ok(())
    }

    /// A patient's stay records inside `window`, oldest first.
    pub async fn stays_for_patient(
        &self,
        patient_id: Uuid,
        window: &DateRange,
    ) -> BillingResult<Vec<Stored<StayRecord>>> {
        let window = *window;
        let mut stays = self
            .stays
            .query(&move |s: &StayRecord| {
                s.patient_id == patient_id && window.contains(s.stay_date)
            })
            .await?;
        stays.sort_by_key(|s| s.record.stay_date);
        Ok(stays)
    }

    async fn actor(&self) -> String {
        self.auth
            .current_user()
            .await
            .unwrap_or_else(|| "system".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_trail::StaticUser;
    use record_store::MemoryStore;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        ledger: StayLedger,
        rentals: Arc<MemoryStore<EquipmentRental>>,
        patient_id: Uuid,
        care_level_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let patients: Arc<MemoryStore<Patient>> = Arc::new(MemoryStore::new());
        let care_levels: Arc<MemoryStore<CareLevel>> = Arc::new(MemoryStore::new());
        let equipment: Arc<MemoryStore<Equipment>> = Arc::new(MemoryStore::new());
        let rentals: Arc<MemoryStore<EquipmentRental>> = Arc::new(MemoryStore::new());

        let patient_id = patients
            .insert(Patient {
                name: "John Doe".into(),
                admission_date: date("2023-10-01"),
                discharge_date: None,
            })
            .await
            .unwrap();
        let ventilator = equipment
            .insert(Equipment {
                name: "Ventilator".into(),
                daily_rental_price: dec!(120),
            })
            .await
            .unwrap();
        let care_level_id = care_levels
            .insert(CareLevel {
                name: "ICU".into(),
                daily_rate: dec!(1500),
                default_equipment: vec![ventilator],
            })
            .await
            .unwrap();

        let ledger = StayLedger::new(
            Arc::new(MemoryStore::new()),
            patients,
            care_levels,
            rentals.clone(),
            equipment,
            AuditTrail::new(Arc::new(MemoryStore::new())),
            Arc::new(StaticUser::new("admin")),
        );
        Fixture {
            ledger,
            rentals,
            patient_id,
            care_level_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_stay_day_is_rejected() {
        let fx = fixture().await;
        fx.ledger
            .add_stay(fx.patient_id, date("2023-10-05"), fx.care_level_id)
            .await
            .unwrap();
        let err = fx
            .ledger
            .add_stay(fx.patient_id, date("2023-10-05"), fx.care_level_id)
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_care_level_is_rejected() {
        let fx = fixture().await;
        let err = fx
            .ledger
            .add_stay(fx.patient_id, date("2023-10-05"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::NotFound { kind: "care level", .. }));
    }

    #[tokio::test]
    async fn test_default_equipment_is_seeded_as_fixed_day_charges() {
        let fx = fixture().await;
        fx.ledger
            .add_stay_with_default_equipment(fx.patient_id, date("2023-10-05"), fx.care_level_id)
            .await
            .unwrap();

        let rentals = fx.rentals.all().await.unwrap();
        assert_eq!(rentals.len(), 1);
        match &rentals[0].record.charge {
            RentalCharge::FixedDay { date: d, amount } => {
                assert_eq!(*d, date("2023-10-05"));
                assert_eq!(*amount, dec!(120));
            }
            other => panic!("expected fixed-day charge, got {other:?}"),
        }
    }
}
