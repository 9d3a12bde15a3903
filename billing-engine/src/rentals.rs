use std::sync::Arc;

use audit_trail::{AccessControl, AuditTrail};
use record_store::{RecordStore, Stored};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::{DateRange, Equipment, EquipmentRental, RentalCharge};
use crate::proration;

/// Cost one rental charge contributes to a reporting window.
///
/// Ranged rows are prorated; fixed-day rows contribute exactly their stored
/// amount when their date falls inside the window, with no recomputation.
pub fn cost_in_window(charge: &RentalCharge, window: &DateRange) -> Decimal {
    match charge {
        RentalCharge::Ranged {
            start,
            end,
            daily_rate,
        } => proration::prorate(*start, *end, *daily_rate, window),
        RentalCharge::FixedDay { date, amount } => {
            if window.contains(*date) {
                *amount
            } else {
                Decimal::ZERO
            }
        }
    }
}

/// Owns equipment rental rows for patients.
#[derive(Clone)]
pub struct RentalLedger {
    rentals: Arc<dyn RecordStore<EquipmentRental>>,
    equipment: Arc<dyn RecordStore<Equipment>>,
    audit: AuditTrail,
    auth: Arc<dyn AccessControl>,
}

impl RentalLedger {
    pub fn new(
        rentals: Arc<dyn RecordStore<EquipmentRental>>,
        equipment: Arc<dyn RecordStore<Equipment>>,
        audit: AuditTrail,
        auth: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            rentals,
            equipment,
            audit,
            auth,
        }
    }

    /// Record a rental. The equipment must resolve in the catalog and the
    /// charge must be well-formed before anything is written.
    pub async fn add_rental(
        &self,
        patient_id: Uuid,
        equipment_id: Uuid,
        charge: RentalCharge,
    ) -> BillingResult<Stored<EquipmentRental>> {
        let equipment = self
            .equipment
            .get(equipment_id)
            .await?
            .ok_or(BillingError::not_found("equipment", equipment_id))?;
        validate_charge(&charge)?;

        let rental = EquipmentRental {
            patient_id,
            equipment_id,
            charge,
        };
        let id = self.rentals.insert(rental.clone()).await?;
        self.audit
            .log(
                &self.actor().await,
                "ADD_EQUIPMENT",
                json!({
                    "rental_id": id,
                    "patient_id": patient_id,
                    "equipment": equipment.record.name,
                }),
            )
            .await?;
        Ok(Stored::new(id, rental))
    }

    /// Delete one rental row. Fails with `NotFound` if absent.
    pub async fn remove_rental(&self, rental_id: Uuid) -> BillingResult<()> {
        let stored = self
            .rentals
            .get(rental_id)
            .await?
            .ok_or(BillingError::not_found("equipment rental", rental_id))?;
        self.rentals.delete(rental_id).await?;
        self.audit
            .log(
                &self.actor().await,
                "REMOVE_EQUIPMENT",
                json!({
                    "rental_id": rental_id,
                    "patient_id": stored.record.patient_id,
                    "equipment_id": stored.record.equipment_id,
                }),
            )
            .await?;
        Ok(())
    }

    /// All rental rows for one patient.
    pub async fn rentals_for_patient(
        &self,
        patient_id: Uuid,
    ) -> BillingResult<Vec<Stored<EquipmentRental>>> {
        Ok(self
            .rentals
            .query(&move |r: &EquipmentRental| r.patient_id == patient_id)
            .await?)
    }

    async fn actor(&self) -> String {
        self.auth
            .current_user()
            .await
            .unwrap_or_else(|| "system".to_string())
    }
}

fn validate_charge(charge: &RentalCharge) -> BillingResult<()> {
    match charge {
        RentalCharge::Ranged {
            start,
            end,
            daily_rate,
        } => {
            if let Some(end) = end {
                if end < start {
                    return Err(BillingError::Validation(
                        "rental end date must not precede start date".into(),
                    ));
                }
            }
            if daily_rate.is_sign_negative() {
                return Err(BillingError::Validation(
                    "rental daily rate must not be negative".into(),
                ));
            }
        }
        RentalCharge::FixedDay { amount, .. } => {
            if amount.is_sign_negative() {
                return Err(BillingError::Validation(
                    "rental charge amount must not be negative".into(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_trail::StaticUser;
    use chrono::NaiveDate;
    use record_store::MemoryStore;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn october() -> DateRange {
        DateRange::new(date("2023-10-01"), date("2023-10-31"))
    }

    #[test]
    fn test_ranged_charge_is_prorated() {
        let charge = RentalCharge::Ranged {
            start: date("2023-10-05"),
            end: Some(date("2023-10-08")),
            daily_rate: dec!(50),
        };
        assert_eq!(cost_in_window(&charge, &october()), dec!(200));
    }

    #[test]
    fn test_fixed_day_charge_is_taken_verbatim() {
        let inside = RentalCharge::FixedDay {
            date: date("2023-10-10"),
            amount: dec!(99.50),
        };
        let outside = RentalCharge::FixedDay {
            date: date("2023-11-10"),
            amount: dec!(99.50),
        };
        assert_eq!(cost_in_window(&inside, &october()), dec!(99.50));
        assert_eq!(cost_in_window(&outside, &october()), dec!(0));
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let equipment: Arc<MemoryStore<Equipment>> = Arc::new(MemoryStore::new());
        let equipment_id = equipment
            .insert(Equipment {
                name: "Infusion Pump".into(),
                daily_rental_price: dec!(30),
            })
            .await
            .unwrap();
        let ledger = RentalLedger::new(
            Arc::new(MemoryStore::new()),
            equipment,
            AuditTrail::new(Arc::new(MemoryStore::new())),
            Arc::new(StaticUser::new("admin")),
        );

        let err = ledger
            .add_rental(
                Uuid::new_v4(),
                equipment_id,
                RentalCharge::Ranged {
                    start: date("2023-10-10"),
                    end: Some(date("2023-10-01")),
                    daily_rate: dec!(30),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::Validation(_)));
    }
}
