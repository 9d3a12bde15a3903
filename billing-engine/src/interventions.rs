use std::sync::Arc;

use audit_trail::{AccessControl, AuditTrail};
use chrono::NaiveDate;
use record_store::{RecordStore, Stored};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::{DateRange, InterventionEvent, InterventionType};

/// An intervention event joined with its catalog entry.
pub type ResolvedEvent = (Stored<InterventionEvent>, InterventionType);

/// Owns one-off bonus events per staff member per patient per date.
/// Point-in-time and unconstrained in quantity per day; no overlap concept.
#[derive(Clone)]
pub struct InterventionLedger {
    events: Arc<dyn RecordStore<InterventionEvent>>,
    catalog: Arc<dyn RecordStore<InterventionType>>,
    audit: AuditTrail,
    auth: Arc<dyn AccessControl>,
}

impl InterventionLedger {
    pub fn new(
        events: Arc<dyn RecordStore<InterventionEvent>>,
        catalog: Arc<dyn RecordStore<InterventionType>>,
        audit: AuditTrail,
        auth: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            events,
            catalog,
            audit,
            auth,
        }
    }

    /// Record a performed intervention. The type must resolve in the shared
    /// catalog before anything is written.
    pub async fn add_event(
        &self,
        staff_id: Uuid,
        patient_id: Uuid,
        date: NaiveDate,
        intervention_type_id: Uuid,
    ) -> BillingResult<Stored<InterventionEvent>> {
        let kind = self
            .catalog
            .get(intervention_type_id)
            .await?
            .ok_or(BillingError::not_found(
                "intervention type",
                intervention_type_id,
            ))?;

        let event = InterventionEvent {
            staff_id,
            patient_id,
            date,
            intervention_type_id,
        };
        let id = self.events.insert(event.clone()).await?;
        self.audit
            .log(
                &self.actor().await,
                "ADD_INTERVENTION",
                json!({
                    "event_id": id,
                    "staff_id": staff_id,
                    "patient_id": patient_id,
                    "date": date,
                    "intervention": kind.record.name,
                }),
            )
            .await?;
        Ok(Stored::new(id, event))
    }

    pub async fn remove_event(&self, event_id: Uuid) -> BillingResult<()> {
        let stored = self
            .events
            .get(event_id)
            .await?
            .ok_or(BillingError::not_found("intervention event", event_id))?;
        self.events.delete(event_id).await?;
        self.audit
            .log(
                &self.actor().await,
                "REMOVE_INTERVENTION",
                json!({
                    "event_id": event_id,
                    "staff_id": stored.record.staff_id,
                    "date": stored.record.date,
                }),
            )
            .await?;
        Ok(())
    }

    /// Sum of catalog bonus amounts for one staff member's events in `window`.
    pub async fn bonus_in_window(&self, staff_id: Uuid, window: &DateRange) -> BillingResult<Decimal> {
        let events = self.events_in_window(staff_id, window).await?;
        Ok(events.iter().map(|(_, kind)| kind.bonus_amount).sum())
    }

    /// One staff member's events in `window`, joined with the catalog for
    /// itemized export. Events whose type no longer resolves are skipped and
    /// logged; the stores are not transactionally joined.
    pub async fn events_in_window(
        &self,
        staff_id: Uuid,
        window: &DateRange,
    ) -> BillingResult<Vec<ResolvedEvent>> {
        let window = *window;
        let events = self
            .events
            .query(&move |e: &InterventionEvent| e.staff_id == staff_id && window.contains(e.date))
            .await?;
        self.resolve(events).await
    }

    /// Events attributed to one patient in `window`, joined with the catalog.
    pub async fn events_for_patient(
        &self,
        patient_id: Uuid,
        window: &DateRange,
    ) -> BillingResult<Vec<ResolvedEvent>> {
        let window = *window;
        let events = self
            .events
            .query(&move |e: &InterventionEvent| {
                e.patient_id == patient_id && window.contains(e.date)
            })
            .await?;
        self.resolve(events).await
    }

    /// Delete every event owned by one staff member (roster cascade).
    pub async fn remove_all_for_staff(&self, staff_id: Uuid) -> BillingResult<()> {
        let owned = self
            .events
            .query(&|e: &InterventionEvent| e.staff_id == staff_id)
            .await?;
        for event in owned {
            self.events.delete(event.id).await?;
        }
        Ok(())
    }

    async fn resolve(
        &self,
        events: Vec<Stored<InterventionEvent>>,
    ) -> BillingResult<Vec<ResolvedEvent>> {
        let mut resolved = Vec::with_capacity(events.len());
        for event in events {
            match self.catalog.get(event.record.intervention_type_id).await? {
                Some(kind) => resolved.push((event, kind.record)),
                None => warn!(
                    event_id = %event.id,
                    type_id = %event.record.intervention_type_id,
                    "intervention type missing from catalog, skipping event"
                ),
            }
        }
        Ok(resolved)
    }

    async fn actor(&self) -> String {
        self.auth
            .current_user()
            .await
            .unwrap_or_else(|| "system".to_string())
    }
}
