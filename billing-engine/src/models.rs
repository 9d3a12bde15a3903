use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A doctor or nurse on the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub name: String,
    pub role: StaffRole,
    pub hourly_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StaffRole {
    Doctor,
    Nurse { level: NurseLevel },
}

impl StaffRole {
    pub fn kind(&self) -> StaffKind {
        match self {
            StaffRole::Doctor => StaffKind::Doctor,
            StaffRole::Nurse { .. } => StaffKind::Nurse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffKind {
    Doctor,
    Nurse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NurseLevel {
    #[serde(rename = "ICU")]
    Icu,
    #[serde(rename = "Medium_ICU")]
    MediumIcu,
}

/// A contiguous interval during which one staff member is attributed to care
/// for (optionally) one patient. Never mutated after creation, only deleted.
/// Hours are always derived from the timestamp pair, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub staff_id: Uuid,
    /// May be absent in legacy data.
    pub patient_id: Option<Uuid>,
    pub arrival: NaiveDateTime,
    pub leave: NaiveDateTime,
}

impl Shift {
    /// Duration in hours, rounded to two decimals per shift (the rounding
    /// happens per shift before summation, matching the payroll sheets).
    pub fn hours(&self) -> Decimal {
        let seconds = (self.leave - self.arrival).num_seconds();
        (Decimal::from(seconds) / Decimal::from(3600)).round_dp(2)
    }

    pub fn span(&self) -> TimeSpan {
        TimeSpan {
            start: self.arrival,
            end: self.leave,
        }
    }
}

/// A closed datetime interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A closed calendar-date reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Shared reference catalog of bonus-triggering clinical actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionType {
    pub name: String,
    pub bonus_amount: Decimal,
}

/// One performed intervention: staff member, patient, calendar date, and the
/// catalog entry that determines the bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionEvent {
    pub staff_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub intervention_type_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub admission_date: NaiveDate,
    /// `None` means still admitted; reporting substitutes the window end.
    pub discharge_date: Option<NaiveDate>,
}

/// A daily-rate tier applied per recorded stay-day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareLevel {
    pub name: String,
    pub daily_rate: Decimal,
    /// Equipment seeded onto a new stay recorded at this level.
    #[serde(default)]
    pub default_equipment: Vec<Uuid>,
}

/// One billed stay-day. At most one per (patient, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StayRecord {
    pub patient_id: Uuid,
    pub stay_date: NaiveDate,
    pub care_level_id: Uuid,
}

/// Billable item category. Closed set; each category maps to its own store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Labs,
    Drugs,
    Radiology,
    Consultations,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 4] = [
        ItemCategory::Labs,
        ItemCategory::Drugs,
        ItemCategory::Radiology,
        ItemCategory::Consultations,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemCategory::Labs => "Labs",
            ItemCategory::Drugs => "Drugs",
            ItemCategory::Radiology => "Radiology",
            ItemCategory::Consultations => "Consultations",
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog entry for an itemized service (lab, drug, radiology study,
/// consultation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillableItem {
    pub category: ItemCategory,
    pub name: String,
    pub unit_price: Decimal,
}

/// One itemized service charged to a patient on a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCharge {
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub item_id: Uuid,
    pub quantity: u32,
}

/// Rentable equipment catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub daily_rental_price: Decimal,
}

/// How a rental is billed. Two representations coexist in the data:
/// date-ranged rows prorated against the reporting window, and one-row-per
/// billed-day fixed charges that contribute exactly their stored amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "billing", rename_all = "snake_case")]
pub enum RentalCharge {
    Ranged {
        start: NaiveDate,
        /// `None` means open-ended; proration caps it at the window end.
        end: Option<NaiveDate>,
        daily_rate: Decimal,
    },
    FixedDay {
        date: NaiveDate,
        amount: Decimal,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentRental {
    pub patient_id: Uuid,
    pub equipment_id: Uuid,
    pub charge: RentalCharge,
}

/// Snapshot of a computed salary taken when payroll is run for a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub staff_id: Uuid,
    pub period: DateRange,
    pub total_hours: Decimal,
    pub total_bonus: Decimal,
    pub total_salary: Decimal,
    pub paid: bool,
    pub paid_date: Option<NaiveDateTime>,
}
