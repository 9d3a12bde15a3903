use serde::{Deserialize, Serialize};

/// Tunables for the billing core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Shift overlap tolerated without rejection, in minutes. Covers brief
    /// handovers between consecutive shifts; the boundary value itself is
    /// accepted, anything beyond it is rejected.
    pub shift_overlap_tolerance_minutes: i64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            shift_overlap_tolerance_minutes: 20,
        }
    }
}
