//! Adjustment history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ManualAdjustKind {
    Grind,
    Temp,
}

/// Before/after snapshot written on every grind or temperature change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRecord {
    pub timestamp: DateTime<Utc>,
    pub previous_grind: String,
    pub previous_temp: String,
    pub new_grind: String,
    pub new_temp: String,
    #[serde(default)]
    pub grind_offset_delta: i32,
    #[serde(default)]
    pub custom_temp_applied: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_adjust: Option<ManualAdjustKind>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reset_to_initial: bool,
}
