//! Ambient brewing context shared by every coffee

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::equipment::{BrewMethod, Grinder};
use super::water::WaterHardness;
use crate::types::Dose;

/// User-level settings that every recommendation is computed against.
/// Passed explicitly into each call; the core never reads globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default)]
    pub preferred_grinder: Grinder,
    #[serde(default)]
    pub preferred_method: BrewMethod,
    #[serde(default)]
    pub manual_water_hardness: Option<WaterHardness>,
    /// Value derived from the user's postal code
    #[serde(default)]
    pub api_water_hardness: Option<WaterHardness>,
    #[serde(default)]
    pub default_dose: Dose,
    /// Day the roast age is measured against
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl Environment {
    /// Manual override takes priority over the postal-code value.
    pub fn active_water_hardness(&self) -> Option<&WaterHardness> {
        self.manual_water_hardness
            .as_ref()
            .or(self.api_water_hardness.as_ref())
    }

    pub fn with_grinder(mut self, grinder: Grinder) -> Self {
        self.preferred_grinder = grinder;
        self
    }

    pub fn with_method(mut self, method: BrewMethod) -> Self {
        self.preferred_method = method;
        self
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }
}
