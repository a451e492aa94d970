//! Common value types used across the brewing core

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::validation::validate_dose;

/// Grind value expressed in the two reference units every grinder profile is
/// calibrated against: Comandante clicks and Fellow Ode steps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrindBase {
    #[serde(with = "rust_decimal::serde::float")]
    pub clicks: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub steps: Decimal,
}

impl GrindBase {
    pub fn new(clicks: Decimal, steps: Decimal) -> Self {
        Self { clicks, steps }
    }

    /// Move by `clicks_delta` clicks; the step unit follows at `steps_per_click`.
    pub fn shifted(self, clicks_delta: i32, steps_per_click: Decimal) -> Self {
        let delta = Decimal::from(clicks_delta);
        Self {
            clicks: self.clicks + delta,
            steps: self.steps + delta * steps_per_click,
        }
    }

    /// Move both units by independently chosen amounts.
    pub fn offset(self, clicks_delta: i32, steps_delta: Decimal) -> Self {
        Self {
            clicks: self.clicks + Decimal::from(clicks_delta),
            steps: self.steps + steps_delta,
        }
    }
}

/// Water temperature range in whole degrees Celsius
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TempRange {
    pub min: i32,
    pub max: i32,
}

impl TempRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn shifted(self, delta: i32) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

impl fmt::Display for TempRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}°C", self.min, self.max)
    }
}

/// Qualitative pour pattern driving the shape of the step schedule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BrewStyle {
    Slow,
    Fruity,
    Standard,
    Controlled,
}

impl fmt::Display for BrewStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrewStyle::Slow => write!(f, "slow"),
            BrewStyle::Fruity => write!(f, "fruity"),
            BrewStyle::Standard => write!(f, "standard"),
            BrewStyle::Controlled => write!(f, "controlled"),
        }
    }
}

/// Coffee dose in grams. Construction validates the range, so a negative or
/// zero dose can never reach the pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "u32")]
pub struct Dose(u32);

impl Dose {
    pub const DEFAULT_GRAMS: u32 = 15;

    pub fn new(grams: i64) -> Result<Self, EngineError> {
        validate_dose(grams).map_err(EngineError::InvalidDose)?;
        Ok(Self(grams as u32))
    }

    pub fn grams(self) -> u32 {
        self.0
    }

    pub fn as_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl Default for Dose {
    fn default() -> Self {
        Self(Self::DEFAULT_GRAMS)
    }
}

impl TryFrom<i64> for Dose {
    type Error = EngineError;

    fn try_from(grams: i64) -> Result<Self, Self::Error> {
        Self::new(grams)
    }
}

impl From<Dose> for u32 {
    fn from(dose: Dose) -> Self {
        dose.0
    }
}

impl fmt::Display for Dose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g", self.0)
    }
}

/// Round half away from zero, the way the UI has always rounded gram targets.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to a whole number of grams (never negative).
pub fn round_grams(value: Decimal) -> u32 {
    round_half_up(value, 0).to_u32().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grind_base_shift_scales_steps() {
        let base = GrindBase::new(Decimal::from(22), Decimal::new(35, 1));
        let shifted = base.shifted(-2, Decimal::new(25, 2));
        assert_eq!(shifted.clicks, Decimal::from(20));
        assert_eq!(shifted.steps, Decimal::new(30, 1));
    }

    #[test]
    fn test_temp_range_display() {
        assert_eq!(TempRange::new(92, 93).to_string(), "92-93°C");
        assert_eq!(TempRange::new(92, 93).shifted(-1).to_string(), "91-92°C");
    }

    #[test]
    fn test_dose_rejects_out_of_range() {
        assert!(Dose::new(15).is_ok());
        assert!(Dose::new(0).is_err());
        assert!(Dose::new(-5).is_err());
        assert!(Dose::new(101).is_err());
    }

    #[test]
    fn test_dose_deserialization_validates() {
        let dose: Dose = serde_json::from_str("18").unwrap();
        assert_eq!(dose.grams(), 18);
        assert!(serde_json::from_str::<Dose>("-3").is_err());
        assert_eq!(serde_json::to_string(&dose).unwrap(), "18");
    }

    #[test]
    fn test_round_grams_half_up() {
        assert_eq!(round_grams(Decimal::new(525, 1)), 53);
        assert_eq!(round_grams(Decimal::new(524, 1)), 52);
        assert_eq!(round_grams(Decimal::from(240)), 240);
        assert_eq!(round_grams(Decimal::from(-3)), 0);
    }
}
