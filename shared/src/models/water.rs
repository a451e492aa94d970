//! Water hardness models (German °dH scale)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hardness category by German standard thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WaterHardnessCategory {
    VerySoft,
    Soft,
    Medium,
    Hard,
    VeryHard,
}

impl WaterHardnessCategory {
    /// <7 very soft, <14 soft, <21 medium, <28 hard, else very hard
    pub fn from_dh(value: Decimal) -> Self {
        if value < Decimal::from(7) {
            WaterHardnessCategory::VerySoft
        } else if value < Decimal::from(14) {
            WaterHardnessCategory::Soft
        } else if value < Decimal::from(21) {
            WaterHardnessCategory::Medium
        } else if value < Decimal::from(28) {
            WaterHardnessCategory::Hard
        } else {
            WaterHardnessCategory::VeryHard
        }
    }

    pub fn is_soft(self) -> bool {
        matches!(self, WaterHardnessCategory::VerySoft | WaterHardnessCategory::Soft)
    }

    pub fn is_hard(self) -> bool {
        matches!(self, WaterHardnessCategory::Hard | WaterHardnessCategory::VeryHard)
    }

    pub fn label_de(self) -> &'static str {
        match self {
            WaterHardnessCategory::VerySoft => "sehr weich",
            WaterHardnessCategory::Soft => "weich",
            WaterHardnessCategory::Medium => "mittel",
            WaterHardnessCategory::Hard => "hart",
            WaterHardnessCategory::VeryHard => "sehr hart",
        }
    }

    pub fn label_en(self) -> &'static str {
        match self {
            WaterHardnessCategory::VerySoft => "very soft",
            WaterHardnessCategory::Soft => "soft",
            WaterHardnessCategory::Medium => "medium",
            WaterHardnessCategory::Hard => "hard",
            WaterHardnessCategory::VeryHard => "very hard",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WaterHardnessCategory::VerySoft => {
                "Sehr weiches Wasser - feinerer Mahlgrad und höhere Temperatur empfohlen"
            }
            WaterHardnessCategory::Soft => "Weiches Wasser - leicht feinerer Mahlgrad empfohlen",
            WaterHardnessCategory::Medium => {
                "Mittelhartes Wasser - Standard-Einstellungen funktionieren gut"
            }
            WaterHardnessCategory::Hard => {
                "Hartes Wasser - gröberer Mahlgrad und niedrigere Temperatur empfohlen"
            }
            WaterHardnessCategory::VeryHard => {
                "Sehr hartes Wasser - deutlich gröberer Mahlgrad, Filterung empfohlen"
            }
        }
    }
}

/// A water hardness reading, either looked up from a postal code or entered
/// by hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WaterHardness {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<WaterHardnessCategory>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub is_estimate: bool,
    #[serde(default)]
    pub is_manual: bool,
}

impl WaterHardness {
    /// Stored category, or one derived from the value.
    pub fn category(&self) -> WaterHardnessCategory {
        self.category
            .unwrap_or_else(|| WaterHardnessCategory::from_dh(self.value))
    }
}
