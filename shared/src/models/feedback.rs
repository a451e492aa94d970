//! Cupping-style tasting feedback stored on each coffee

use serde::{Deserialize, Deserializer, Serialize};

/// Three-step sensory scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TasteLevel {
    Low,
    Balanced,
    High,
}

impl TasteLevel {
    pub fn parse(value: &str) -> Option<TasteLevel> {
        match value {
            "low" => Some(TasteLevel::Low),
            "balanced" => Some(TasteLevel::Balanced),
            "high" => Some(TasteLevel::High),
            _ => None,
        }
    }

    /// Slider position (0-100) to level: `<= 33` low, `>= 67` high.
    pub fn from_slider(value: f64) -> TasteLevel {
        if value <= 33.0 {
            TasteLevel::Low
        } else if value >= 67.0 {
            TasteLevel::High
        } else {
            TasteLevel::Balanced
        }
    }

    pub fn slider_value(self) -> u8 {
        match self {
            TasteLevel::Low => 0,
            TasteLevel::Balanced => 50,
            TasteLevel::High => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SensoryCategory {
    Bitterness,
    Sweetness,
    Acidity,
    Body,
}

impl SensoryCategory {
    pub const ALL: [SensoryCategory; 4] = [
        SensoryCategory::Bitterness,
        SensoryCategory::Sweetness,
        SensoryCategory::Acidity,
        SensoryCategory::Body,
    ];
}

/// Tasting feedback for one coffee. Tags from the older
/// extraction/taste/body scheme are dropped on load.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CuppingFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_level")]
    pub bitterness: Option<TasteLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_level")]
    pub sweetness: Option<TasteLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_level")]
    pub acidity: Option<TasteLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_level")]
    pub body: Option<TasteLevel>,
}

impl CuppingFeedback {
    pub fn get(&self, category: SensoryCategory) -> Option<TasteLevel> {
        match category {
            SensoryCategory::Bitterness => self.bitterness,
            SensoryCategory::Sweetness => self.sweetness,
            SensoryCategory::Acidity => self.acidity,
            SensoryCategory::Body => self.body,
        }
    }

    /// Set a category; returns `true` when the stored value changed.
    pub fn set(&mut self, category: SensoryCategory, level: TasteLevel) -> bool {
        let slot = match category {
            SensoryCategory::Bitterness => &mut self.bitterness,
            SensoryCategory::Sweetness => &mut self.sweetness,
            SensoryCategory::Acidity => &mut self.acidity,
            SensoryCategory::Body => &mut self.body,
        };
        let changed = *slot != Some(level);
        *slot = Some(level);
        changed
    }

    pub fn is_empty(&self) -> bool {
        SensoryCategory::ALL.iter().all(|c| self.get(*c).is_none())
    }

    /// No category set, or every set category is balanced
    pub fn is_all_balanced(&self) -> bool {
        SensoryCategory::ALL
            .iter()
            .all(|c| matches!(self.get(*c), None | Some(TasteLevel::Balanced)))
    }

    pub fn clear(&mut self) {
        *self = CuppingFeedback::default();
    }
}

fn lenient_level<'de, D>(deserializer: D) -> Result<Option<TasteLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(TasteLevel::parse))
}

/// Accepts `null` (or garbage) for the whole feedback map.
pub(crate) fn nullable_feedback<'de, D>(deserializer: D) -> Result<CuppingFeedback, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}
