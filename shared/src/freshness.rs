//! Roast freshness
//!
//! Days since roast are counted against the environment's `as_of` day, so
//! the result is reproducible for a given date.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RoastStage {
    /// Under a week; still degassing
    Resting,
    Sweet,
    /// Thirty days and older
    Fading,
    /// No usable roast date
    Unknown,
}

impl RoastStage {
    pub fn from_days(days: i64) -> RoastStage {
        if days < 7 {
            RoastStage::Resting
        } else if days < 30 {
            RoastStage::Sweet
        } else {
            RoastStage::Fading
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            RoastStage::Resting => Some("Still Resting"),
            RoastStage::Sweet => Some("Sweet Spot"),
            RoastStage::Fading => Some("Fading"),
            RoastStage::Unknown => None,
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_roast_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

pub fn days_since_roast(roast_date: Option<&str>, as_of: Option<NaiveDate>) -> Option<i64> {
    let roasted = parse_roast_date(roast_date?)?;
    Some((as_of? - roasted).num_days())
}

pub fn roast_stage(roast_date: Option<&str>, as_of: Option<NaiveDate>) -> (RoastStage, Option<i64>) {
    match days_since_roast(roast_date, as_of) {
        Some(days) => (RoastStage::from_days(days), Some(days)),
        None => (RoastStage::Unknown, None),
    }
}

/// Fade between two stages near a boundary, for the badge tint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageTransition {
    pub from: RoastStage,
    pub to: RoastStage,
    /// 0.0 at the start of the window, approaching 1.0 at its end
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessBadge {
    pub stage: RoastStage,
    pub label: String,
    pub days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<StageTransition>,
}

/// Badge for the coffee card; `None` when no roast date is known.
pub fn freshness_badge(roast_date: Option<&str>, as_of: Option<NaiveDate>) -> Option<FreshnessBadge> {
    let days = days_since_roast(roast_date, as_of)?;
    let stage = RoastStage::from_days(days);
    let label = stage.label()?.to_string();

    // Days 7-9 blend out of resting, days 25-29 blend toward fading
    let transition = match days {
        7..=9 => Some(StageTransition {
            from: RoastStage::Resting,
            to: RoastStage::Sweet,
            progress: (days - 7) as f64 / 3.0,
        }),
        25..=29 => Some(StageTransition {
            from: RoastStage::Sweet,
            to: RoastStage::Fading,
            progress: (days - 25) as f64 / 5.0,
        }),
        _ => None,
    };

    Some(FreshnessBadge { stage, label, days, transition })
}
