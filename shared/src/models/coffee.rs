//! Coffee record, the unit of storage and sync

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::adjustment::AdjustmentRecord;
use super::feedback::{nullable_feedback, CuppingFeedback};
use crate::types::Dose;

/// One bag of beans, entered by hand or scanned from a label.
///
/// Fields this version does not know about are kept in `extra` so that a
/// load/save cycle never drops data written by another app version.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coffee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub origin: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub process: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub cultivar: String,
    /// Metres above sea level, as entered
    #[serde(default, deserialize_with = "string_or_number")]
    pub altitude: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub roaster: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tasting_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub added_date: Option<String>,

    #[serde(default, deserialize_with = "nullable_bool")]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_datetime")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable_bool")]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_datetime")]
    pub favorited_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_dose")]
    pub custom_amount: Option<Dose>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_offset")]
    pub grind_offset: Option<i32>,
    /// Free-form grind override from older app versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_grind: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub custom_temp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub roast_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub initial_grind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub initial_temp: Option<String>,

    #[serde(default, deserialize_with = "nullable_feedback")]
    pub feedback: CuppingFeedback,
    #[serde(default, deserialize_with = "lenient_history")]
    pub feedback_history: Vec<AdjustmentRecord>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Coffee {
    pub fn new(name: impl Into<String>, origin: impl Into<String>, process: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
            process: process.into(),
            ..Default::default()
        }
    }

    /// Copy with every grind/temperature override removed
    pub fn without_overrides(&self) -> Coffee {
        Coffee {
            custom_grind: None,
            grind_offset: None,
            custom_temp: None,
            ..self.clone()
        }
    }

    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        self.added_date.as_deref().and_then(parse_timestamp)
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Text field; `null` and non-text values load as empty
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn nullable_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Option::<Value>::deserialize(deserializer)?, Some(Value::Bool(true))))
}

/// Whole clicks; fractional or string values from older exports are rounded
fn lenient_offset<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let offset = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(offset
        .filter(|o| o.is_finite())
        .map(|o| o.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

fn lenient_dose<'de, D>(deserializer: D) -> Result<Option<Dose>, D::Error>
where
    D: Deserializer<'de>,
{
    let grams = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(grams.and_then(|g| Dose::new(g.round() as i64).ok()))
}

fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<AdjustmentRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };
    let total = entries.len();
    let records: Vec<AdjustmentRecord> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if records.len() != total {
        tracing::warn!(
            dropped = total - records.len(),
            "skipped unreadable adjustment history entries"
        );
    }
    Ok(records)
}
