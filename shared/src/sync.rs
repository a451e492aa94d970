//! Coffee list normalisation for backend sync
//!
//! Remote lists can carry duplicates (retries, two devices saving the same
//! bag) and records from older app versions without ids or history. Every
//! list coming off the wire goes through [`dedupe_coffees`] before use.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::models::Coffee;

/// Deterministic id for a record that arrived without one.
///
/// Built from the identifying fields plus the list position, so the same
/// record gets the same id on every device.
pub fn stable_coffee_id(coffee: &Coffee, index: usize, now: DateTime<Utc>) -> String {
    let date = stable_date(coffee)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));
    let seed = format!(
        "{}|{}|{}|{}|{}",
        lower(&coffee.name),
        lower(&coffee.roaster),
        lower(&coffee.origin),
        date,
        index
    );
    let safe: String = seed
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '|' | ':' | '-'))
        .collect();
    format!("coffee-{safe}")
}

fn lower(value: &str) -> String {
    value.trim().to_lowercase()
}

/// `addedDate`, or the save/create stamp older versions wrote instead
fn stable_date(coffee: &Coffee) -> Option<String> {
    if let Some(added) = coffee.added_date.as_deref() {
        if !added.trim().is_empty() {
            return Some(added.trim().to_string());
        }
    }
    ["savedAt", "createdAt"]
        .iter()
        .filter_map(|key| coffee.extra.get(*key).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

fn raw_id(raw: &Value) -> Option<String> {
    match raw.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse one raw record and make sure it has an id. Non-object records
/// and records that fail to parse yield `None`.
pub fn normalize_coffee(raw: Value, index: usize, now: DateTime<Utc>) -> Option<Coffee> {
    let id = raw_id(&raw);
    let Value::Object(mut fields) = raw else {
        return None;
    };
    fields.remove("id");

    let mut coffee: Coffee = match serde_json::from_value(Value::Object(fields)) {
        Ok(coffee) => coffee,
        Err(err) => {
            tracing::warn!(index, error = %err, "skipping unreadable coffee record");
            return None;
        }
    };
    coffee.id = Some(id.unwrap_or_else(|| stable_coffee_id(&coffee, index, now)));
    Some(coffee)
}

fn fallback_key(coffee: &Coffee) -> String {
    let date = coffee
        .added_date
        .clone()
        .or_else(|| coffee.extra.get("savedAt").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default();
    format!(
        "{}|{}|{}|{}",
        lower(&coffee.name),
        lower(&coffee.roaster),
        lower(&coffee.origin),
        date
    )
}

/// Normalise a raw list and drop duplicates, keeping the first occurrence.
///
/// Records that came with an id are keyed by it; the rest by
/// name, roaster, origin and added date.
pub fn dedupe_coffees(raw: Vec<Value>, source: &str, now: DateTime<Utc>) -> Vec<Coffee> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(raw.len());
    let mut removed = 0usize;

    for (index, record) in raw.into_iter().enumerate() {
        let had_id = raw_id(&record).is_some();
        let Some(coffee) = normalize_coffee(record, index, now) else {
            continue;
        };
        let key = if had_id {
            format!("id:{}", coffee.id.as_deref().unwrap_or_default())
        } else {
            format!("key:{}", fallback_key(&coffee))
        };
        if !seen.insert(key) {
            removed += 1;
            continue;
        }
        deduped.push(coffee);
    }

    if removed > 0 {
        tracing::warn!(removed, source, "deduplication removed duplicate coffee entries");
    }
    deduped
}

/// Already-typed variant used when re-saving a local list
pub fn dedupe_local(coffees: Vec<Coffee>, source: &str, now: DateTime<Utc>) -> Vec<Coffee> {
    let raw = coffees
        .into_iter()
        .filter_map(|c| serde_json::to_value(c).ok())
        .collect();
    dedupe_coffees(raw, source, now)
}

/// `true` when the list is empty or at least one record carries a
/// `feedbackHistory` array.
pub fn has_history_coverage(raw: &[Value]) -> bool {
    raw.is_empty()
        || raw
            .iter()
            .any(|c| matches!(c.get("feedbackHistory"), Some(Value::Array(_))))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum SyncDecision {
    UseRemote { coffees: Vec<Coffee> },
    KeepLocal { reason: String },
}

/// Decide whether a freshly fetched remote list may replace local data.
///
/// A non-empty remote list where no record has history looks like it was
/// written by an old client; it must not overwrite a local library.
pub fn reconcile_remote(remote_raw: Vec<Value>, local: &[Coffee], now: DateTime<Utc>) -> SyncDecision {
    let covered = has_history_coverage(&remote_raw);
    let remote = dedupe_coffees(remote_raw, "reconcile-remote", now);

    if !remote.is_empty() && !covered && !local.is_empty() {
        tracing::warn!(
            remote = remote.len(),
            local = local.len(),
            "remote coffees miss feedbackHistory, keeping local data"
        );
        return SyncDecision::KeepLocal {
            reason: "Remote coffees seem to miss feedbackHistory. Keeping local data to avoid accidental overwrite."
                .to_string(),
        };
    }
    SyncDecision::UseRemote { coffees: remote }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_normalize_adds_defaults_and_id() {
        let coffee = normalize_coffee(
            json!({"name": "Test Coffee", "feedback": null, "feedbackHistory": null}),
            0,
            now(),
        )
        .unwrap();
        let id = coffee.id.unwrap();
        assert!(id.starts_with("coffee-"));
        assert!(coffee.feedback.is_empty());
        assert!(coffee.feedback_history.is_empty());
    }

    #[test]
    fn test_stable_id_is_deterministic() {
        let raw = json!({"name": "Kochere ", "roaster": "Bonanza", "origin": "Ethiopia", "addedDate": "2024-01-01T00:00:00.000Z"});
        let a = normalize_coffee(raw.clone(), 3, now()).unwrap();
        let b = normalize_coffee(raw, 3, now()).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(
            a.id.as_deref(),
            Some("coffee-kochere|bonanza|ethiopia|2024-01-0100:00:00000|3")
        );
    }

    #[test]
    fn test_numeric_id_is_kept() {
        let coffee = normalize_coffee(json!({"id": 42, "name": "A"}), 0, now()).unwrap();
        assert_eq!(coffee.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_dedupe_by_id() {
        let list = vec![
            json!({"id": "coffee-1", "name": "A"}),
            json!({"id": "coffee-1", "name": "A duplicate"}),
            json!({"id": "coffee-2", "name": "B"}),
        ];
        let deduped = dedupe_coffees(list, "test", now());
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "A");
    }

    #[test]
    fn test_dedupe_by_fallback_key() {
        let list = vec![
            json!({"name": "A", "roaster": "R", "origin": "O", "addedDate": "2024-01-01T00:00:00.000Z"}),
            json!({"name": "a", "roaster": "R", "origin": "O", "addedDate": "2024-01-01T00:00:00.000Z"}),
            json!({"name": "B", "roaster": "R2", "origin": "O2", "addedDate": "2024-01-02T00:00:00.000Z"}),
        ];
        assert_eq!(dedupe_coffees(list, "test", now()).len(), 2);
    }

    #[test]
    fn test_non_objects_are_skipped() {
        let list = vec![json!(null), json!("junk"), json!({"name": "A"})];
        assert_eq!(dedupe_coffees(list, "test", now()).len(), 1);
    }

    #[test]
    fn test_records_with_null_fields_survive_dedupe() {
        let list = vec![
            json!({"id": "c1", "name": "Scanned", "origin": "Kenya", "process": "Washed",
                   "roaster": null, "tastingNotes": null, "feedbackHistory": []}),
            json!({"id": "c2", "name": "Favourite", "origin": "Peru", "process": "Natural",
                   "favorite": null, "deleted": null, "cultivar": null, "feedbackHistory": []}),
        ];
        let deduped = dedupe_coffees(list, "test", now());
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id.as_deref(), Some("c1"));
        assert_eq!(deduped[0].roaster, "");
        assert_eq!(deduped[1].id.as_deref(), Some("c2"));
        assert!(!deduped[1].favorite);
    }

    #[test]
    fn test_history_coverage() {
        assert!(has_history_coverage(&[]));
        assert!(!has_history_coverage(&[json!({"name": "A"})]));
        assert!(has_history_coverage(&[json!({"name": "A"}), json!({"feedbackHistory": []})]));
    }

    #[test]
    fn test_reconcile_keeps_local_when_remote_lacks_history() {
        let local = vec![Coffee::new("Local", "Kenya", "Washed")];
        let decision = reconcile_remote(vec![json!({"id": "r1", "name": "Remote"})], &local, now());
        assert!(matches!(decision, SyncDecision::KeepLocal { .. }));
    }

    #[test]
    fn test_reconcile_uses_remote() {
        let local = vec![Coffee::new("Local", "Kenya", "Washed")];
        let remote = vec![
            json!({"id": "r1", "name": "Remote", "feedbackHistory": []}),
            json!({"id": "r1", "name": "Remote again", "feedbackHistory": []}),
        ];
        match reconcile_remote(remote, &local, now()) {
            SyncDecision::UseRemote { coffees } => assert_eq!(coffees.len(), 1),
            other => panic!("unexpected decision {other:?}"),
        }

        // nothing local to protect
        let decision = reconcile_remote(vec![json!({"name": "Remote"})], &[], now());
        assert!(matches!(decision, SyncDecision::UseRemote { .. }));

        // an empty remote list always wins
        let decision = reconcile_remote(Vec::new(), &local, now());
        assert_eq!(decision, SyncDecision::UseRemote { coffees: Vec::new() });
    }
}
