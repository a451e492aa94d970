//! Property tests for the values the sync API accepts
//!
//! Covers:
//! - Account and device header validation
//! - Grinder preference keys (current, legacy, unknown)
//! - Water hardness bounds
//! - Deduplication of uploaded coffee lists

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use dripmate_shared::sync::dedupe_coffees;
use dripmate_shared::validation::{
    validate_device_id, validate_password, validate_username, validate_water_hardness,
};
use dripmate_shared::Grinder;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid usernames (3-32 chars from the allowed alphabet)
fn username_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.-]{3,32}"
}

/// Generate usernames containing at least one forbidden character
fn invalid_username_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{2,10}", "[ @/#!]", "[a-z]{1,10}").prop_map(|(a, bad, b)| format!("{}{}{}", a, bad, b))
}

/// Generate device ids as the app creates them
fn device_id_strategy() -> impl Strategy<Value = String> {
    "device-[0-9a-f]{8}-[0-9a-f]{4}"
}

/// Generate hardness readings in tenths of °dH
fn hardness_tenths_strategy() -> impl Strategy<Value = i64> {
    -100i64..700
}

/// Generate an uploaded coffee record with an explicit id
fn coffee_json_strategy() -> impl Strategy<Value = Value> {
    ("[a-z]{1,3}", "[A-Z][a-z]{2,8}", "[A-Z][a-z]{3,8}").prop_map(|(id, name, origin)| {
        json!({
            "id": format!("coffee-{}", id),
            "name": name,
            "origin": origin,
            "process": "Washed",
            "feedbackHistory": [],
        })
    })
}

// ============================================================================
// Account Validation Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_valid_usernames_accepted(username in username_strategy()) {
        prop_assert!(validate_username(&username).is_ok());
    }

    #[test]
    fn prop_invalid_usernames_rejected(username in invalid_username_strategy()) {
        prop_assert!(validate_username(&username).is_err());
    }

    #[test]
    fn prop_short_passwords_rejected(password in "[a-z]{0,7}") {
        prop_assert!(validate_password(&password).is_err());
    }

    #[test]
    fn prop_device_ids_accepted(device_id in device_id_strategy()) {
        prop_assert!(validate_device_id(&device_id).is_ok());
    }
}

#[test]
fn test_blank_device_id_rejected() {
    assert!(validate_device_id("").is_err());
    assert!(validate_device_id("   ").is_err());
    assert!(validate_device_id(&"x".repeat(129)).is_err());
}

// ============================================================================
// Preference Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_water_hardness_bounds(tenths in hardness_tenths_strategy()) {
        let value = Decimal::new(tenths, 1);
        let accepted = validate_water_hardness(value).is_ok();
        prop_assert_eq!(accepted, tenths > 0 && tenths <= 500);
    }

    #[test]
    fn prop_unknown_grinder_keys_migrate_to_default(key in "[a-z]{3,12}") {
        let known = Grinder::ALL.iter().any(|g| g.key() == key)
            || matches!(key.as_str(), "fellow" | "comandante" | "timemore");
        prop_assume!(!known);
        prop_assert!(Grinder::resolve(&key).is_none());
        prop_assert_eq!(Grinder::migrate(&key), Grinder::FellowGen2);
    }
}

#[test]
fn test_grinder_keys_round_trip() {
    for grinder in Grinder::ALL {
        assert_eq!(Grinder::resolve(grinder.key()), Some(grinder));
        assert_eq!(Grinder::migrate(grinder.key()), grinder);
    }
}

#[test]
fn test_legacy_grinder_keys() {
    assert_eq!(Grinder::resolve("fellow"), Some(Grinder::FellowGen2));
    assert_eq!(Grinder::resolve("comandante"), Some(Grinder::ComandanteMk3));
    assert_eq!(Grinder::resolve("timemore"), Some(Grinder::TimemoreS3));
}

// ============================================================================
// Upload Deduplication Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_uploaded_ids_are_unique(raw in prop::collection::vec(coffee_json_strategy(), 0..20)) {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let expected: std::collections::HashSet<String> = raw
            .iter()
            .filter_map(|c| c["id"].as_str().map(str::to_string))
            .collect();

        let coffees = dedupe_coffees(raw, "api-upload", now);
        let ids: Vec<String> = coffees.iter().filter_map(|c| c.id.clone()).collect();
        let unique: std::collections::HashSet<String> = ids.iter().cloned().collect();

        prop_assert_eq!(ids.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn prop_first_record_wins(name_a in "[A-Z][a-z]{3,8}", name_b in "[A-Z][a-z]{3,8}") {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let raw = vec![
            json!({"id": "coffee-same", "name": name_a.clone()}),
            json!({"id": "coffee-same", "name": name_b}),
        ];
        let coffees = dedupe_coffees(raw, "api-upload", now);
        prop_assert_eq!(coffees.len(), 1);
        prop_assert_eq!(&coffees[0].name, &name_a);
    }
}

#[test]
fn test_non_object_records_are_dropped() {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let raw = vec![json!("nope"), json!(42), json!({"name": "Kochere"})];
    let coffees = dedupe_coffees(raw, "api-upload", now);
    assert_eq!(coffees.len(), 1);
    assert_eq!(coffees[0].name, "Kochere");
}
