//! WebAssembly bindings for Dripmate
//!
//! Exposes the brewing core to the browser. Values cross the boundary as
//! JSON strings in the same camelCase shape the app keeps in local storage.
//! Each export is a thin wrapper over a plain function returning
//! `Result<String, String>` so the logic can be tested natively.

use std::cell::RefCell;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use dripmate_shared::freshness::{freshness_badge, parse_roast_date};
use dripmate_shared::history::describe;
use dripmate_shared::schedule::BrewStep;
use dripmate_shared::sync::{dedupe_coffees, reconcile_remote};
use dripmate_shared::timer::TimerRegistry;
use dripmate_shared::water::{lookup_postal_code, manual_hardness};
use dripmate_shared::{
    apply_suggestion, compute_brew_parameters, compute_suggestion, migrate_initial_values,
    record_manual_adjustment, reset_adjustments, AdjustmentProposal, AdjustmentRecord, Coffee,
    Environment, Grinder, ManualAdjustment,
};

thread_local! {
    static TIMERS: RefCell<TimerRegistry> = RefCell::new(TimerRegistry::default());
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("☕ Dripmate brewing core loaded"));
}

fn current_time() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(js_sys::Date::now() as i64)
        .single()
        .unwrap_or_default()
}

fn to_js(result: Result<String, String>) -> Result<String, JsValue> {
    result.map_err(|e| JsValue::from_str(&e))
}

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

// ============================================================================
// Recommendations
// ============================================================================

pub fn brew_parameters_json(coffee_json: &str, env_json: &str) -> Result<String, String> {
    let coffee: Coffee = parse(coffee_json, "coffee")?;
    let env: Environment = parse(env_json, "environment")?;
    to_json(&compute_brew_parameters(&coffee, &env))
}

/// Full recommendation for one coffee
#[wasm_bindgen(js_name = computeBrewParameters)]
pub fn compute_brew_parameters_js(coffee_json: &str, env_json: &str) -> Result<String, JsValue> {
    to_js(brew_parameters_json(coffee_json, env_json))
}

/// Resolve a stored grinder key, including keys from older versions
#[wasm_bindgen(js_name = migrateGrinderKey)]
pub fn migrate_grinder_key(key: &str) -> String {
    Grinder::migrate(key).key().to_string()
}

// ============================================================================
// Feedback and adjustments
// ============================================================================

pub fn suggestion_json(coffee_json: &str, env_json: &str) -> Result<String, String> {
    let coffee: Coffee = parse(coffee_json, "coffee")?;
    let env: Environment = parse(env_json, "environment")?;
    to_json(&compute_suggestion(&coffee, &env))
}

/// Suggestion for the coffee's feedback; `"null"` when none was given
#[wasm_bindgen(js_name = computeSuggestion)]
pub fn compute_suggestion_js(coffee_json: &str, env_json: &str) -> Result<String, JsValue> {
    to_js(suggestion_json(coffee_json, env_json))
}

pub fn apply_suggestion_json(
    coffee_json: &str,
    env_json: &str,
    proposal_json: &str,
    now: DateTime<Utc>,
) -> Result<String, String> {
    let mut coffee: Coffee = parse(coffee_json, "coffee")?;
    let env: Environment = parse(env_json, "environment")?;
    let proposal: AdjustmentProposal = parse(proposal_json, "proposal")?;
    apply_suggestion(&mut coffee, &env, &proposal, now);
    to_json(&coffee)
}

/// Apply a proposal; returns the updated coffee
#[wasm_bindgen(js_name = applySuggestion)]
pub fn apply_suggestion_js(coffee_json: &str, env_json: &str, proposal_json: &str) -> Result<String, JsValue> {
    to_js(apply_suggestion_json(coffee_json, env_json, proposal_json, current_time()))
}

pub fn manual_adjustment_json(
    coffee_json: &str,
    env_json: &str,
    kind: &str,
    delta: i32,
    now: DateTime<Utc>,
) -> Result<String, String> {
    let adjustment = match kind {
        "grind" => ManualAdjustment::Grind(delta),
        "temp" => ManualAdjustment::Temp(delta),
        other => return Err(format!("Unknown adjustment kind: {}", other)),
    };
    let mut coffee: Coffee = parse(coffee_json, "coffee")?;
    let env: Environment = parse(env_json, "environment")?;
    if !record_manual_adjustment(&mut coffee, &env, adjustment, now) {
        return Err("Current temperature cannot be adjusted".to_string());
    }
    to_json(&coffee)
}

/// One grind or temperature button press; returns the updated coffee
#[wasm_bindgen(js_name = recordManualAdjustment)]
pub fn record_manual_adjustment_js(
    coffee_json: &str,
    env_json: &str,
    kind: &str,
    delta: i32,
) -> Result<String, JsValue> {
    to_js(manual_adjustment_json(coffee_json, env_json, kind, delta, current_time()))
}

pub fn reset_adjustments_json(coffee_json: &str, env_json: &str, now: DateTime<Utc>) -> Result<String, String> {
    let mut coffee: Coffee = parse(coffee_json, "coffee")?;
    let env: Environment = parse(env_json, "environment")?;
    reset_adjustments(&mut coffee, &env, now);
    to_json(&coffee)
}

#[wasm_bindgen(js_name = resetAdjustments)]
pub fn reset_adjustments_js(coffee_json: &str, env_json: &str) -> Result<String, JsValue> {
    to_js(reset_adjustments_json(coffee_json, env_json, current_time()))
}

pub fn migrate_json(list_json: &str, env_json: &str) -> Result<String, String> {
    let mut coffees: Vec<Coffee> = parse(list_json, "coffee list")?;
    let env: Environment = parse(env_json, "environment")?;
    migrate_initial_values(&mut coffees, &env);
    to_json(&coffees)
}

/// Startup pass that fills missing baselines
#[wasm_bindgen(js_name = migrateInitialValues)]
pub fn migrate_initial_values_js(list_json: &str, env_json: &str) -> Result<String, JsValue> {
    to_js(migrate_json(list_json, env_json))
}

pub fn describe_entry_json(entry_json: &str) -> Result<String, String> {
    let entry: AdjustmentRecord = parse(entry_json, "history entry")?;
    Ok(describe(&entry))
}

#[wasm_bindgen(js_name = describeHistoryEntry)]
pub fn describe_history_entry(entry_json: &str) -> Result<String, JsValue> {
    to_js(describe_entry_json(entry_json))
}

// ============================================================================
// Sync
// ============================================================================

pub fn dedupe_json(list_json: &str, source: &str, now: DateTime<Utc>) -> Result<String, String> {
    let raw: Vec<serde_json::Value> = parse(list_json, "coffee list")?;
    to_json(&dedupe_coffees(raw, source, now))
}

#[wasm_bindgen(js_name = dedupeCoffees)]
pub fn dedupe_coffees_js(list_json: &str, source: &str) -> Result<String, JsValue> {
    to_js(dedupe_json(list_json, source, current_time()))
}

pub fn reconcile_json(remote_json: &str, local_json: &str, now: DateTime<Utc>) -> Result<String, String> {
    let remote: Vec<serde_json::Value> = parse(remote_json, "remote list")?;
    let local: Vec<Coffee> = parse(local_json, "local list")?;
    to_json(&reconcile_remote(remote, &local, now))
}

/// Decide between a fetched remote list and the local one
#[wasm_bindgen(js_name = reconcileRemote)]
pub fn reconcile_remote_js(remote_json: &str, local_json: &str) -> Result<String, JsValue> {
    to_js(reconcile_json(remote_json, local_json, current_time()))
}

// ============================================================================
// Water and freshness
// ============================================================================

pub fn water_hardness_json(postal_code: &str) -> Result<String, String> {
    let hardness = lookup_postal_code(postal_code).map_err(|e| e.to_string())?;
    to_json(&hardness)
}

#[wasm_bindgen(js_name = lookupWaterHardness)]
pub fn lookup_water_hardness(postal_code: &str) -> Result<String, JsValue> {
    to_js(water_hardness_json(postal_code))
}

pub fn manual_hardness_json(value: f64) -> Result<String, String> {
    let value = Decimal::try_from(value).map_err(|e| format!("Invalid water hardness: {}", e))?;
    let hardness = manual_hardness(value).map_err(|e| e.to_string())?;
    to_json(&hardness)
}

#[wasm_bindgen(js_name = manualWaterHardness)]
pub fn manual_water_hardness(value: f64) -> Result<String, JsValue> {
    to_js(manual_hardness_json(value))
}

pub fn freshness_json(roast_date: &str, as_of: Option<NaiveDate>) -> Result<String, String> {
    let roast_date = (!roast_date.trim().is_empty()).then_some(roast_date);
    to_json(&freshness_badge(roast_date, as_of))
}

/// Badge for a roast date; `as_of` defaults to today
#[wasm_bindgen(js_name = freshnessBadge)]
pub fn freshness_badge_js(roast_date: &str, as_of: Option<String>) -> Result<String, JsValue> {
    let as_of = as_of
        .as_deref()
        .and_then(parse_roast_date)
        .unwrap_or_else(|| current_time().date_naive());
    to_js(freshness_json(roast_date, Some(as_of)))
}

// ============================================================================
// Brew timer
// ============================================================================

fn monotonic(now_ms: f64) -> Duration {
    if !now_ms.is_finite() || now_ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(now_ms / 1000.0)
}

pub fn start_timer_json(coffee_id: &str, steps_json: &str, now_ms: f64) -> Result<String, String> {
    let steps: Vec<BrewStep> = parse(steps_json, "steps")?;
    let now = monotonic(now_ms);
    TIMERS.with(|timers| {
        let mut timers = timers.borrow_mut();
        timers.start(coffee_id, &steps, now);
        to_json(&timers.tick(coffee_id, now))
    })
}

/// Start (or restart) the timer for a coffee. `now_ms` is
/// `performance.now()`.
#[wasm_bindgen(js_name = startBrewTimer)]
pub fn start_brew_timer(coffee_id: &str, steps_json: &str, now_ms: f64) -> Result<String, JsValue> {
    to_js(start_timer_json(coffee_id, steps_json, now_ms))
}

/// Pause or resume; returns the new state, or `undefined` with no timer
#[wasm_bindgen(js_name = toggleBrewTimer)]
pub fn toggle_brew_timer(coffee_id: &str, now_ms: f64) -> Option<String> {
    TIMERS.with(|timers| {
        timers
            .borrow_mut()
            .toggle_pause(coffee_id, monotonic(now_ms))
            .and_then(|state| serde_json::to_value(state).ok())
            .and_then(|v| v.as_str().map(str::to_string))
    })
}

#[wasm_bindgen(js_name = resetBrewTimer)]
pub fn reset_brew_timer(coffee_id: &str) -> bool {
    TIMERS.with(|timers| timers.borrow_mut().reset(coffee_id))
}

pub fn tick_timer_json(coffee_id: &str, now_ms: f64) -> Result<String, String> {
    TIMERS.with(|timers| to_json(&timers.borrow().tick(coffee_id, monotonic(now_ms))))
}

/// Frame data for the progress bars; `"null"` when no timer runs
#[wasm_bindgen(js_name = tickBrewTimer)]
pub fn tick_brew_timer(coffee_id: &str, now_ms: f64) -> Result<String, JsValue> {
    to_js(tick_timer_json(coffee_id, now_ms))
}
