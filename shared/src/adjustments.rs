//! Grind/temperature overrides and the engine baseline
//!
//! Every mutation captures the displayed grind and temperature before and
//! after the change and logs them to the coffee's history. The baseline
//! (`initialGrind`/`initialTemp`) is the recommendation with all overrides
//! stripped; it is filled in before the first override lands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feedback::AdjustmentProposal;
use crate::history::push_history;
use crate::models::{AdjustmentRecord, Coffee, Environment, ManualAdjustKind};
use crate::recommendation::{compute_brew_parameters, BrewRecommendation};
use crate::temperature::shift_temperature;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BaselineValues {
    pub grind: String,
    pub temp: String,
}

/// A single press of a grind or temperature +/- button
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "delta", rename_all = "lowercase")]
pub enum ManualAdjustment {
    Grind(i32),
    Temp(i32),
}

/// Engine output for the coffee with every grind/temperature override removed
pub fn initial_values(coffee: &Coffee, env: &Environment) -> BaselineValues {
    let rec = compute_brew_parameters(&coffee.without_overrides(), env);
    BaselineValues {
        grind: rec.grind_setting,
        temp: rec.temperature,
    }
}

/// Fill in the baseline if either half is missing. Returns `true` when the
/// coffee was changed.
pub fn ensure_initial_values(coffee: &mut Coffee, env: &Environment) -> bool {
    let missing = |v: &Option<String>| v.as_deref().map_or(true, str::is_empty);
    if !missing(&coffee.initial_grind) && !missing(&coffee.initial_temp) {
        return false;
    }
    let baseline = initial_values(coffee, env);
    coffee.initial_grind = Some(baseline.grind);
    coffee.initial_temp = Some(baseline.temp);
    true
}

/// Startup pass over the library. Returns `true` when anything changed and
/// the list should be saved.
pub fn migrate_initial_values(coffees: &mut [Coffee], env: &Environment) -> bool {
    let mut changed = false;
    for coffee in coffees.iter_mut() {
        changed |= ensure_initial_values(coffee, env);
    }
    if changed {
        tracing::debug!("filled missing baseline values");
    }
    changed
}

struct Snapshot {
    grind: String,
    temp: String,
}

impl From<BrewRecommendation> for Snapshot {
    fn from(rec: BrewRecommendation) -> Self {
        Snapshot {
            grind: rec.grind_setting,
            temp: rec.temperature,
        }
    }
}

fn snapshot(coffee: &Coffee, env: &Environment) -> Snapshot {
    compute_brew_parameters(coffee, env).into()
}

fn record(before: Snapshot, after: Snapshot, now: DateTime<Utc>) -> AdjustmentRecord {
    AdjustmentRecord {
        timestamp: now,
        previous_grind: before.grind,
        previous_temp: before.temp,
        new_grind: after.grind,
        new_temp: after.temp,
        grind_offset_delta: 0,
        custom_temp_applied: None,
        manual_adjust: None,
        reset_to_initial: false,
    }
}

/// Apply one +/- press. Returns `false` (and records nothing) when a
/// temperature press meets a temperature string that does not parse.
pub fn record_manual_adjustment(
    coffee: &mut Coffee,
    env: &Environment,
    adjustment: ManualAdjustment,
    now: DateTime<Utc>,
) -> bool {
    ensure_initial_values(coffee, env);
    let before = compute_brew_parameters(coffee, env);

    let entry = match adjustment {
        ManualAdjustment::Grind(delta) => {
            coffee.grind_offset = Some(coffee.grind_offset.unwrap_or(0).saturating_add(delta));
            AdjustmentRecord {
                grind_offset_delta: delta,
                manual_adjust: Some(ManualAdjustKind::Grind),
                ..record(before.into(), snapshot(coffee, env), now)
            }
        }
        ManualAdjustment::Temp(delta) => {
            let current = coffee
                .custom_temp
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| before.temperature.clone());
            let Some(shifted) = shift_temperature(&current, delta) else {
                return false;
            };
            coffee.custom_temp = Some(shifted.clone());
            AdjustmentRecord {
                custom_temp_applied: Some(shifted),
                manual_adjust: Some(ManualAdjustKind::Temp),
                ..record(before.into(), snapshot(coffee, env), now)
            }
        }
    };

    push_history(coffee, entry);
    true
}

/// Layer a suggestion onto the coffee: the grind delta adds to the running
/// offset, the temperature replaces any previous override. Feedback is
/// cleared afterwards.
pub fn apply_suggestion(
    coffee: &mut Coffee,
    env: &Environment,
    proposal: &AdjustmentProposal,
    now: DateTime<Utc>,
) {
    ensure_initial_values(coffee, env);
    let before = snapshot(coffee, env);

    if proposal.grind_offset_delta != 0 {
        coffee.grind_offset = Some(
            coffee
                .grind_offset
                .unwrap_or(0)
                .saturating_add(proposal.grind_offset_delta),
        );
    }
    let new_temp = proposal.new_temp.clone().filter(|t| !t.is_empty());
    if let Some(temp) = &new_temp {
        coffee.custom_temp = Some(temp.clone());
    }

    let entry = AdjustmentRecord {
        grind_offset_delta: proposal.grind_offset_delta,
        custom_temp_applied: new_temp,
        ..record(before, snapshot(coffee, env), now)
    };
    push_history(coffee, entry);
    coffee.feedback.clear();
}

/// Re-anchor the baseline to the current environment and drop every
/// grind/temperature override and the pending feedback. The dose override
/// is kept.
pub fn reset_adjustments(coffee: &mut Coffee, env: &Environment, now: DateTime<Utc>) {
    let before = snapshot(coffee, env);

    let baseline = initial_values(coffee, env);
    coffee.initial_grind = Some(baseline.grind);
    coffee.initial_temp = Some(baseline.temp);

    coffee.custom_grind = None;
    coffee.grind_offset = None;
    coffee.custom_temp = None;
    coffee.feedback.clear();

    let entry = AdjustmentRecord {
        reset_to_initial: true,
        ..record(before, snapshot(coffee, env), now)
    };
    push_history(coffee, entry);
}
