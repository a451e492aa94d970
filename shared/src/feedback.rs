//! Feedback suggestion engine
//!
//! Maps cupping-style tasting tags to a grind offset change and a
//! temperature change. Both are capped per round so that repeated
//! taste/adjust cycles converge instead of oscillating.

use serde::{Deserialize, Serialize};

use crate::models::{Coffee, CuppingFeedback, Environment, SensoryCategory, TasteLevel};
use crate::recommendation::compute_brew_parameters;
use crate::temperature::shift_temperature;

/// Largest grind offset change a single suggestion may make
pub const GRIND_DELTA_CAP: i32 = 4;

/// Largest temperature change (°C) a single suggestion may make
pub const TEMP_DELTA_CAP: i32 = 2;

/// How long the "no adjustments" notice stays up
pub const BALANCED_NOTICE_HIDE_MS: u64 = 3000;

pub const BALANCED_MESSAGE: &str = "✓ Perfect! No adjustments needed.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BalancedNotice {
    pub message: String,
    pub hide_after_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentProposal {
    /// Diagnosis and advice, one sentence per entry
    pub lines: Vec<String>,
    /// Capped grind offset change
    pub grind_offset_delta: i32,
    /// Capped temperature change
    pub temp_delta: i32,
    pub raw_grind_delta: i32,
    pub raw_temp_delta: i32,
    pub capped: bool,
    pub conflict: bool,
    /// Grind the card would show after applying; only when the grind moves
    pub preview_grind: Option<String>,
    /// Temperature override to apply; only when the temperature moves
    pub new_temp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Suggestion {
    Balanced(BalancedNotice),
    Adjust(AdjustmentProposal),
}

#[derive(Default)]
struct RuleOutcome {
    lines: Vec<String>,
    grind: i32,
    temp: i32,
}

impl RuleOutcome {
    fn push(&mut self, lines: &[&str], grind: i32, temp: i32) {
        self.lines.extend(lines.iter().map(|l| l.to_string()));
        self.grind += grind;
        self.temp += temp;
    }
}

fn evaluate_rules(feedback: &CuppingFeedback) -> RuleOutcome {
    use TasteLevel::{High, Low};

    let mut out = RuleOutcome::default();
    let bitter_high = feedback.bitterness == Some(High);
    let sweet_low = feedback.sweetness == Some(Low);

    match feedback.bitterness {
        Some(High) => out.push(
            &["Bitterness is high", "→ Grind coarser", "→ Lower temperature by 2°C"],
            5,
            -2,
        ),
        Some(Low) => out.push(
            &["Bitterness is very low / cup feels sharp-thin", "→ Slightly finer grind"],
            -2,
            0,
        ),
        _ => {}
    }

    match feedback.sweetness {
        Some(Low) => out.push(
            &["Sweetness is low", "→ Increase extraction slightly (finer + warmer)"],
            -3,
            1,
        ),
        Some(High) => out.push(
            &["Sweetness is high", "→ Keep this profile as a reference cup"],
            0,
            0,
        ),
        _ => {}
    }

    match feedback.acidity {
        Some(High) => out.push(
            &["Acidity feels too sharp", "→ Grind finer", "→ Raise temperature by 1–2°C"],
            -4,
            2,
        ),
        Some(Low) if bitter_high => out.push(
            &[
                "Acidity is low + bitterness high",
                "→ Keep coarser/cooler direction to reduce harshness",
            ],
            1,
            -1,
        ),
        Some(Low) if sweet_low => out.push(
            &[
                "Acidity is low + sweetness low",
                "→ Increase extraction (slightly finer + warmer)",
            ],
            -2,
            1,
        ),
        Some(Low) => out.push(
            &["Acidity feels muted", "→ Coarser by 1 click equivalent only"],
            1,
            0,
        ),
        _ => {}
    }

    match feedback.body {
        Some(Low) => out.push(&["Body is too light", "→ Grind slightly finer"], -3, 0),
        Some(High) => out.push(&["Body is too heavy", "→ Grind slightly coarser"], 3, 0),
        _ => {}
    }

    out
}

/// Suggestion for the coffee's current feedback, or `None` when nothing
/// has been tasted yet.
pub fn compute_suggestion(coffee: &Coffee, env: &Environment) -> Option<Suggestion> {
    let feedback = &coffee.feedback;
    if feedback.is_empty() {
        return None;
    }

    let mut outcome = evaluate_rules(feedback);
    if outcome.lines.is_empty() || feedback.is_all_balanced() {
        return Some(Suggestion::Balanced(BalancedNotice {
            message: BALANCED_MESSAGE.to_string(),
            hide_after_ms: BALANCED_NOTICE_HIDE_MS,
        }));
    }

    let conflict =
        feedback.bitterness == Some(TasteLevel::High) && feedback.acidity == Some(TasteLevel::High);
    if conflict {
        outcome.push(
            &[
                "Conflict: bitterness high + acidity high",
                "→ Keep temperature stable; change grind first, then taste again",
            ],
            0,
            0,
        );
    }

    let grind_delta = outcome.grind.clamp(-GRIND_DELTA_CAP, GRIND_DELTA_CAP);
    let temp_delta = outcome.temp.clamp(-TEMP_DELTA_CAP, TEMP_DELTA_CAP);
    let capped = grind_delta != outcome.grind || temp_delta != outcome.temp;
    if capped {
        outcome.push(
            &[
                "Adjustment cap applied",
                "→ Changes limited to stable single-step iteration",
            ],
            0,
            0,
        );
    }

    let preview_grind = (grind_delta != 0).then(|| {
        let candidate = Coffee {
            grind_offset: Some(coffee.grind_offset.unwrap_or(0).saturating_add(grind_delta)),
            ..coffee.clone()
        };
        compute_brew_parameters(&candidate, env).grind_setting
    });

    let new_temp = (temp_delta != 0).then(|| {
        let current = coffee
            .custom_temp
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| compute_brew_parameters(coffee, env).temperature);
        shift_temperature(&current, temp_delta).unwrap_or(current)
    });

    Some(Suggestion::Adjust(AdjustmentProposal {
        lines: outcome.lines,
        grind_offset_delta: grind_delta,
        temp_delta,
        raw_grind_delta: outcome.grind,
        raw_temp_delta: outcome.temp,
        capped,
        conflict,
        preview_grind,
        new_temp,
    }))
}

/// Re-check before hiding the balanced notice: feedback may have changed
/// while the notice was up.
pub fn should_hide_balanced_notice(feedback: &CuppingFeedback) -> bool {
    feedback.is_all_balanced()
}

/// Record one tasting tag. Returns `true` when the stored value changed and
/// the suggestion should be recomputed.
pub fn select_feedback(coffee: &mut Coffee, category: SensoryCategory, level: TasteLevel) -> bool {
    coffee.feedback.set(category, level)
}

/// Slider variant of [`select_feedback`]
pub fn update_feedback_slider(coffee: &mut Coffee, category: SensoryCategory, slider: f64) -> bool {
    select_feedback(coffee, category, TasteLevel::from_slider(slider))
}
