//! Per-coffee adjustment history

use crate::models::{AdjustmentRecord, Coffee, ManualAdjustKind};

/// Entries kept per coffee; older entries are dropped first.
pub const HISTORY_LIMIT: usize = 30;

/// Insert `record` as the most recent entry and evict beyond the limit.
pub fn push_history(coffee: &mut Coffee, record: AdjustmentRecord) {
    coffee.feedback_history.insert(0, record);
    coffee.feedback_history.truncate(HISTORY_LIMIT);
}

fn signed(delta: i32) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// One-line summary for the history list
pub fn describe(record: &AdjustmentRecord) -> String {
    if record.reset_to_initial {
        return "Reset to engine baseline values".to_string();
    }

    match record.manual_adjust {
        Some(ManualAdjustKind::Grind) => {
            return format!("Manual grind adjust {}", signed(record.grind_offset_delta));
        }
        Some(ManualAdjustKind::Temp) => {
            return format!(
                "Manual temperature adjust {}",
                record.custom_temp_applied.as_deref().unwrap_or_default()
            )
            .trim_end()
            .to_string();
        }
        None => {}
    }

    let mut parts = Vec::new();
    if record.grind_offset_delta != 0 {
        parts.push(format!("Grind offset {}", signed(record.grind_offset_delta)));
    }
    if let Some(temp) = record.custom_temp_applied.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("Temp override {temp}"));
    }
    if parts.is_empty() {
        "No direct offset change".to_string()
    } else {
        parts.join(" · ")
    }
}
