//! Parameter pipeline
//!
//! Folds a coffee's metadata and the environment into one final parameter
//! set. Stages run in a fixed order; each one takes the previous draft and
//! returns the new draft together with a record of what it changed. The
//! records make up the adjustment trace that brew notes are written from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::freshness::{roast_stage, RoastStage};
use crate::models::{BrewMethod, Coffee, Environment, WaterHardness, WaterHardnessCategory};
use crate::rules::{
    altitude_band, bean_steps_per_click, classify_cultivar, classify_origin, classify_process,
    cultivar_adjust, method_override, origin_adjust, parse_altitude, process_base,
    roast_temp_adjust, water_adjust, water_steps_per_click, AltitudeBand, CultivarCategory,
    OriginRegion, ProcessCategory, ProcessKind,
};
use crate::types::{BrewStyle, GrindBase, TempRange};

/// Working parameters handed from stage to stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub grind: GrindBase,
    pub temp: TempRange,
    pub ratio: Decimal,
    pub style: BrewStyle,
    pub target_time: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AltitudeAdjustment {
    pub grind_adjust: i32,
    pub temp_adjust: i32,
    /// Parsed altitude, after the default was applied
    pub altitude: i64,
    pub band: AltitudeBand,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CultivarAdjustment {
    pub grind_adjust: i32,
    pub temp_adjust: i32,
    pub category: CultivarCategory,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OriginAdjustment {
    pub grind_adjust: i32,
    pub temp_adjust: i32,
    pub region: OriginRegion,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WaterAdjustment {
    pub grind_adjust: i32,
    pub temp_adjust: i32,
    pub category: WaterHardnessCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoastAdjustment {
    pub temp_adjust: i32,
    pub stage: RoastStage,
    pub days_since_roast: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MethodAdjustment {
    pub method: BrewMethod,
    pub grind_adjust: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub steps_adjust: Decimal,
    pub temp_adjust: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub ratio_before: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub ratio_after: Decimal,
}

/// What each stage changed, in pipeline order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentTrace {
    pub process: ProcessKind,
    pub altitude: AltitudeAdjustment,
    pub cultivar: CultivarAdjustment,
    pub origin: OriginAdjustment,
    /// Absent when no water hardness is configured
    pub water: Option<WaterAdjustment>,
    pub roast: RoastAdjustment,
    pub method: MethodAdjustment,
}

/// Fully adjusted parameters for one coffee in one environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FinalParameterSet {
    pub grind_base: GrindBase,
    pub temp_base: TempRange,
    #[serde(with = "rust_decimal::serde::float")]
    pub ratio: Decimal,
    pub brew_style: BrewStyle,
    pub target_time: String,
    pub category: ProcessCategory,
    pub trace: AdjustmentTrace,
}

// ============================================================================
// Stages
// ============================================================================

pub fn base_by_process(process: &str) -> (Draft, ProcessKind) {
    let kind = classify_process(process);
    let base = process_base(kind);
    let draft = Draft {
        grind: base.grind,
        temp: base.temp,
        ratio: base.ratio,
        style: base.style,
        target_time: base.target_time.to_string(),
    };
    (draft, kind)
}

fn shift(draft: Draft, grind: i32, temp: i32, steps_per_click: Decimal) -> Draft {
    Draft {
        grind: draft.grind.shifted(grind, steps_per_click),
        temp: draft.temp.shifted(temp),
        ..draft
    }
}

pub fn adjust_for_altitude(draft: Draft, altitude: &str) -> (Draft, AltitudeAdjustment) {
    let altitude = parse_altitude(altitude);
    let (band, grind_adjust, temp_adjust) = altitude_band(altitude);
    (
        shift(draft, grind_adjust, temp_adjust, bean_steps_per_click()),
        AltitudeAdjustment { grind_adjust, temp_adjust, altitude, band },
    )
}

pub fn adjust_for_cultivar(draft: Draft, cultivar: &str) -> (Draft, CultivarAdjustment) {
    let category = classify_cultivar(cultivar);
    let (grind_adjust, temp_adjust) = cultivar_adjust(category);
    (
        shift(draft, grind_adjust, temp_adjust, bean_steps_per_click()),
        CultivarAdjustment { grind_adjust, temp_adjust, category },
    )
}

pub fn adjust_for_origin(draft: Draft, origin: &str) -> (Draft, OriginAdjustment) {
    let region = classify_origin(origin);
    let (grind_adjust, temp_adjust) = origin_adjust(region);
    (
        shift(draft, grind_adjust, temp_adjust, bean_steps_per_click()),
        OriginAdjustment { grind_adjust, temp_adjust, region },
    )
}

pub fn adjust_for_water(draft: Draft, hardness: Option<&WaterHardness>) -> (Draft, Option<WaterAdjustment>) {
    let Some(hardness) = hardness else {
        return (draft, None);
    };
    let category = hardness.category();
    let (grind_adjust, temp_adjust) = water_adjust(category);
    (
        shift(draft, grind_adjust, temp_adjust, water_steps_per_click()),
        Some(WaterAdjustment {
            grind_adjust,
            temp_adjust,
            category,
            value: hardness.value,
        }),
    )
}

pub fn adjust_for_roast_age(draft: Draft, stage: RoastStage, days: Option<i64>) -> (Draft, RoastAdjustment) {
    let temp_adjust = roast_temp_adjust(stage);
    (
        Draft {
            temp: draft.temp.shifted(temp_adjust),
            ..draft
        },
        RoastAdjustment {
            temp_adjust,
            stage,
            days_since_roast: days,
        },
    )
}

pub fn adjust_for_method(draft: Draft, method: BrewMethod) -> (Draft, MethodAdjustment) {
    let rule = method_override(method);
    let ratio_before = draft.ratio;
    let mut ratio = draft.ratio;
    if let Some(floor) = rule.ratio_floor {
        ratio = ratio.max(floor);
    }
    if let Some(cap) = rule.ratio_cap {
        ratio = ratio.min(cap);
    }
    let target_time = rule
        .target_time
        .map(str::to_string)
        .unwrap_or(draft.target_time);

    (
        Draft {
            grind: draft.grind.offset(rule.grind_clicks, rule.grind_steps),
            temp: draft.temp.shifted(rule.temp),
            ratio,
            style: draft.style,
            target_time,
        },
        MethodAdjustment {
            method,
            grind_adjust: rule.grind_clicks,
            steps_adjust: rule.grind_steps,
            temp_adjust: rule.temp,
            ratio_before,
            ratio_after: ratio,
        },
    )
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run every stage for `coffee` under `env`. Total: malformed or missing
/// fields fall back to documented defaults instead of failing.
pub fn compute_final_parameters(coffee: &Coffee, env: &Environment) -> FinalParameterSet {
    let (draft, process) = base_by_process(&coffee.process);
    let (draft, altitude) = adjust_for_altitude(draft, &coffee.altitude);
    let (draft, cultivar) = adjust_for_cultivar(draft, &coffee.cultivar);
    let (draft, origin) = adjust_for_origin(draft, &coffee.origin);
    let (draft, water) = adjust_for_water(draft, env.active_water_hardness());
    let (stage, days) = roast_stage(coffee.roast_date.as_deref(), env.as_of);
    let (draft, roast) = adjust_for_roast_age(draft, stage, days);
    let (draft, method) = adjust_for_method(draft, env.preferred_method);

    FinalParameterSet {
        grind_base: draft.grind,
        temp_base: draft.temp,
        ratio: draft.ratio,
        brew_style: draft.style,
        target_time: draft.target_time,
        category: process.category(),
        trace: AdjustmentTrace {
            process,
            altitude,
            cultivar,
            origin,
            water,
            roast,
            method,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn coffee(process: &str, altitude: &str, cultivar: &str, origin: &str) -> Coffee {
        Coffee {
            altitude: altitude.to_string(),
            cultivar: cultivar.to_string(),
            ..Coffee::new("Test", origin, process)
        }
    }

    fn hardness(value: i64) -> WaterHardness {
        WaterHardness {
            value: Decimal::from(value),
            category: None,
            region: "Manual Entry".into(),
            source: "User Input".into(),
            zip_code: None,
            is_estimate: false,
            is_manual: true,
        }
    }

    #[test]
    fn test_plain_washed_has_no_adjustments() {
        let params = compute_final_parameters(
            &coffee("Washed", "1500", "Unknown", "Unknown"),
            &Environment::default(),
        );
        assert_eq!(params.grind_base.clicks, Decimal::from(22));
        assert_eq!(params.grind_base.steps, Decimal::new(35, 1));
        assert_eq!(params.temp_base, TempRange::new(92, 93));
        assert_eq!(params.ratio, Decimal::from(16));
        assert_eq!(params.category, ProcessCategory::Washed);
        assert_eq!(params.trace.altitude.grind_adjust, 0);
        assert!(params.trace.water.is_none());
        assert_eq!(params.trace.roast.stage, RoastStage::Unknown);
    }

    #[test]
    fn test_african_origin_grinds_finer() {
        let params = compute_final_parameters(
            &coffee("Ethiopia Washed", "1500", "Unknown", "Ethiopia"),
            &Environment::default(),
        );
        assert_eq!(params.grind_base.clicks, Decimal::from(21));
        assert_eq!(params.grind_base.steps, Decimal::new(325, 2));
        assert_eq!(params.trace.origin.region, OriginRegion::Africa);
    }

    #[test]
    fn test_stages_accumulate() {
        // High altitude gesha from Kenya on soft water
        let env = Environment {
            manual_water_hardness: Some(hardness(5)),
            ..Default::default()
        };
        let params = compute_final_parameters(&coffee("Washed", "1900", "Gesha", "Kenya"), &env);
        // 22 - 2 (altitude) - 1 (cultivar) - 1 (origin) - 2 (water)
        assert_eq!(params.grind_base.clicks, Decimal::from(16));
        // 3.5 - 0.5 - 0.25 - 0.25 - 1.0
        assert_eq!(params.grind_base.steps, Decimal::new(150, 2));
        // 92 + 1 - 1 + 0 + 1
        assert_eq!(params.temp_base, TempRange::new(93, 94));
        let water = params.trace.water.unwrap();
        assert_eq!(water.category, WaterHardnessCategory::VerySoft);
    }

    #[test]
    fn test_roast_age_moves_temperature_only() {
        let env = Environment::default().with_as_of(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        let mut fresh = coffee("Washed", "1500", "", "");
        fresh.roast_date = Some("2025-03-01".into());
        let params = compute_final_parameters(&fresh, &env);
        assert_eq!(params.temp_base, TempRange::new(91, 92));
        assert_eq!(params.grind_base.clicks, Decimal::from(22));
        assert_eq!(params.trace.roast.days_since_roast, Some(2));
    }

    #[test]
    fn test_chemex_floors_ratio() {
        let env = Environment::default().with_method(BrewMethod::Chemex);
        let params = compute_final_parameters(&coffee("Washed", "1500", "", ""), &env);
        assert_eq!(params.ratio, Decimal::new(165, 1));
        assert_eq!(params.grind_base.clicks, Decimal::from(26));
        assert_eq!(params.temp_base, TempRange::new(93, 94));
        assert_eq!(params.target_time, "3:30-4:30");
        assert_eq!(params.trace.method.ratio_before, Decimal::from(16));
    }

    #[test]
    fn test_aeropress_caps_ratio() {
        let env = Environment::default().with_method(BrewMethod::AeroPress);
        let params = compute_final_parameters(&coffee("Natural", "1500", "", ""), &env);
        assert_eq!(params.ratio, Decimal::from(15));
        assert_eq!(params.grind_base.clicks, Decimal::from(21));
        assert_eq!(params.target_time, "1:45-2:15");
    }

    #[test]
    fn test_garbage_input_uses_defaults() {
        let params = compute_final_parameters(&Coffee::default(), &Environment::default());
        assert_eq!(params.category, ProcessCategory::Washed);
        assert_eq!(params.trace.altitude.altitude, 1500);
        assert!(params.temp_base.min < params.temp_base.max);
    }

    #[test]
    fn test_serialized_shape() {
        let params = compute_final_parameters(&coffee("Washed", "1500", "", ""), &Environment::default());
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["ratio"], 16.0);
        assert_eq!(json["grindBase"]["clicks"], 22.0);
        assert_eq!(json["category"], "washed");
        assert_eq!(json["trace"]["origin"]["region"], "latin-america");
    }
}
