//! Static rule tables
//!
//! Every classification over free text is an ordered list of keyword rules:
//! the first rule whose keywords all appear in the lowercased input wins, and
//! the position in the list is the priority. Numeric adjustments live next
//! to the classifications that trigger them.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::freshness::RoastStage;
use crate::models::{BrewMethod, WaterHardnessCategory};
use crate::types::{BrewStyle, GrindBase, TempRange};

// ============================================================================
// Keyword classification
// ============================================================================

/// One `(predicate, result)` pair of a priority-ordered classification.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T> {
    /// Every keyword must be present
    pub all_of: &'static [&'static str],
    /// At least one keyword must be present (ignored when empty)
    pub any_of: &'static [&'static str],
    pub result: T,
}

impl<T> KeywordRule<T> {
    pub fn matches(&self, haystack: &str) -> bool {
        self.all_of.iter().all(|k| haystack.contains(k))
            && (self.any_of.is_empty() || self.any_of.iter().any(|k| haystack.contains(k)))
    }
}

/// Return the result of the first matching rule, or `fallback`.
pub fn classify<T: Copy>(rules: &[KeywordRule<T>], text: &str, fallback: T) -> T {
    let haystack = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&haystack))
        .map(|rule| rule.result)
        .unwrap_or(fallback)
}

const fn all<T>(all_of: &'static [&'static str], result: T) -> KeywordRule<T> {
    KeywordRule { all_of, any_of: &[], result }
}

const fn any<T>(any_of: &'static [&'static str], result: T) -> KeywordRule<T> {
    KeywordRule { all_of: &[], any_of, result }
}

// ============================================================================
// Processing method
// ============================================================================

/// Category label attached to the final parameter set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessCategory {
    ExperimentalNitro,
    AnaerobicNatural,
    AnaerobicWashed,
    Carbonic,
    ExtendedFermentation,
    Yeast,
    Honey,
    Natural,
    Washed,
}

impl ProcessCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessCategory::ExperimentalNitro => "experimental-nitro",
            ProcessCategory::AnaerobicNatural => "anaerobic-natural",
            ProcessCategory::AnaerobicWashed => "anaerobic-washed",
            ProcessCategory::Carbonic => "carbonic",
            ProcessCategory::ExtendedFermentation => "extended-fermentation",
            ProcessCategory::Yeast => "yeast",
            ProcessCategory::Honey => "honey",
            ProcessCategory::Natural => "natural",
            ProcessCategory::Washed => "washed",
        }
    }
}

impl fmt::Display for ProcessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing method as classified from free text. Honey is split further
/// by colour because the grind base differs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessKind {
    Nitro,
    AnaerobicNatural,
    AnaerobicWashed,
    Carbonic,
    ExtendedFermentation,
    Yeast,
    HoneyYellow,
    HoneyBlack,
    Honey,
    Natural,
    Washed,
}

impl ProcessKind {
    pub fn category(self) -> ProcessCategory {
        match self {
            ProcessKind::Nitro => ProcessCategory::ExperimentalNitro,
            ProcessKind::AnaerobicNatural => ProcessCategory::AnaerobicNatural,
            ProcessKind::AnaerobicWashed => ProcessCategory::AnaerobicWashed,
            ProcessKind::Carbonic => ProcessCategory::Carbonic,
            ProcessKind::ExtendedFermentation => ProcessCategory::ExtendedFermentation,
            ProcessKind::Yeast => ProcessCategory::Yeast,
            ProcessKind::HoneyYellow | ProcessKind::HoneyBlack | ProcessKind::Honey => {
                ProcessCategory::Honey
            }
            ProcessKind::Natural => ProcessCategory::Natural,
            ProcessKind::Washed => ProcessCategory::Washed,
        }
    }
}

pub const PROCESS_RULES: &[KeywordRule<ProcessKind>] = &[
    any(&["nitro", "co2", "co-infused"], ProcessKind::Nitro),
    all(&["anaerobic", "natural"], ProcessKind::AnaerobicNatural),
    all(&["anaerobic", "washed"], ProcessKind::AnaerobicWashed),
    any(&["carbonic"], ProcessKind::Carbonic),
    any(&["extended", "long ferment"], ProcessKind::ExtendedFermentation),
    any(&["yeast"], ProcessKind::Yeast),
    all(&["honey", "yellow"], ProcessKind::HoneyYellow),
    all(&["honey", "black"], ProcessKind::HoneyBlack),
    any(&["honey"], ProcessKind::Honey),
    any(&["natural"], ProcessKind::Natural),
];

pub fn classify_process(process: &str) -> ProcessKind {
    classify(PROCESS_RULES, process, ProcessKind::Washed)
}

/// Unadjusted parameters for one processing method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessBase {
    pub grind: GrindBase,
    pub temp: TempRange,
    pub ratio: Decimal,
    pub style: BrewStyle,
    pub target_time: &'static str,
}

pub fn process_base(kind: ProcessKind) -> ProcessBase {
    // (clicks, steps x10, min temp, ratio x10, style, target time)
    let (clicks, steps, temp, ratio, style, target_time) = match kind {
        ProcessKind::Nitro => (18, 28, 90, 155, BrewStyle::Slow, "2:45-3:15"),
        ProcessKind::AnaerobicNatural => (20, 32, 91, 165, BrewStyle::Controlled, "2:30-3:00"),
        ProcessKind::AnaerobicWashed => (19, 30, 91, 160, BrewStyle::Controlled, "2:30-3:00"),
        ProcessKind::Carbonic => (20, 33, 90, 160, BrewStyle::Slow, "2:45-3:15"),
        ProcessKind::ExtendedFermentation => (21, 34, 91, 162, BrewStyle::Controlled, "2:30-3:00"),
        ProcessKind::Yeast => (23, 38, 92, 165, BrewStyle::Standard, "2:30-3:00"),
        ProcessKind::HoneyYellow => (23, 36, 92, 167, BrewStyle::Fruity, "2:45-3:15"),
        ProcessKind::HoneyBlack => (26, 42, 93, 167, BrewStyle::Fruity, "2:45-3:15"),
        ProcessKind::Honey => (24, 39, 93, 167, BrewStyle::Fruity, "2:45-3:15"),
        ProcessKind::Natural => (25, 41, 93, 167, BrewStyle::Fruity, "2:45-3:15"),
        ProcessKind::Washed => (22, 35, 92, 160, BrewStyle::Standard, "2:30-3:00"),
    };
    ProcessBase {
        grind: GrindBase::new(Decimal::from(clicks), Decimal::new(steps, 1)),
        temp: TempRange::new(temp, temp + 1),
        ratio: Decimal::new(ratio, 1).normalize(),
        style,
        target_time,
    }
}

// ============================================================================
// Altitude
// ============================================================================

pub const DEFAULT_ALTITUDE: i64 = 1500;

/// Fraction of a click delta applied to the step unit for altitude,
/// cultivar and origin adjustments
pub fn bean_steps_per_click() -> Decimal {
    Decimal::new(25, 2)
}

/// Fraction of a click delta applied to the step unit for water hardness
pub fn water_steps_per_click() -> Decimal {
    Decimal::new(5, 1)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AltitudeBand {
    /// below 1200 m
    Low,
    /// 1200-1399 m
    MidLow,
    /// 1400-1599 m
    Mid,
    /// 1600-1799 m
    MidHigh,
    /// 1800 m and above
    High,
}

/// `(exclusive upper bound, band, grind delta, temp delta)`, ascending
pub const ALTITUDE_BANDS: &[(Option<i64>, AltitudeBand, i32, i32)] = &[
    (Some(1200), AltitudeBand::Low, 2, -1),
    (Some(1400), AltitudeBand::MidLow, 1, 0),
    (Some(1600), AltitudeBand::Mid, 0, 0),
    (Some(1800), AltitudeBand::MidHigh, -1, 0),
    (None, AltitudeBand::High, -2, 1),
];

/// Band and `(grind, temp)` deltas for an altitude in metres
pub fn altitude_band(altitude: i64) -> (AltitudeBand, i32, i32) {
    ALTITUDE_BANDS
        .iter()
        .find(|(upper, ..)| upper.map_or(true, |limit| altitude < limit))
        .map(|&(_, band, grind, temp)| (band, grind, temp))
        .unwrap_or((AltitudeBand::High, -2, 1))
}

/// Parse the leading integer of an altitude string the way a lenient form
/// field would: leading whitespace and sign allowed, digits until the first
/// non-digit. Missing, unparsable and zero values use the default altitude.
pub fn parse_altitude(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let run: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    match run.parse::<i64>() {
        Ok(0) | Err(_) => DEFAULT_ALTITUDE,
        Ok(value) if negative => -value,
        Ok(value) => value,
    }
}

// ============================================================================
// Cultivar
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CultivarCategory {
    Delicate,
    Robust,
    Balanced,
}

pub const CULTIVAR_RULES: &[KeywordRule<CultivarCategory>] = &[
    any(
        &["gesha", "geisha", "sl28", "sl34", "bourbon", "typica"],
        CultivarCategory::Delicate,
    ),
    any(
        &["pacamara", "maragogype", "catimor", "sarchimor", "robusta"],
        CultivarCategory::Robust,
    ),
];

pub fn classify_cultivar(cultivar: &str) -> CultivarCategory {
    classify(CULTIVAR_RULES, cultivar, CultivarCategory::Balanced)
}

/// `(grind, temp)` deltas
pub fn cultivar_adjust(category: CultivarCategory) -> (i32, i32) {
    match category {
        CultivarCategory::Delicate => (-1, -1),
        CultivarCategory::Robust => (1, 1),
        CultivarCategory::Balanced => (0, 0),
    }
}

// ============================================================================
// Origin
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum OriginRegion {
    Africa,
    Asia,
    LatinAmerica,
}

pub const ORIGIN_RULES: &[KeywordRule<OriginRegion>] = &[
    any(
        &["ethiopia", "kenya", "rwanda", "burundi", "tanzania"],
        OriginRegion::Africa,
    ),
    any(
        &["indonesia", "sumatra", "java", "india", "vietnam", "papua"],
        OriginRegion::Asia,
    ),
];

pub fn classify_origin(origin: &str) -> OriginRegion {
    classify(ORIGIN_RULES, origin, OriginRegion::LatinAmerica)
}

/// `(grind, temp)` deltas
pub fn origin_adjust(region: OriginRegion) -> (i32, i32) {
    match region {
        OriginRegion::Africa => (-1, 0),
        OriginRegion::Asia => (1, 1),
        OriginRegion::LatinAmerica => (0, 0),
    }
}

// ============================================================================
// Water, roast age, brew method
// ============================================================================

/// `(grind, temp)` deltas
pub fn water_adjust(category: WaterHardnessCategory) -> (i32, i32) {
    if category.is_soft() {
        (-2, 1)
    } else if category.is_hard() {
        (2, -1)
    } else {
        (0, 0)
    }
}

/// Temperature delta for roast age; never more than one degree either way.
pub fn roast_temp_adjust(stage: RoastStage) -> i32 {
    match stage {
        RoastStage::Resting => -1,
        RoastStage::Fading => 1,
        RoastStage::Sweet | RoastStage::Unknown => 0,
    }
}

/// Fixed changes a brew method makes on top of the bean-driven parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodOverride {
    pub grind_clicks: i32,
    pub grind_steps: Decimal,
    pub temp: i32,
    pub ratio_floor: Option<Decimal>,
    pub ratio_cap: Option<Decimal>,
    pub target_time: Option<&'static str>,
}

pub fn method_override(method: BrewMethod) -> MethodOverride {
    match method {
        BrewMethod::Chemex => MethodOverride {
            grind_clicks: 4,
            grind_steps: Decimal::ONE,
            temp: 1,
            ratio_floor: Some(Decimal::new(165, 1)),
            ratio_cap: None,
            target_time: Some("3:30-4:30"),
        },
        BrewMethod::AeroPress => MethodOverride {
            grind_clicks: -4,
            grind_steps: Decimal::NEGATIVE_ONE,
            temp: -1,
            ratio_floor: None,
            ratio_cap: Some(Decimal::from(15)),
            target_time: Some("1:45-2:15"),
        },
        BrewMethod::V60 => MethodOverride {
            grind_clicks: 0,
            grind_steps: Decimal::ZERO,
            temp: 0,
            ratio_floor: None,
            ratio_cap: None,
            target_time: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_priority_order() {
        assert_eq!(classify_process("Anaerobic Natural Honey"), ProcessKind::AnaerobicNatural);
        assert_eq!(classify_process("CO2 Anaerobic Natural"), ProcessKind::Nitro);
        assert_eq!(classify_process("Anaerobic Washed"), ProcessKind::AnaerobicWashed);
        assert_eq!(classify_process("Carbonic Maceration Natural"), ProcessKind::Carbonic);
        assert_eq!(classify_process("Long Fermentation"), ProcessKind::ExtendedFermentation);
        assert_eq!(classify_process("Yeast Inoculated Honey"), ProcessKind::Yeast);
        assert_eq!(classify_process("Yellow Honey"), ProcessKind::HoneyYellow);
        assert_eq!(classify_process("Black honey"), ProcessKind::HoneyBlack);
        assert_eq!(classify_process("Red Honey"), ProcessKind::Honey);
        assert_eq!(classify_process("Natural"), ProcessKind::Natural);
        assert_eq!(classify_process("Washed"), ProcessKind::Washed);
        assert_eq!(classify_process(""), ProcessKind::Washed);
        assert_eq!(classify_process("Wet hulled"), ProcessKind::Washed);
    }

    #[test]
    fn test_every_honey_shares_category() {
        for kind in [ProcessKind::HoneyYellow, ProcessKind::HoneyBlack, ProcessKind::Honey] {
            assert_eq!(kind.category(), ProcessCategory::Honey);
        }
        assert_eq!(ProcessKind::Nitro.category().as_str(), "experimental-nitro");
    }

    #[test]
    fn test_washed_base() {
        let base = process_base(ProcessKind::Washed);
        assert_eq!(base.grind.clicks, Decimal::from(22));
        assert_eq!(base.grind.steps, Decimal::new(35, 1));
        assert_eq!(base.temp, TempRange::new(92, 93));
        assert_eq!(base.ratio, Decimal::from(16));
        assert_eq!(base.style, BrewStyle::Standard);
    }

    #[test]
    fn test_altitude_parsing() {
        assert_eq!(parse_altitude("1850"), 1850);
        assert_eq!(parse_altitude(" 1700 masl"), 1700);
        assert_eq!(parse_altitude("1200-1400"), 1200);
        assert_eq!(parse_altitude("unknown"), DEFAULT_ALTITUDE);
        assert_eq!(parse_altitude(""), DEFAULT_ALTITUDE);
        assert_eq!(parse_altitude("0"), DEFAULT_ALTITUDE);
        assert_eq!(parse_altitude("-20"), -20);
    }

    #[test]
    fn test_altitude_bands() {
        assert_eq!(altitude_band(1199), (AltitudeBand::Low, 2, -1));
        assert_eq!(altitude_band(1200), (AltitudeBand::MidLow, 1, 0));
        assert_eq!(altitude_band(1500), (AltitudeBand::Mid, 0, 0));
        assert_eq!(altitude_band(1600), (AltitudeBand::MidHigh, -1, 0));
        assert_eq!(altitude_band(1800), (AltitudeBand::High, -2, 1));
        assert_eq!(altitude_band(-20), (AltitudeBand::Low, 2, -1));
    }

    #[test]
    fn test_cultivar_and_origin() {
        assert_eq!(classify_cultivar("Ethiopian Heirloom"), CultivarCategory::Balanced);
        assert_eq!(classify_cultivar("Panama Geisha"), CultivarCategory::Delicate);
        assert_eq!(classify_cultivar("SL28, SL34"), CultivarCategory::Delicate);
        assert_eq!(classify_cultivar("Pacamara"), CultivarCategory::Robust);
        assert_eq!(classify_origin("Kenya Nyeri"), OriginRegion::Africa);
        assert_eq!(classify_origin("Sumatra"), OriginRegion::Asia);
        assert_eq!(classify_origin("Colombia"), OriginRegion::LatinAmerica);
    }

    #[test]
    fn test_water_adjustments() {
        assert_eq!(water_adjust(WaterHardnessCategory::VerySoft), (-2, 1));
        assert_eq!(water_adjust(WaterHardnessCategory::Medium), (0, 0));
        assert_eq!(water_adjust(WaterHardnessCategory::VeryHard), (2, -1));
    }

    #[test]
    fn test_method_overrides() {
        let chemex = method_override(BrewMethod::Chemex);
        assert_eq!(chemex.grind_clicks, 4);
        assert_eq!(chemex.ratio_floor, Some(Decimal::new(165, 1)));
        let aeropress = method_override(BrewMethod::AeroPress);
        assert_eq!(aeropress.ratio_cap, Some(Decimal::from(15)));
        assert_eq!(method_override(BrewMethod::V60).target_time, None);
    }
}
