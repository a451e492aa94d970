//! Water hardness by German postal code, and manual readings

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{WaterHardness, WaterHardnessCategory};
use crate::validation::{validate_postal_code, validate_water_hardness};

/// Regional reading: `(value °dH, region, supplier)`
type Reading = (i64, &'static str, &'static str);

/// Three-digit prefixes for areas whose two-digit prefix is shared by two
/// suppliers. Ranges are inclusive.
const PREFIX3_TABLE: &[(u16, u16, Reading)] = &[
    (140, 143, (15, "Berlin", "Berliner Wasserbetriebe")),
    (144, 149, (15, "Potsdam", "EWP")),
    (520, 521, (14, "Aachen", "ENWOR")),
    (522, 529, (15, "Köln Umland", "Lokale Versorger")),
    (850, 851, (21, "Ingolstadt", "Stadtwerke Ingolstadt")),
    (852, 859, (22, "München Umland", "Lokale Versorger")),
];

const PREFIX2_TABLE: &[(&str, Reading)] = &[
    ("01", (11, "Dresden", "DREWAG")),
    ("04", (13, "Leipzig", "Leipziger Wasserwerke")),
    ("06", (21, "Halle", "Stadtwerke Halle")),
    ("09", (12, "Chemnitz", "eins energie")),
    ("10", (16, "Berlin", "Berliner Wasserbetriebe")),
    ("12", (18, "Berlin", "Berliner Wasserbetriebe")),
    ("13", (17, "Berlin", "Berliner Wasserbetriebe")),
    ("18", (15, "Rostock", "Stadtwerke Rostock")),
    ("20", (13, "Hamburg", "Hamburg Wasser")),
    ("21", (12, "Hamburg", "Hamburg Wasser")),
    ("22", (14, "Hamburg", "Hamburg Wasser")),
    ("23", (14, "Lübeck", "Stadtwerke Lübeck")),
    ("24", (13, "Kiel", "Stadtwerke Kiel")),
    ("28", (9, "Bremen", "swb")),
    ("30", (10, "Hannover", "enercity")),
    ("31", (11, "Hannover Umland", "Lokale Versorger")),
    ("33", (15, "Bielefeld", "Stadtwerke Bielefeld")),
    ("34", (13, "Kassel", "Städtische Werke Kassel")),
    ("38", (16, "Braunschweig", "BS Energy")),
    ("39", (19, "Magdeburg", "Städtische Werke Magdeburg")),
    ("40", (15, "Düsseldorf", "Stadtwerke Düsseldorf")),
    ("41", (16, "Mönchengladbach", "NEW AG")),
    ("42", (17, "Wuppertal", "WSW")),
    ("44", (16, "Dortmund", "DEW21")),
    ("45", (15, "Essen", "Stadtwerke Essen")),
    ("46", (14, "Bochum", "Stadtwerke Bochum")),
    ("47", (16, "Duisburg", "Stadtwerke Duisburg")),
    ("48", (15, "Münster", "Stadtwerke Münster")),
    ("50", (16, "Köln", "Rheinenergie")),
    ("51", (17, "Köln", "Rheinenergie")),
    ("53", (16, "Bonn", "Stadtwerke Bonn")),
    ("60", (15, "Frankfurt", "Mainova")),
    ("61", (16, "Frankfurt Umland", "Lokale Versorger")),
    ("63", (17, "Frankfurt Umland", "Lokale Versorger")),
    ("64", (18, "Darmstadt Region", "Lokale Versorger")),
    ("65", (14, "Wiesbaden", "ESWE Versorgung")),
    ("66", (14, "Saarbrücken", "Stadtwerke Saarbrücken")),
    ("68", (16, "Mannheim", "MVV Energie")),
    ("69", (17, "Heidelberg", "Stadtwerke Heidelberg")),
    ("70", (13, "Stuttgart", "EnBW")),
    ("71", (14, "Stuttgart Umland", "Lokale Versorger")),
    ("72", (15, "Tübingen Region", "Lokale Versorger")),
    ("73", (16, "Esslingen Region", "Lokale Versorger")),
    ("76", (15, "Karlsruhe", "Stadtwerke Karlsruhe")),
    ("79", (8, "Freiburg", "Badenova")),
    ("80", (19, "München", "Stadtwerke München")),
    ("81", (20, "München", "Stadtwerke München")),
    ("82", (18, "München Umland", "Lokale Versorger")),
    ("86", (18, "Augsburg", "Stadtwerke Augsburg")),
    ("89", (16, "Ulm", "SWU")),
    ("90", (17, "Nürnberg", "N-ERGIE")),
    ("91", (18, "Nürnberg Umland", "Lokale Versorger")),
    ("93", (20, "Regensburg", "REWAG")),
    ("97", (19, "Würzburg", "Würzburger Versorgungs- und Verkehrs GmbH")),
    ("99", (18, "Erfurt", "Stadtwerke Erfurt")),
];

pub const GERMAN_AVERAGE_DH: i64 = 16;
pub const ESTIMATE_REGION: &str = "Deutschland (Schätzwert)";
pub const ESTIMATE_SOURCE: &str = "Durchschnittswert";

fn reading_for(code: &str) -> Option<Reading> {
    let prefix3: u16 = code.get(..3)?.parse().ok()?;
    if let Some((_, _, reading)) = PREFIX3_TABLE
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&prefix3))
    {
        return Some(*reading);
    }
    let prefix2 = code.get(..2)?;
    PREFIX2_TABLE
        .iter()
        .find(|(p, _)| *p == prefix2)
        .map(|(_, reading)| *reading)
}

/// Look up the hardness for a five-digit postal code. Codes outside the
/// table get the German average, flagged as an estimate.
pub fn lookup_postal_code(code: &str) -> EngineResult<WaterHardness> {
    let code = code.trim();
    validate_postal_code(code).map_err(EngineError::InvalidPostalCode)?;

    let (value, region, source, is_estimate) = match reading_for(code) {
        Some((value, region, source)) => (value, region, source, false),
        None => {
            tracing::debug!(code, "no regional hardness data, using national average");
            (GERMAN_AVERAGE_DH, ESTIMATE_REGION, ESTIMATE_SOURCE, true)
        }
    };
    let value = Decimal::from(value);

    Ok(WaterHardness {
        value,
        category: Some(WaterHardnessCategory::from_dh(value)),
        region: region.to_string(),
        source: source.to_string(),
        zip_code: Some(code.to_string()),
        is_estimate,
        is_manual: false,
    })
}

/// A hand-entered reading, 0 < value <= 50 °dH
pub fn manual_hardness(value: Decimal) -> EngineResult<WaterHardness> {
    validate_water_hardness(value).map_err(EngineError::InvalidWaterHardness)?;
    Ok(WaterHardness {
        value,
        category: Some(WaterHardnessCategory::from_dh(value)),
        region: "Manual Entry".to_string(),
        source: "User Input".to_string(),
        zip_code: None,
        is_estimate: false,
        is_manual: true,
    })
}

/// One entry per distinct region, in table order
pub fn available_regions() -> Vec<(&'static str, i64, WaterHardnessCategory)> {
    let mut regions: Vec<(&'static str, i64, WaterHardnessCategory)> = Vec::new();
    let readings = PREFIX3_TABLE
        .iter()
        .map(|(_, _, r)| r)
        .chain(PREFIX2_TABLE.iter().map(|(_, r)| r));
    for (value, region, _) in readings {
        if !regions.iter().any(|(name, ..)| name == region) {
            regions.push((*region, *value, WaterHardnessCategory::from_dh(Decimal::from(*value))));
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(code: &str, region: &str, value: i64) {
        let hardness = lookup_postal_code(code).unwrap();
        assert_eq!(hardness.region, region, "region for {code}");
        assert_eq!(hardness.value, Decimal::from(value), "value for {code}");
    }

    #[test]
    fn test_three_digit_disambiguation() {
        check("14050", "Berlin", 15);
        check("14199", "Berlin", 15);
        check("14467", "Potsdam", 15);
        check("14990", "Potsdam", 15);
        check("52062", "Aachen", 14);
        check("52134", "Aachen", 14);
        check("52249", "Köln Umland", 15);
        check("52999", "Köln Umland", 15);
        check("85049", "Ingolstadt", 21);
        check("85122", "Ingolstadt", 21);
        check("85232", "München Umland", 22);
        check("85599", "München Umland", 22);
    }

    #[test]
    fn test_two_digit_lookup() {
        check("10115", "Berlin", 16);
        check("80331", "München", 19);
        check("50667", "Köln", 16);
        let freiburg = lookup_postal_code("79098").unwrap();
        assert_eq!(freiburg.category, Some(WaterHardnessCategory::Soft));
    }

    #[test]
    fn test_unknown_region_uses_average() {
        for code in ["03042", "98765"] {
            let hardness = lookup_postal_code(code).unwrap();
            assert_eq!(hardness.region, ESTIMATE_REGION);
            assert_eq!(hardness.value, Decimal::from(16));
            assert!(hardness.is_estimate);
        }
    }

    #[test]
    fn test_invalid_codes_are_rejected() {
        assert!(matches!(lookup_postal_code("1234"), Err(EngineError::InvalidPostalCode(_))));
        assert!(matches!(lookup_postal_code("abcde"), Err(EngineError::InvalidPostalCode(_))));
    }

    #[test]
    fn test_manual_hardness() {
        let hardness = manual_hardness(Decimal::new(65, 1)).unwrap();
        assert!(hardness.is_manual);
        assert_eq!(hardness.category(), WaterHardnessCategory::VerySoft);
        assert!(manual_hardness(Decimal::ZERO).is_err());
        assert!(manual_hardness(Decimal::from(51)).is_err());
    }

    #[test]
    fn test_available_regions_are_distinct() {
        let regions = available_regions();
        let berlin = regions.iter().filter(|(name, ..)| *name == "Berlin").count();
        assert_eq!(berlin, 1);
    }
}
