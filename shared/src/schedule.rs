//! Pour schedules

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BrewMethod;
use crate::types::{round_grams, BrewStyle, Dose};

/// One timed instruction; `time` is the nominal start as `M:SS`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrewStep {
    pub time: String,
    pub action: String,
}

impl BrewStep {
    fn new(time: &str, action: String) -> Self {
        Self {
            time: time.to_string(),
            action,
        }
    }
}

/// Total brew water in grams: `round(dose * ratio)`
pub fn water_amount(dose: Dose, ratio: Decimal) -> u32 {
    round_grams(dose.as_decimal() * ratio)
}

fn share(total: u32, percent: i64) -> u32 {
    round_grams(Decimal::from(total) * Decimal::new(percent, 2))
}

/// Ordered pour sequence for a dose, ratio, style and method
pub fn generate_steps(dose: Dose, ratio: Decimal, style: BrewStyle, method: BrewMethod) -> Vec<BrewStep> {
    let total = water_amount(dose, ratio);
    match method {
        BrewMethod::AeroPress => aeropress_steps(total),
        BrewMethod::Chemex => chemex_steps(dose, total),
        BrewMethod::V60 => v60_steps(dose, total, style),
    }
}

fn aeropress_steps(total: u32) -> Vec<BrewStep> {
    let bloom = share(total, 25);
    vec![
        BrewStep::new("0:00", format!("Invert & bloom: {bloom}g water, stir gently")),
        BrewStep::new("0:30", format!("To {total}g: Fill to total")),
        BrewStep::new("1:00", "Cap & steep".to_string()),
        BrewStep::new("1:45", "Flip & press gently (30 sec)".to_string()),
    ]
}

fn chemex_steps(dose: Dose, total: u32) -> Vec<BrewStep> {
    let bloom = round_grams(dose.as_decimal() * Decimal::from(3));
    vec![
        BrewStep::new("0:00", format!("Bloom: {bloom}g water, wait 45 sec")),
        BrewStep::new("0:45", format!("To {}g: Slow spiral pour", share(total, 40))),
        BrewStep::new("1:45", format!("To {}g: Keep the bed level", share(total, 70))),
        BrewStep::new("2:45", format!("To {total}g: Final pour, let it drain")),
    ]
}

fn v60_steps(dose: Dose, total: u32, style: BrewStyle) -> Vec<BrewStep> {
    let bloom_factor = match style {
        BrewStyle::Slow => Decimal::new(35, 1),
        _ => Decimal::from(3),
    };
    let bloom = round_grams(dose.as_decimal() * bloom_factor);

    match style {
        BrewStyle::Slow => vec![
            BrewStep::new("0:00", format!("Bloom: {bloom}g water, wait 45 sec")),
            BrewStep::new("0:45", format!("To {}g: Very slow circular pour", share(total, 45))),
            BrewStep::new("1:30", format!("To {}g: Continue slowly", share(total, 75))),
            BrewStep::new("2:15", format!("To {total}g: Final pour")),
        ],
        BrewStyle::Fruity => vec![
            BrewStep::new("0:00", format!("Bloom: {bloom}g, create crater, 45 sec")),
            BrewStep::new("0:45", format!("To {}g: Pour slowly", share(total, 52))),
            BrewStep::new("1:20", format!("To {}g: Concentric circles", share(total, 84))),
            BrewStep::new("1:50", format!("To {total}g: Final pour")),
        ],
        BrewStyle::Standard | BrewStyle::Controlled => vec![
            BrewStep::new("0:00", format!("Bloom: {bloom}g water, 30-40 sec")),
            BrewStep::new("0:40", format!("To {}g: Pour evenly", share(total, 50))),
            BrewStep::new("1:15", format!("To {}g: Concentric circles", share(total, 83))),
            BrewStep::new("1:45", format!("To {total}g: Final pour")),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dose(g: i64) -> Dose {
        Dose::new(g).unwrap()
    }

    #[test]
    fn test_standard_v60() {
        let steps = generate_steps(dose(15), Decimal::from(16), BrewStyle::Standard, BrewMethod::V60);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].action, "Bloom: 45g water, 30-40 sec");
        assert_eq!(steps[1].action, "To 120g: Pour evenly");
        assert_eq!(steps[2].action, "To 199g: Concentric circles");
        assert_eq!(steps[3].action, "To 240g: Final pour");
        assert_eq!(steps[3].time, "1:45");
    }

    #[test]
    fn test_slow_v60_blooms_longer() {
        let steps = generate_steps(dose(15), Decimal::new(155, 1), BrewStyle::Slow, BrewMethod::V60);
        // 15 * 15.5 = 232.5 -> 233; bloom 52.5 -> 53
        assert_eq!(steps[0].action, "Bloom: 53g water, wait 45 sec");
        assert_eq!(steps[1].action, "To 105g: Very slow circular pour");
        assert_eq!(steps[2].action, "To 175g: Continue slowly");
        assert_eq!(steps[3].action, "To 233g: Final pour");
    }

    #[test]
    fn test_fruity_v60() {
        let steps = generate_steps(dose(15), Decimal::new(167, 1), BrewStyle::Fruity, BrewMethod::V60);
        // 250.5 -> 251
        assert_eq!(steps[1].action, "To 131g: Pour slowly");
        assert_eq!(steps[2].action, "To 211g: Concentric circles");
        assert_eq!(steps[3].action, "To 251g: Final pour");
    }

    #[test]
    fn test_chemex_spacing() {
        let steps = generate_steps(dose(20), Decimal::new(165, 1), BrewStyle::Standard, BrewMethod::Chemex);
        let times: Vec<&str> = steps.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, ["0:00", "0:45", "1:45", "2:45"]);
        assert_eq!(steps[0].action, "Bloom: 60g water, wait 45 sec");
        assert_eq!(steps[1].action, "To 132g: Slow spiral pour");
        assert_eq!(steps[3].action, "To 330g: Final pour, let it drain");
    }

    #[test]
    fn test_aeropress_ignores_style() {
        let steps = generate_steps(dose(15), Decimal::from(15), BrewStyle::Fruity, BrewMethod::AeroPress);
        assert_eq!(steps[0].action, "Invert & bloom: 56g water, stir gently");
        assert_eq!(steps[1].action, "To 225g: Fill to total");
        assert_eq!(steps[3].time, "1:45");
    }

    #[test]
    fn test_water_amount_rounds() {
        assert_eq!(water_amount(dose(15), Decimal::new(167, 1)), 251);
        assert_eq!(water_amount(dose(18), Decimal::from(16)), 288);
    }
}
