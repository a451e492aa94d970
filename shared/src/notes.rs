//! Brew notes written from the adjustment trace

use crate::freshness::RoastStage;
use crate::models::BrewMethod;
use crate::pipeline::FinalParameterSet;
use crate::rules::{AltitudeBand, CultivarCategory, OriginRegion, ProcessCategory};

pub fn category_note(category: ProcessCategory) -> &'static str {
    match category {
        ProcessCategory::ExperimentalNitro => {
            "Nitro process - very delicate, preserve volatile compounds"
        }
        ProcessCategory::AnaerobicNatural => "Anaerobic natural - funky & fruity, control extraction",
        ProcessCategory::AnaerobicWashed => "Anaerobic washed - clean but complex, cooler temp",
        ProcessCategory::Carbonic => "Carbonic maceration - wine-like characteristics, slow extraction",
        ProcessCategory::ExtendedFermentation => {
            "Extended fermentation - intense flavors, careful extraction"
        }
        ProcessCategory::Yeast => "Yeast inoculated - unique fermentation notes, standard approach",
        ProcessCategory::Honey => "Honey process - sweet & fruity, balanced extraction",
        ProcessCategory::Natural => "Natural process - full fruit body, coarser grind",
        ProcessCategory::Washed => "Washed process - clean & bright, standard parameters",
    }
}

/// Sentences in pipeline order, starting with the process note
pub fn brew_notes(params: &FinalParameterSet) -> Vec<&'static str> {
    let trace = &params.trace;
    let mut notes = vec![category_note(params.category)];

    match trace.altitude.band {
        AltitudeBand::High => notes.push("High altitude beans - very dense, ground finer"),
        AltitudeBand::Low => notes.push("Low altitude beans - softer, ground coarser"),
        _ => {}
    }

    match trace.cultivar.category {
        CultivarCategory::Delicate => notes.push("Delicate cultivar - gentle extraction, lower temp"),
        CultivarCategory::Robust => {
            notes.push("Robust cultivar - can handle higher temps & coarser grind")
        }
        CultivarCategory::Balanced => {}
    }

    match trace.origin.region {
        OriginRegion::Africa => notes.push("African origin - floral notes, finer grind"),
        OriginRegion::Asia => notes.push("Asian origin - earthy body, coarser grind"),
        OriginRegion::LatinAmerica => {}
    }

    if let Some(water) = &trace.water {
        if water.category.is_soft() {
            notes.push("Soft water - ground finer, higher temp");
        } else if water.category.is_hard() {
            notes.push("Hard water - ground coarser, consider filtering");
        }
    }

    match trace.roast.stage {
        RoastStage::Resting => notes.push("Fresh roast - still degassing, slightly cooler water"),
        RoastStage::Fading => notes.push("Older roast - slightly hotter water to lift flavor"),
        _ => {}
    }

    match trace.method.method {
        BrewMethod::Chemex => notes.push("Chemex - thick filter, coarser grind & longer drawdown"),
        BrewMethod::AeroPress => notes.push("AeroPress - immersion brew, finer grind & short steep"),
        BrewMethod::V60 => {}
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coffee, Environment};
    use crate::pipeline::compute_final_parameters;

    #[test]
    fn test_plain_coffee_has_only_process_note() {
        let params = compute_final_parameters(
            &Coffee::new("A", "Colombia", "Washed"),
            &Environment::default(),
        );
        assert_eq!(brew_notes(&params), vec!["Washed process - clean & bright, standard parameters"]);
    }

    #[test]
    fn test_trace_drives_notes() {
        let coffee = Coffee {
            altitude: "2000".into(),
            cultivar: "Geisha".into(),
            ..Coffee::new("A", "Ethiopia", "Natural")
        };
        let env = Environment::default().with_method(BrewMethod::Chemex);
        let notes = brew_notes(&compute_final_parameters(&coffee, &env));
        assert_eq!(
            notes,
            vec![
                "Natural process - full fruit body, coarser grind",
                "High altitude beans - very dense, ground finer",
                "Delicate cultivar - gentle extraction, lower temp",
                "African origin - floral notes, finer grind",
                "Chemex - thick filter, coarser grind & longer drawdown",
            ]
        );
    }
}
