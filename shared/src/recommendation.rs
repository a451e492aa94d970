//! Brew recommendation shown on a coffee card

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::grinder::grind_setting;
use crate::models::{BrewMethod, Coffee, Environment};
use crate::notes::brew_notes;
use crate::pipeline::{compute_final_parameters, AdjustmentTrace, FinalParameterSet};
use crate::rules::ProcessCategory;
use crate::schedule::{generate_steps, water_amount, BrewStep};
use crate::temperature::TempSpec;
use crate::types::{BrewStyle, Dose};

/// Everything the card renders for one coffee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrewRecommendation {
    pub grind_setting: String,
    pub grinder_label: String,
    /// The coffee's override when set, otherwise the computed range
    pub temperature: String,
    /// e.g. `"1:16 (15g)"`
    pub ratio: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub ratio_number: Decimal,
    pub dose: Dose,
    pub water_amount_ml: u32,
    pub steps: Vec<BrewStep>,
    pub steps_heading: String,
    pub target_time: String,
    pub notes: String,
    pub method: BrewMethod,
    pub brew_style: BrewStyle,
    pub category: ProcessCategory,
    pub trace: AdjustmentTrace,
}

/// Run the pipeline and derive every user-facing value from it.
pub fn compute_brew_parameters(coffee: &Coffee, env: &Environment) -> BrewRecommendation {
    let params = compute_final_parameters(coffee, env);
    recommendation_from(coffee, env, &params)
}

pub fn recommendation_from(coffee: &Coffee, env: &Environment, params: &FinalParameterSet) -> BrewRecommendation {
    let dose = coffee.custom_amount.unwrap_or(env.default_dose);
    let grinder = env.preferred_grinder;
    let method = env.preferred_method;

    let temperature = coffee
        .custom_temp
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| TempSpec::from(params.temp_base).to_string());

    BrewRecommendation {
        grind_setting: grind_setting(&params.grind_base, grinder, coffee.grind_offset.unwrap_or(0)),
        grinder_label: grinder.label().to_string(),
        temperature,
        ratio: format!("1:{} ({}g)", params.ratio.normalize(), dose.grams()),
        ratio_number: params.ratio,
        dose,
        water_amount_ml: water_amount(dose, params.ratio),
        steps: generate_steps(dose, params.ratio, params.brew_style, method),
        steps_heading: method.steps_heading().to_string(),
        target_time: params.target_time.clone(),
        notes: brew_notes(params).join(". "),
        method,
        brew_style: params.brew_style,
        category: params.category,
        trace: params.trace,
    }
}
