//! Shared brewing core for Dripmate
//!
//! This crate contains the recommendation engine shared between the sync
//! backend and the browser (via WASM): the parameter pipeline, grinder
//! projection, pour schedules, tasting-feedback suggestions and the
//! adjustment history kept on every coffee.

pub mod adjustments;
pub mod error;
pub mod feedback;
pub mod freshness;
pub mod grinder;
pub mod history;
pub mod library;
pub mod models;
pub mod notes;
pub mod pipeline;
pub mod recommendation;
pub mod rules;
pub mod schedule;
pub mod sync;
pub mod temperature;
pub mod timer;
pub mod types;
pub mod validation;
pub mod water;

pub use adjustments::{
    apply_suggestion, ensure_initial_values, initial_values, migrate_initial_values,
    record_manual_adjustment, reset_adjustments, BaselineValues, ManualAdjustment,
};
pub use error::{EngineError, EngineResult};
pub use feedback::{compute_suggestion, AdjustmentProposal, BalancedNotice, Suggestion};
pub use models::*;
pub use pipeline::{compute_final_parameters, FinalParameterSet};
pub use recommendation::{compute_brew_parameters, BrewRecommendation};
pub use types::*;
