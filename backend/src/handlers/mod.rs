//! HTTP handlers for the sync API

pub mod auth;
pub mod coffees;
pub mod health;
pub mod preferences;

pub use auth::{login, register, validate};
pub use coffees::{get_coffees, save_coffees};
pub use health::{health_check, root};
pub use preferences::{get_grinder, get_water_hardness, set_grinder, set_water_hardness};
