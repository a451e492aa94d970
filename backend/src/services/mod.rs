//! Business logic services for the Dripmate sync server

pub mod auth;
pub mod coffees;
pub mod devices;
pub mod preferences;

pub use auth::AuthService;
pub use coffees::CoffeeService;
pub use devices::DeviceService;
pub use preferences::PreferenceService;
