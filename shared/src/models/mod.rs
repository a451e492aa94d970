//! Domain models for the Dripmate brewing core

mod adjustment;
mod coffee;
mod environment;
mod equipment;
mod feedback;
mod water;

pub use adjustment::*;
pub use coffee::*;
pub use environment::*;
pub use equipment::*;
pub use feedback::*;
pub use water::*;
