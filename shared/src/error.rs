//! Error types for the brewing core
//!
//! The pipeline itself is total; these errors only surface when a caller
//! hands the core an input that must be rejected at the boundary.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid dose: {0}")]
    InvalidDose(&'static str),

    #[error("Invalid coffee entry: {0}")]
    InvalidEntry(&'static str),

    #[error("Invalid water hardness: {0}")]
    InvalidWaterHardness(&'static str),

    #[error("Invalid postal code: {0}")]
    InvalidPostalCode(&'static str),

    #[error("No coffee at index {0}")]
    CoffeeNotFound(usize),
}

/// Result type alias for fallible core operations
pub type EngineResult<T> = Result<T, EngineError>;
