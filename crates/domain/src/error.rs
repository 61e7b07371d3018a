//! Error types for the domain layer

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Coordinate outside the valid range or not a finite number
    #[error("Invalid {axis}: {value}")]
    InvalidCoordinate { axis: &'static str, value: f64 },
}
