//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod config;
pub mod gemini;
pub mod open_meteo;
pub mod plant_id;
pub mod ports;
