//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area.
//! Use cases orchestrate across infrastructure ports to fulfill user stories.

pub mod advice;
pub mod chat;
pub mod weather;

// Re-export main types
pub use advice::AdviceUseCases;
pub use chat::ChatUseCases;
pub use weather::WeatherUseCases;
