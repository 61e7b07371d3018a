//! Cropwise domain types.
//!
//! Pure values and string templating shared by the engine: advice topics and
//! their prompts, the fixed label translations, and weather reports. Nothing
//! here performs I/O.

pub mod advice;
pub mod error;
pub mod language;
pub mod weather;

pub use advice::{advice_prompt, AdviceSheet, AdviceTopic, LocalizedAdvice, BRIEF_INSTRUCTION};
pub use error::DomainError;
pub use language::Language;
pub use weather::{farming_prompt, Coordinates, WeatherReport, ADVISOR_PERSONA};
