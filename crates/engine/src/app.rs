//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{LlmPort, PlantIdPort, WeatherPort};
use crate::use_cases;
use crate::use_cases::advice::{AdviceOps, IdentifyPest};
use crate::use_cases::chat::FreeChat;
use crate::use_cases::weather::SuggestFarming;

/// Main application state.
///
/// Holds all use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub advice: use_cases::AdviceUseCases,
    pub weather: use_cases::WeatherUseCases,
    pub chat: use_cases::ChatUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        llm: Arc<dyn LlmPort>,
        plant_id: Arc<dyn PlantIdPort>,
        weather: Arc<dyn WeatherPort>,
    ) -> Self {
        let advise = Arc::new(AdviceOps::new(llm.clone()));
        let identify = Arc::new(IdentifyPest::new(plant_id, advise.clone()));
        let farming_suggestions = Arc::new(SuggestFarming::new(weather, llm.clone()));
        let free_chat = Arc::new(FreeChat::new(llm));

        Self {
            use_cases: UseCases {
                advice: use_cases::AdviceUseCases::new(advise, identify),
                weather: use_cases::WeatherUseCases::new(farming_suggestions),
                chat: use_cases::ChatUseCases::new(free_chat),
            },
        }
    }
}
