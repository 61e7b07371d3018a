//! Identify a plant from a photo, then advise on it.

use std::sync::Arc;

use cropwise_domain::LocalizedAdvice;

use crate::infrastructure::ports::{LlmError, PlantIdError, PlantIdPort, PlantImage};

use super::AdviceOps;

#[derive(Debug, thiserror::Error)]
pub enum IdentifyError {
    #[error("Empty image")]
    EmptyImage,
    #[error(transparent)]
    PlantId(#[from] PlantIdError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Photo → plant name → localized advice.
pub struct IdentifyPest {
    plant_id: Arc<dyn PlantIdPort>,
    advice: Arc<AdviceOps>,
}

impl IdentifyPest {
    pub fn new(plant_id: Arc<dyn PlantIdPort>, advice: Arc<AdviceOps>) -> Self {
        Self { plant_id, advice }
    }

    pub async fn execute(&self, image: PlantImage) -> Result<LocalizedAdvice, IdentifyError> {
        if image.bytes.is_empty() {
            return Err(IdentifyError::EmptyImage);
        }
        tracing::debug!(
            size = image.bytes.len(),
            media_type = %image.media_type,
            "Identifying plant image"
        );

        let suggestion = self.plant_id.identify(image).await?;
        tracing::info!(suggestion = %suggestion, "Plant identified");

        Ok(self.advice.advise_localized(&suggestion).await?)
    }
}
