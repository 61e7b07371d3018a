//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - LLM calls (could swap Gemini -> Ollama/OpenAI)
//! - Plant identification (could swap Plant.id -> other classifiers)
//! - Weather forecasts (could swap Open-Meteo -> other providers)

use async_trait::async_trait;
use cropwise_domain::{Coordinates, WeatherReport};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlantIdError {
    /// Transport failure or undecodable body
    #[error("Plant identification request failed: {0}")]
    RequestFailed(String),
    /// Provider answered with a non-success status
    #[error("Plant identification returned status {status}")]
    Rejected { status: u16, body: String },
    #[error("No plant suggestions found")]
    NoSuggestions,
    #[error("Unexpected plant identification response format")]
    UnexpectedFormat,
    #[error("Could not parse plant identification response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather request failed: {0}")]
    RequestFailed(String),
    #[error("Weather provider returned status {0}")]
    Rejected(u16),
    #[error("Current weather data not available")]
    CurrentUnavailable,
}

// =============================================================================
// LLM Port
// =============================================================================

/// LLM request/response types
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// The conversation history
    pub messages: Vec<ChatMessage>,
}

impl LlmRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

#[cfg(test)]
impl LlmRequest {
    /// Text of the most recent user turn, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// Response from the LLM
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The generated text content
    pub content: String,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}

// =============================================================================
// Plant Identification Port
// =============================================================================

/// An uploaded plant photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantImage {
    pub bytes: Vec<u8>,
    /// MIME type (e.g., "image/jpeg")
    pub media_type: String,
}

impl PlantImage {
    pub const DEFAULT_MEDIA_TYPE: &'static str = "image/jpeg";

    /// Wrap raw bytes, keeping `media_type` only when it names an image type.
    pub fn new(bytes: Vec<u8>, media_type: Option<&str>) -> Self {
        let media_type = media_type
            .filter(|m| m.starts_with("image/"))
            .unwrap_or(Self::DEFAULT_MEDIA_TYPE)
            .to_string();
        Self { bytes, media_type }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlantIdPort: Send + Sync {
    /// Name of the most likely plant in `image`.
    async fn identify(&self, image: PlantImage) -> Result<String, PlantIdError>;
}

// =============================================================================
// Weather Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Current conditions and hourly forecast at `coords`.
    async fn forecast(&self, coords: Coordinates) -> Result<WeatherReport, WeatherError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plant_image_keeps_image_media_types() {
        let image = PlantImage::new(vec![1, 2, 3], Some("image/png"));
        assert_eq!(image.media_type, "image/png");
    }

    #[test]
    fn plant_image_defaults_to_jpeg() {
        assert_eq!(PlantImage::new(vec![], None).media_type, "image/jpeg");
        assert_eq!(
            PlantImage::new(vec![], Some("application/octet-stream")).media_type,
            "image/jpeg"
        );
    }

    #[test]
    fn last_user_message_skips_assistant_turns() {
        let request = LlmRequest::new(vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
            ChatMessage::assistant("reply two"),
        ]);
        assert_eq!(request.last_user_message(), Some("second"));
        assert_eq!(LlmRequest::new(vec![]).last_user_message(), None);
    }
}
