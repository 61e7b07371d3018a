//! Plant.id identification client
//!
//! Implements the PlantIdPort trait using Plant.id's v3 identification API.

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::infrastructure::ports::{PlantIdError, PlantIdPort, PlantImage};

/// Default Plant.id API base URL.
pub const DEFAULT_PLANT_ID_BASE_URL: &str = "https://plant.id/api/v3";

/// Client for Plant.id API
#[derive(Clone)]
pub struct PlantIdClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PlantIdClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl PlantIdPort for PlantIdClient {
    async fn identify(&self, image: PlantImage) -> Result<String, PlantIdError> {
        let request = IdentificationRequest {
            images: vec![data_uri(&image)],
        };

        let response = self
            .client
            .post(format!("{}/identification", self.base_url))
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PlantIdError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        tracing::debug!(status, "Plant.id responded");

        if status != 200 && status != 201 {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PlantIdError::Rejected { status, body });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| PlantIdError::RequestFailed(e.to_string()))?;

        if let Some(keys) = data.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>()) {
            tracing::debug!(?keys, "Plant.id response keys");
        }

        extract_suggestion(&data)
    }
}

/// Encode an image as the `data:` URI Plant.id expects.
fn data_uri(image: &PlantImage) -> String {
    format!(
        "data:{};base64,{}",
        image.media_type,
        base64::engine::general_purpose::STANDARD.encode(&image.bytes)
    )
}

/// Pull the top plant name out of an identification response.
///
/// Understands the v3 shape (`result.classification.suggestions[].name`) and
/// the older v2 shape (`suggestions[].plant_name`).
pub fn extract_suggestion(data: &Value) -> Result<String, PlantIdError> {
    let classification = data.get("result").and_then(|r| r.get("classification"));

    if let Some(classification) = classification {
        let first = match classification.get("suggestions") {
            None => {
                return Err(PlantIdError::Malformed(
                    "missing classification suggestions".into(),
                ))
            }
            Some(Value::Null) => return Err(PlantIdError::NoSuggestions),
            Some(Value::Array(suggestions)) => {
                suggestions.first().ok_or(PlantIdError::NoSuggestions)?
            }
            Some(_) => {
                return Err(PlantIdError::Malformed(
                    "classification suggestions is not a list".into(),
                ))
            }
        };
        return first
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PlantIdError::Malformed("suggestion has no name".into()));
    }

    if let Some(suggestions) = data.get("suggestions") {
        return suggestions
            .get(0)
            .and_then(|s| s.get("plant_name"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PlantIdError::Malformed("suggestion has no plant_name".into()));
    }

    Err(PlantIdError::UnexpectedFormat)
}

#[derive(Debug, Serialize)]
struct IdentificationRequest {
    images: Vec<String>,
}
