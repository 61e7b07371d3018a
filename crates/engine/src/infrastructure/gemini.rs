//! Google Gemini LLM client (Generative Language `generateContent` API)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole};

/// Client for the Gemini REST API
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// Default Generative Language API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl LlmPort for GeminiClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let api_request = build_request(&request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .map_err(|e| LlmError::RequestFailed(e.to_string()))?;
            return Err(LlmError::RequestFailed(format!(
                "{}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        convert_response(api_response)
    }
}

fn build_request(request: &LlmRequest) -> GenerateContentRequest {
    let contents = request
        .messages
        .iter()
        .map(|msg| Content {
            role: Some(
                match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                }
                .to_string(),
            ),
            parts: vec![Part {
                text: Some(msg.content.clone()),
            }],
        })
        .collect();

    GenerateContentRequest { contents }
}

fn convert_response(response: GenerateContentResponse) -> Result<LlmResponse, LlmError> {
    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        LlmError::InvalidResponse(format!("No candidates in Gemini response ({reason})"))
    })?;

    let content: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let blocked = matches!(
        candidate.finish_reason.as_deref(),
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")
    );
    if content.is_empty() && blocked {
        return Err(LlmError::InvalidResponse(
            "Gemini response was blocked by safety filters".to_string(),
        ));
    }

    Ok(LlmResponse::text(content))
}

// =============================================================================
// Gemini API types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::ChatMessage;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(&server.uri(), DEFAULT_GEMINI_MODEL, "test-key", 5)
    }

    #[test]
    fn build_request_maps_roles() {
        let request = LlmRequest::new(vec![
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi there"),
        ]);

        let body = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "Hello"}]},
                    {"role": "model", "parts": [{"text": "Hi there"}]}
                ]
            })
        );
    }

    #[tokio::test]
    async fn generate_joins_candidate_text_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "Name this crop"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Rice "}, {"text": "(paddy)"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 3, "totalTokenCount": 7}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .generate(LlmRequest::new(vec![ChatMessage::user("Name this crop")]))
            .await
            .unwrap();

        assert_eq!(response.content, "Rice (paddy)");
    }

    #[tokio::test]
    async fn generate_reports_status_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let error = client_for(&server)
            .generate(LlmRequest::new(vec![ChatMessage::user("Hi")]))
            .await
            .unwrap_err();

        match error {
            LlmError::RequestFailed(msg) => {
                assert!(msg.starts_with("403"));
                assert!(msg.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_rejects_blocked_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let error = client_for(&server)
            .generate(LlmRequest::new(vec![ChatMessage::user("Hi")]))
            .await
            .unwrap_err();

        match error {
            LlmError::InvalidResponse(msg) => assert!(msg.contains("SAFETY")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn safety_stop_without_text_is_an_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(convert_response(response).is_err());
    }

    #[test]
    fn truncated_reply_keeps_partial_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "partial"}]},
                "finishReason": "MAX_TOKENS"
            }]
        }))
        .unwrap();
        let converted = convert_response(response).unwrap();
        assert_eq!(converted.content, "partial");
    }
}
