//! HTTP routes.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use cropwise_domain::{Coordinates, LocalizedAdvice};

use crate::app::App;
use crate::infrastructure::ports::{LlmError, PlantIdError, PlantImage, WeatherError};
use crate::use_cases::advice::IdentifyError;
use crate::use_cases::chat::ChatError;
use crate::use_cases::weather::{FarmingSuggestions, SuggestionError};

const NO_IMAGE: &str = "No image file provided";
const NO_JSON: &str = "No JSON data provided";
const PEST_NAME_MISSING: &str = "Pest name missing";
const COORDINATES_MISSING: &str = "Latitude and longitude must be provided";
const COORDINATES_INVALID: &str = "Latitude and longitude must be valid coordinates";
const USER_MESSAGE_MISSING: &str = "Missing 'user_message' in request";
const USER_MESSAGE_NOT_TEXT: &str = "'user_message' must be a string";

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/health", get(health))
        .route("/identify-pest", post(identify_pest))
        .route("/pest-advice", post(pest_advice))
        .route(
            "/weather-farming-suggestions",
            post(weather_farming_suggestions),
        )
        .route("/gemini-chat", post(gemini_chat))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Advice
// =============================================================================

async fn identify_pest(
    State(app): State<Arc<App>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<LocalizedAdvice>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Rejected non-multipart upload");
        ApiError::BadRequest(NO_IMAGE.to_string())
    })?;

    let image = read_image_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::BadRequest(NO_IMAGE.to_string()))?;
    tracing::debug!(size = image.bytes.len(), "Received image upload");

    let advice = app.use_cases.advice.identify.execute(image).await?;
    Ok(Json(advice))
}

/// Find the `image` field and read it whole.
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<PlantImage>, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(multipart_error(e)),
        };

        // File parts only; a plain form value named `image` is not an upload.
        if field.name() != Some("image") || field.file_name().is_none() {
            continue;
        }

        let media_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some(PlantImage::new(bytes.to_vec(), media_type.as_deref())));
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        tracing::debug!(error = %e, "Unreadable multipart body");
        ApiError::BadRequest(NO_IMAGE.to_string())
    }
}

async fn pest_advice(
    State(app): State<Arc<App>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LocalizedAdvice>, ApiError> {
    let data = json_object(body, NO_JSON)?;

    let pest_name = data
        .get("pest_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest(PEST_NAME_MISSING.to_string()))?;
    tracing::debug!(pest_name, "Received pest advice request");

    let advice = app
        .use_cases
        .advice
        .advise
        .advise_localized(pest_name)
        .await?;
    Ok(Json(advice))
}

// =============================================================================
// Weather
// =============================================================================

async fn weather_farming_suggestions(
    State(app): State<Arc<App>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FarmingSuggestions>, ApiError> {
    let data = json_object(body, COORDINATES_MISSING)?;

    let (Some(latitude), Some(longitude)) = (
        data.get("latitude").filter(|v| !v.is_null()),
        data.get("longitude").filter(|v| !v.is_null()),
    ) else {
        return Err(ApiError::BadRequest(COORDINATES_MISSING.to_string()));
    };

    let coords = match (coordinate(latitude), coordinate(longitude)) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon).map_err(|e| {
            tracing::debug!(error = %e, "Rejected coordinates");
            ApiError::BadRequest(COORDINATES_INVALID.to_string())
        })?,
        _ => return Err(ApiError::BadRequest(COORDINATES_INVALID.to_string())),
    };

    let suggestions = app
        .use_cases
        .weather
        .farming_suggestions
        .execute(coords)
        .await?;
    Ok(Json(suggestions))
}

/// Accept numbers and numeric strings, as browsers send either.
fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Chat
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatReply {
    reply: String,
}

async fn gemini_chat(
    State(app): State<Arc<App>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let data = json_object(body, USER_MESSAGE_MISSING)?;

    let message = match data.get("user_message") {
        None => return Err(ApiError::BadRequest(USER_MESSAGE_MISSING.to_string())),
        Some(Value::String(message)) => message,
        Some(_) => return Err(ApiError::BadRequest(USER_MESSAGE_NOT_TEXT.to_string())),
    };

    let reply = app.use_cases.chat.free_chat.execute(message).await?;
    Ok(Json(ChatReply { reply }))
}

/// A non-empty JSON object body, or `BadRequest(missing)`.
fn json_object(
    body: Result<Json<Value>, JsonRejection>,
    missing: &str,
) -> Result<Map<String, Value>, ApiError> {
    match body {
        Ok(Json(Value::Object(map))) if !map.is_empty() => Ok(map),
        Ok(_) => Err(ApiError::BadRequest(missing.to_string())),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected JSON body");
            Err(ApiError::BadRequest(missing.to_string()))
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge,
    /// A provider answered, but not usefully. `details` carries its body.
    Upstream {
        message: String,
        details: Option<String>,
    },
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(msg))).into_response()
            }
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorBody::new("Image too large")),
            )
                .into_response(),
            ApiError::Upstream { message, details } => {
                tracing::warn!(error = %message, details = ?details, "Upstream provider failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: message,
                        details,
                    }),
                )
                    .into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(e: LlmError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<IdentifyError> for ApiError {
    fn from(e: IdentifyError) -> Self {
        match e {
            IdentifyError::EmptyImage => ApiError::BadRequest(NO_IMAGE.to_string()),
            IdentifyError::PlantId(PlantIdError::Rejected { body, .. }) => ApiError::Upstream {
                message: "Plant.ID API failed".to_string(),
                details: Some(body),
            },
            IdentifyError::PlantId(PlantIdError::NoSuggestions) => {
                ApiError::BadRequest("No plant suggestions found".to_string())
            }
            IdentifyError::PlantId(PlantIdError::UnexpectedFormat) => {
                ApiError::BadRequest("Unexpected Plant.ID response format".to_string())
            }
            IdentifyError::PlantId(PlantIdError::Malformed(reason)) => {
                tracing::debug!(reason = %reason, "Plant.id response unreadable");
                ApiError::BadRequest("Could not parse Plant.ID response".to_string())
            }
            IdentifyError::PlantId(e @ PlantIdError::RequestFailed(_)) => {
                ApiError::Internal(e.to_string())
            }
            IdentifyError::Llm(e) => e.into(),
        }
    }
}

impl From<SuggestionError> for ApiError {
    fn from(e: SuggestionError) -> Self {
        match e {
            SuggestionError::Weather(WeatherError::Rejected(status)) => {
                tracing::warn!(status, "Weather provider rejected request");
                ApiError::Upstream {
                    message: "Failed to fetch weather data".to_string(),
                    details: None,
                }
            }
            SuggestionError::Weather(WeatherError::CurrentUnavailable) => ApiError::Upstream {
                message: "Current weather data not available".to_string(),
                details: None,
            },
            SuggestionError::Weather(e @ WeatherError::RequestFailed(_)) => {
                ApiError::Internal(e.to_string())
            }
            SuggestionError::Llm(e) => e.into(),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyMessage => ApiError::BadRequest("Empty message".to_string()),
            ChatError::Llm(e) => e.into(),
        }
    }
}
