//! Application configuration

use std::env;

use anyhow::{bail, Context, Result};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::infrastructure::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::infrastructure::open_meteo::DEFAULT_OPEN_METEO_BASE_URL;
use crate::infrastructure::plant_id::DEFAULT_PLANT_ID_BASE_URL;

/// Application configuration loaded from environment
#[derive(Clone)]
pub struct AppConfig {
    /// Plant.id API key
    pub plant_id_api_key: String,
    /// Plant.id API base URL
    pub plant_id_base_url: String,

    /// Google Generative Language API key
    pub google_api_key: String,
    /// Gemini API base URL
    pub gemini_base_url: String,
    /// Gemini model used for every chat session
    pub gemini_model: String,

    /// Open-Meteo API base URL
    pub open_meteo_base_url: String,

    /// Timeout for each outbound provider request
    pub http_timeout_secs: u64,

    /// Interface to bind
    pub server_host: String,
    /// HTTP server port
    pub server_port: u16,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,

    /// CORS allowed origins (comma-separated, or "*" for any)
    pub cors_allowed_origins: Vec<String>,
}

// Keys stay out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("plant_id_api_key", &"<redacted>")
            .field("plant_id_base_url", &self.plant_id_base_url)
            .field("google_api_key", &"<redacted>")
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("open_meteo_base_url", &self.open_meteo_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let plant_id_api_key = lookup("PLANT_ID_API_KEY").filter(|k| !k.trim().is_empty());
        let google_api_key = lookup("GOOGLE_API_KEY").filter(|k| !k.trim().is_empty());

        tracing::debug!(
            plant_id_api_key_loaded = plant_id_api_key.is_some(),
            google_api_key_loaded = google_api_key.is_some(),
            "Checked provider API keys"
        );

        let (Some(plant_id_api_key), Some(google_api_key)) = (plant_id_api_key, google_api_key)
        else {
            bail!("API keys for Plant.ID and Google must be set in environment variables (PLANT_ID_API_KEY, GOOGLE_API_KEY)");
        };

        Ok(Self {
            plant_id_api_key,
            plant_id_base_url: var("PLANT_ID_BASE_URL", DEFAULT_PLANT_ID_BASE_URL),

            google_api_key,
            gemini_base_url: var("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            gemini_model: var("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),

            open_meteo_base_url: var("OPEN_METEO_BASE_URL", DEFAULT_OPEN_METEO_BASE_URL),

            http_timeout_secs: var("HTTP_TIMEOUT_SECS", "120")
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,

            server_host: var("SERVER_HOST", "0.0.0.0"),
            server_port: var("PORT", "5000")
                .parse()
                .context("PORT must be a valid port number")?,
            max_upload_bytes: var("MAX_UPLOAD_BYTES", "10485760")
                .parse()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,

            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}

/// CORS layer for the configured origins.
///
/// `*` anywhere in the list allows any origin. Returns `None` when no
/// origin is usable, leaving cross-origin requests unanswered.
pub fn build_cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    if allowed_origins.is_empty() {
        return None;
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!(?allowed_origins, "No valid CORS origins configured");
        return None;
    }

    Some(cors.allow_origin(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
        routing::get,
        Router,
    };
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn loads_defaults_when_only_keys_are_set() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PLANT_ID_API_KEY", "plant-key"),
            ("GOOGLE_API_KEY", "google-key"),
        ]))
        .unwrap();

        assert_eq!(config.plant_id_api_key, "plant-key");
        assert_eq!(config.google_api_key, "google-key");
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.http_timeout_secs, 120);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.cors_allowed_origins, vec!["*".to_string()]);
    }

    #[test]
    fn fails_without_either_api_key() {
        assert!(AppConfig::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "g")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("PLANT_ID_API_KEY", "p")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[
            ("PLANT_ID_API_KEY", "  "),
            ("GOOGLE_API_KEY", "g"),
        ]))
        .is_err());
    }

    #[test]
    fn reads_port_and_origins() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PLANT_ID_API_KEY", "p"),
            ("GOOGLE_API_KEY", "g"),
            ("PORT", "8080"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn rejects_invalid_port() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("PLANT_ID_API_KEY", "p"),
            ("GOOGLE_API_KEY", "g"),
            ("PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_redacts_keys() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PLANT_ID_API_KEY", "secret-plant"),
            ("GOOGLE_API_KEY", "secret-google"),
        ]))
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-plant"));
        assert!(!rendered.contains("secret-google"));
    }

    #[test]
    fn rejects_invalid_timeout_and_upload_limit() {
        let with = |key: &'static str, value: &'static str| {
            AppConfig::from_lookup(lookup_from(&[
                ("PLANT_ID_API_KEY", "p"),
                ("GOOGLE_API_KEY", "g"),
                (key, value),
            ]))
        };

        assert!(with("HTTP_TIMEOUT_SECS", "soon").is_err());
        assert!(with("HTTP_TIMEOUT_SECS", "-5").is_err());
        assert!(with("MAX_UPLOAD_BYTES", "10MB").is_err());
        assert!(with("MAX_UPLOAD_BYTES", "").is_err());
        assert_eq!(
            with("MAX_UPLOAD_BYTES", "2048").unwrap().max_upload_bytes,
            2048
        );
    }

    async fn allow_origin_for(cors: CorsLayer, origin: &str) -> Option<String> {
        let router = Router::new()
            .route("/health", get(|| async { "OK" }))
            .layer(cors);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn wildcard_origin_allows_any() {
        let cors = build_cors_layer(&["*".to_string()]).unwrap();
        assert_eq!(
            allow_origin_for(cors, "https://farm.example").await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn origin_list_allows_only_listed() {
        let origins = vec![
            "https://a.example".to_string(),
            "https://b.example".to_string(),
        ];

        let cors = build_cors_layer(&origins).unwrap();
        assert_eq!(
            allow_origin_for(cors, "https://b.example").await.as_deref(),
            Some("https://b.example")
        );

        let cors = build_cors_layer(&origins).unwrap();
        assert_eq!(allow_origin_for(cors, "https://evil.example").await, None);
    }

    #[test]
    fn unusable_origins_disable_cors() {
        assert!(build_cors_layer(&[]).is_none());
        assert!(build_cors_layer(&["bad\u{7f}origin".to_string()]).is_none());
    }
}
