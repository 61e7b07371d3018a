//! Cropwise Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cropwise_engine::{
    api,
    infrastructure::{
        config::{build_cors_layer, AppConfig},
        gemini::GeminiClient, open_meteo::OpenMeteoClient,
        plant_id::PlantIdClient,
    },
    App,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root, then the working directory.
    load_dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cropwise_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Cropwise Engine");

    // Load configuration; missing API keys abort startup
    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    // Create infrastructure clients
    let llm = Arc::new(GeminiClient::new(
        &config.gemini_base_url,
        &config.gemini_model,
        &config.google_api_key,
        config.http_timeout_secs,
    ));
    tracing::info!(model = %config.gemini_model, "Gemini client configured");
    let plant_id = Arc::new(PlantIdClient::new(
        &config.plant_id_base_url,
        &config.plant_id_api_key,
        config.http_timeout_secs,
    ));
    let weather = Arc::new(OpenMeteoClient::new(
        &config.open_meteo_base_url,
        config.http_timeout_secs,
    ));

    // Create application
    let app = Arc::new(App::new(llm, plant_id, weather));

    let mut router = api::http::routes()
        .with_state(app)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(&config.cors_allowed_origins) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}
