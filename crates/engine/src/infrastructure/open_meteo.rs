//! Open-Meteo forecast client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use cropwise_domain::{Coordinates, WeatherReport};

use crate::infrastructure::ports::{WeatherError, WeatherPort};

/// Default Open-Meteo API base URL.
pub const DEFAULT_OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1";

const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,pressure_msl";

/// Client for the Open-Meteo forecast API
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WeatherPort for OpenMeteoClient {
    async fn forecast(&self, coords: Coordinates) -> Result<WeatherReport, WeatherError> {
        let response = self
            .client
            .get(format!("{}/forecast", self.base_url))
            .query(&[
                ("latitude", coords.latitude().to_string()),
                ("longitude", coords.longitude().to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(WeatherError::Rejected(status));
        }

        let forecast: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        into_report(forecast)
    }
}

fn into_report(forecast: ForecastResponse) -> Result<WeatherReport, WeatherError> {
    let current = forecast
        .current_weather
        .filter(|current| !current.is_empty())
        .ok_or(WeatherError::CurrentUnavailable)?;
    let hourly = forecast.hourly.unwrap_or_default();

    Ok(WeatherReport {
        temperature: current.get("temperature").and_then(Value::as_f64),
        windspeed: current.get("windspeed").and_then(Value::as_f64),
        humidity: hourly.relative_humidity_2m.first().copied().flatten(),
        pressure: hourly.pressure_msl.first().copied().flatten(),
        hourly_times: hourly.time,
        hourly_temperature: hourly.temperature_2m,
    })
}

// =============================================================================
// Open-Meteo API types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    /// Kept loose: an empty block counts as missing.
    current_weather: Option<Map<String, Value>>,
    hourly: Option<Hourly>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Hourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    pressure_msl: Vec<Option<f64>>,
}
