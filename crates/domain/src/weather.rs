//! Coordinates, forecast snapshots and the farming-tips prompt.

use crate::error::DomainError;

/// Opening instruction for a farming-suggestions session.
pub const ADVISOR_PERSONA: &str =
    "You are an expert agricultural advisor providing practical farming tips.";

/// Number of hourly readings summarized in the prompt.
pub const FORECAST_SUMMARY_HOURS: usize = 6;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidCoordinate {
                axis: "latitude",
                value: latitude,
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinate {
                axis: "longitude",
                value: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Current conditions plus the hourly temperature series for one location.
///
/// Readings the provider did not report are `None`; hourly temperatures may
/// contain gaps as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReport {
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub hourly_times: Vec<String>,
    pub hourly_temperature: Vec<Option<f64>>,
}

impl WeatherReport {
    /// `"{time}: {temp}°C;"` for the first few hours, joined by spaces.
    pub fn forecast_summary(&self) -> String {
        let mut summary = String::new();
        for (time, temp) in self
            .hourly_times
            .iter()
            .zip(&self.hourly_temperature)
            .take(FORECAST_SUMMARY_HOURS)
        {
            summary.push_str(&format!("{}: {}°C; ", time, reading(*temp)));
        }
        summary.trim().to_string()
    }
}

/// Prompt asking for three farming tips suited to `report` at `coords`.
pub fn farming_prompt(coords: &Coordinates, report: &WeatherReport) -> String {
    format!(
        "Given the current weather at latitude {} and longitude {} with temperature {}°C, \
         humidity {}%, the next hours' temperature forecast is as follows: {} \
         Please suggest 3 farming tips or actions best suited for these conditions.\
         Only 3 tips. Small and concise. Nothing else.",
        number(coords.latitude()),
        number(coords.longitude()),
        reading(report.temperature),
        reading(report.humidity),
        report.forecast_summary(),
    )
}

/// Floats keep their fractional part (`20.0`, not `20`).
fn number(value: f64) -> String {
    format!("{value:?}")
}

fn reading(value: Option<f64>) -> String {
    value.map_or_else(|| "unknown".to_string(), number)
}
