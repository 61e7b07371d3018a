//! Weather-based farming suggestions.

use std::sync::Arc;

use serde::Serialize;

use cropwise_domain::{farming_prompt, Coordinates, ADVISOR_PERSONA};

use crate::infrastructure::ports::{LlmError, LlmPort, WeatherError, WeatherPort};
use crate::use_cases::chat::ChatSession;

/// Container for weather use cases.
pub struct WeatherUseCases {
    pub farming_suggestions: Arc<SuggestFarming>,
}

impl WeatherUseCases {
    pub fn new(farming_suggestions: Arc<SuggestFarming>) -> Self {
        Self {
            farming_suggestions,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Forecast excerpt plus model-written tips, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmingSuggestions {
    pub temperature: Option<f64>,
    pub hourly_times: Vec<String>,
    pub hourly_temperature: Vec<Option<f64>>,
    pub farming_suggestions: String,
}

/// Fetches the forecast for a location and asks the model for three tips.
pub struct SuggestFarming {
    weather: Arc<dyn WeatherPort>,
    llm: Arc<dyn LlmPort>,
}

impl SuggestFarming {
    pub fn new(weather: Arc<dyn WeatherPort>, llm: Arc<dyn LlmPort>) -> Self {
        Self { weather, llm }
    }

    pub async fn execute(&self, coords: Coordinates) -> Result<FarmingSuggestions, SuggestionError> {
        let report = self.weather.forecast(coords).await?;
        tracing::debug!(
            latitude = coords.latitude(),
            longitude = coords.longitude(),
            temperature = ?report.temperature,
            windspeed = ?report.windspeed,
            pressure = ?report.pressure,
            hours = report.hourly_times.len(),
            "Forecast received"
        );

        let mut session = ChatSession::new(self.llm.clone());
        session.send(ADVISOR_PERSONA).await?;
        let tips = session.send(farming_prompt(&coords, &report)).await?;

        Ok(FarmingSuggestions {
            temperature: report.temperature,
            hourly_times: report.hourly_times,
            hourly_temperature: report.hourly_temperature,
            farming_suggestions: tips,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{LlmResponse, MockLlmPort, MockWeatherPort};
    use cropwise_domain::WeatherReport;
    use mockall::Sequence;

    fn report() -> WeatherReport {
        WeatherReport {
            temperature: Some(29.0),
            windspeed: Some(11.0),
            humidity: Some(58.0),
            pressure: Some(1010.0),
            hourly_times: vec!["2025-06-01T00:00".into(), "2025-06-01T01:00".into()],
            hourly_temperature: vec![Some(26.5), Some(26.0)],
        }
    }

    #[tokio::test]
    async fn combines_forecast_with_tips() {
        let coords = Coordinates::new(17.0, 78.0).unwrap();

        let mut weather = MockWeatherPort::new();
        weather
            .expect_forecast()
            .withf(move |c| *c == coords)
            .times(1)
            .returning(|_| Ok(report()));

        let mut llm = MockLlmPort::new();
        let mut seq = Sequence::new();
        llm.expect_generate()
            .withf(|request| {
                request.messages.len() == 1
                    && request.last_user_message() == Some(ADVISOR_PERSONA)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(LlmResponse::text("Understood.")));
        llm.expect_generate()
            .withf(|request| {
                request.messages.len() == 3
                    && request.messages[1].content == "Understood."
                    && request.last_user_message().is_some_and(|m| {
                        m.contains("latitude 17.0 and longitude 78.0")
                            && m.contains("humidity 58.0%")
                            && m.contains("2025-06-01T01:00: 26.0°C;")
                    })
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(LlmResponse::text("1. Irrigate early\n")));

        let result = SuggestFarming::new(Arc::new(weather), Arc::new(llm))
            .execute(coords)
            .await
            .unwrap();

        assert_eq!(
            result,
            FarmingSuggestions {
                temperature: Some(29.0),
                hourly_times: vec!["2025-06-01T00:00".into(), "2025-06-01T01:00".into()],
                hourly_temperature: vec![Some(26.5), Some(26.0)],
                farming_suggestions: "1. Irrigate early\n".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn persona_failure_stops_before_prompt() {
        let mut weather = MockWeatherPort::new();
        weather.expect_forecast().returning(|_| Ok(report()));
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(1)
            .returning(|_| Err(LlmError::RequestFailed("unavailable".into())));

        let result = SuggestFarming::new(Arc::new(weather), Arc::new(llm))
            .execute(Coordinates::new(0.0, 0.0).unwrap())
            .await;

        assert!(matches!(result, Err(SuggestionError::Llm(_))));
    }

    #[tokio::test]
    async fn weather_failure_skips_llm() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_forecast()
            .returning(|_| Err(WeatherError::CurrentUnavailable));
        let mut llm = MockLlmPort::new();
        llm.expect_generate().never();

        let result = SuggestFarming::new(Arc::new(weather), Arc::new(llm))
            .execute(Coordinates::new(0.0, 0.0).unwrap())
            .await;

        assert!(matches!(
            result,
            Err(SuggestionError::Weather(WeatherError::CurrentUnavailable))
        ));
    }
}
