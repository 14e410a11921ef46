//! services/api/src/adapters/weather.rs
//!
//! Adapter for an OpenWeather-style forecast API. Implements the
//! `WeatherService` port.

use async_trait::async_trait;
use culturo_core::domain::WeatherSummary;
use culturo_core::ports::{PortError, PortResult, WeatherService};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct WeatherBody {
    #[serde(default)]
    weather: Vec<ConditionBody>,
    main: MainBody,
}

#[derive(Debug, Deserialize)]
struct ConditionBody {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainBody {
    temp_max: f64,
    temp_min: f64,
}

/// An adapter that implements `WeatherService` against the OpenWeather
/// current-conditions API.
#[derive(Clone)]
pub struct OpenWeatherAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherAdapter {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> PortResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Unexpected(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl WeatherService for OpenWeatherAdapter {
    async fn forecast(&self, destination: &str) -> PortResult<WeatherSummary> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PortError::Upstream("weather API key not configured".to_string()))?;

        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("q", destination),
                ("units", "metric"),
                ("appid", api_key),
            ])
            .send()
            .await
            .map_err(map_reqwest)?;

        if !response.status().is_success() {
            return Err(PortError::Upstream(format!(
                "weather API returned status {}",
                response.status()
            )));
        }

        let body: WeatherBody = response.json().await.map_err(map_reqwest)?;
        Ok(WeatherSummary {
            destination: destination.to_string(),
            summary: body
                .weather
                .first()
                .map(|c| c.description.clone())
                .unwrap_or_else(|| "no conditions reported".to_string()),
            high_celsius: body.main.temp_max,
            low_celsius: body.main.temp_min,
        })
    }
}

fn map_reqwest(err: reqwest::Error) -> PortError {
    if err.is_timeout() {
        PortError::Timeout("weather call timed out".to_string())
    } else {
        PortError::Upstream(format!("weather request failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_body_parses() {
        let body: WeatherBody = serde_json::from_str(
            r#"{"weather": [{"description": "light rain"}], "main": {"temp_max": 19.2, "temp_min": 12.4}}"#,
        )
        .unwrap();
        assert_eq!(body.weather[0].description, "light rain");
        assert_eq!(body.main.temp_max, 19.2);
    }
}
