use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::CurrentConditions,
    provider::{CurrentProvider, REQUEST_TIMEOUT, truncate_body},
};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeatherMap current-conditions client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[async_trait]
impl CurrentProvider for OpenWeatherClient {
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("q", city),
                ("lang", "en"),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        if !status.is_success() {
            debug!(%status, "current weather request rejected");
            return Err(WeatherError::Provider(format!(
                "current weather request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Provider(format!("unexpected current weather payload: {e}")))?;

        let (condition_code, description) = parsed
            .weather
            .first()
            .map(|w| (w.id, w.description.clone()))
            .unwrap_or((0, "unknown".to_string()));

        Ok(CurrentConditions {
            temperature_c: round1(parsed.main.temp),
            description,
            condition_code,
        })
    }
}

/// Round to one decimal for display.
fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
