use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{Coordinates, DailyRecord, DailySeries},
    provider::{GeocodeProvider, HistoryProvider, REQUEST_TIMEOUT, truncate_body},
};

const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1";
const ARCHIVE_BASE_URL: &str = "https://archive-api.open-meteo.com/v1";

/// Length of the history window, in days back from today.
pub const HISTORY_WINDOW_DAYS: i64 = 30;

/// Open-Meteo geocoding search client.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    base_url: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new() -> Self {
        Self::with_base_url(GEOCODING_BASE_URL.to_string())
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }
}

impl Default for OpenMeteoGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[async_trait]
impl GeocodeProvider for OpenMeteoGeocoder {
    async fn resolve(&self, city: &str) -> Result<Coordinates, WeatherError> {
        let url = format!("{}/search", self.base_url);

        let res = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await
            .map_err(|_| WeatherError::NotFound)?;

        if !res.status().is_success() {
            return Err(WeatherError::NotFound);
        }

        let parsed: GeoResponse = res.json().await.map_err(|_| WeatherError::NotFound)?;

        parsed
            .results
            .first()
            .map(|r| Coordinates {
                latitude: r.latitude,
                longitude: r.longitude,
            })
            .ok_or(WeatherError::NotFound)
    }
}

/// Open-Meteo daily-archive client.
#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    base_url: String,
    http: Client,
}

impl OpenMeteoArchive {
    pub fn new() -> Self {
        Self::with_base_url(ARCHIVE_BASE_URL.to_string())
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }
}

impl Default for OpenMeteoArchive {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f32>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f32>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f32>>,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<ArchiveDaily>,
}

#[async_trait]
impl HistoryProvider for OpenMeteoArchive {
    async fn fetch_history(&self, coords: Coordinates) -> Result<DailySeries, WeatherError> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(HISTORY_WINDOW_DAYS);

        let url = format!("{}/archive", self.base_url);
        debug!(lat = coords.latitude, lon = coords.longitude, %start, %end, "fetching daily history");

        let res = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                (
                    "daily",
                    "temperature_2m_min,temperature_2m_max,wind_speed_10m_max".to_string(),
                ),
                ("wind_speed_unit", "ms".to_string()),
                ("timezone", "UTC".to_string()),
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
            debug!(%status, "history request rejected");
            return Err(WeatherError::Provider(format!(
                "history request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: ArchiveResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Provider(format!("unexpected history payload: {e}")))?;

        let daily = parsed.daily.ok_or_else(|| {
            WeatherError::Provider("history response contained no daily data".to_string())
        })?;

        let series = daily_to_series(daily);
        if series.is_empty() {
            return Err(WeatherError::Provider(
                "history provider returned no days for this location".to_string(),
            ));
        }

        Ok(series)
    }
}

/// Zip the provider's parallel per-field arrays into one record per day,
/// preserving order and per-day gaps.
fn daily_to_series(daily: ArchiveDaily) -> DailySeries {
    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| DailyRecord {
            date: *date,
            min_temp_c: daily.temperature_2m_min.get(i).copied().flatten(),
            max_temp_c: daily.temperature_2m_max.get(i).copied().flatten(),
            wind_speed_mps: daily.wind_speed_10m_max.get(i).copied().flatten(),
        })
        .collect()
}
