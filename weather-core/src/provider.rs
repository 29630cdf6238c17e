use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, CurrentConditions, DailySeries},
    provider::{
        openmeteo::{OpenMeteoArchive, OpenMeteoGeocoder},
        openweather::OpenWeatherClient,
    },
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod openmeteo;
pub mod openweather;

/// Per-request timeout applied by every client.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves a free-text city name to coordinates.
///
/// Every failure mode collapses to `NotFound`: the caller only needs to know
/// whether a usable coordinate pair came back.
#[async_trait]
pub trait GeocodeProvider: Send + Sync + Debug {
    async fn resolve(&self, city: &str) -> Result<Coordinates, WeatherError>;
}

/// Fetches instantaneous weather for a city name.
#[async_trait]
pub trait CurrentProvider: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, WeatherError>;
}

/// Fetches the 30-day daily history for a coordinate pair. The window is
/// recomputed on every call; nothing is cached.
#[async_trait]
pub trait HistoryProvider: Send + Sync + Debug {
    async fn fetch_history(&self, coords: Coordinates) -> Result<DailySeries, WeatherError>;
}

/// The three data sources the interaction flow draws from.
#[derive(Debug, Clone)]
pub struct Providers {
    pub geocoder: Arc<dyn GeocodeProvider>,
    pub current: Arc<dyn CurrentProvider>,
    pub history: Arc<dyn HistoryProvider>,
}

impl Providers {
    /// Construct the default provider set from config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_openweather_api_key()?;

        Ok(Self {
            geocoder: Arc::new(OpenMeteoGeocoder::new()),
            current: Arc::new(OpenWeatherClient::new(api_key)),
            history: Arc::new(OpenMeteoArchive::new()),
        })
    }
}

/// Bound the provider text echoed back to the user.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
