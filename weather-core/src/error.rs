use thiserror::Error;

/// Closed set of failure kinds surfaced by the data clients.
///
/// Every client operation maps its failures into exactly one of these; the
/// interaction flow turns them into user-visible messages and nothing is
/// retried or escalated.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request never produced a usable HTTP response.
    #[error("network failure: {0}")]
    Network(String),

    /// The provider answered with a non-success status or an unreadable
    /// payload. Carries the raw (truncated) provider text.
    #[error("{0}")]
    Provider(String),

    /// The geocoding index has no entry for the requested city.
    #[error("no coordinates found for this city")]
    NotFound,
}

/// Failure while drawing or encoding the history chart.
#[derive(Debug, Error)]
#[error("chart rendering failed: {0}")]
pub struct ChartError(pub String);
