//! Integration tests for the HTTP clients against a mock server, covering
//! success, provider-rejection and malformed-payload scenarios.

use weather_core::{
    Coordinates, CurrentProvider, GeocodeProvider, HistoryProvider, WeatherError,
    provider::{
        openmeteo::{OpenMeteoArchive, OpenMeteoGeocoder},
        openweather::OpenWeatherClient,
    },
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_weather_body() -> serde_json::Value {
    serde_json::json!({
        "main": { "temp": 15.35 },
        "weather": [ { "id": 800, "description": "clear sky" } ]
    })
}

fn archive_body() -> serde_json::Value {
    serde_json::json!({
        "daily": {
            "time": ["2026-07-05", "2026-07-06", "2026-07-07"],
            "temperature_2m_min": [10.1, null, 11.8],
            "temperature_2m_max": [19.5, 21.0, 20.2],
            "wind_speed_10m_max": [3.2, 4.0, null]
        }
    })
}

// ----------------------------------------------------------------------------
// Current conditions
// ----------------------------------------------------------------------------

#[tokio::test]
async fn current_success_rounds_temperature() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("lang", "en"))
        .and(query_param("appid", "KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
    let conditions = client.fetch_current("London").await.expect("should succeed");

    assert_eq!(format!("{:.1}", conditions.temperature_c), "15.4");
    assert_eq!(conditions.description, "clear sky");
    assert_eq!(conditions.condition_code, 800);
}

#[tokio::test]
async fn current_non_success_carries_provider_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("BAD".to_string(), server.uri());
    let err = client.fetch_current("London").await.unwrap_err();

    let WeatherError::Provider(text) = err else {
        panic!("expected a provider error, got {err:?}");
    };
    assert!(text.contains("401"));
    assert!(text.contains("Invalid API key"));
}

#[tokio::test]
async fn current_malformed_payload_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".to_string(), server.uri());
    let err = client.fetch_current("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Provider(_)), "got {err:?}");
}

// ----------------------------------------------------------------------------
// Geocoding
// ----------------------------------------------------------------------------

#[tokio::test]
async fn geocoder_returns_first_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "London"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                { "latitude": 51.50853, "longitude": -0.12574 },
                { "latitude": 42.98339, "longitude": -81.23304 }
            ]
        })))
        .mount(&server)
        .await;

    let geocoder = OpenMeteoGeocoder::with_base_url(server.uri());
    let coords = geocoder.resolve("London").await.expect("should resolve");

    assert!((coords.latitude - 51.50853).abs() < 1e-9);
    assert!((coords.longitude - -0.12574).abs() < 1e-9);
}

#[tokio::test]
async fn geocoder_empty_results_mean_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": []
        })))
        .mount(&server)
        .await;

    let geocoder = OpenMeteoGeocoder::with_base_url(server.uri());
    let err = geocoder.resolve("Nonexistentville").await.unwrap_err();
    assert!(matches!(err, WeatherError::NotFound));
}

#[tokio::test]
async fn geocoder_missing_results_field_means_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.5
        })))
        .mount(&server)
        .await;

    let geocoder = OpenMeteoGeocoder::with_base_url(server.uri());
    let err = geocoder.resolve("Nowhere").await.unwrap_err();
    assert!(matches!(err, WeatherError::NotFound));
}

#[tokio::test]
async fn geocoder_server_error_means_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let geocoder = OpenMeteoGeocoder::with_base_url(server.uri());
    let err = geocoder.resolve("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::NotFound));
}

// ----------------------------------------------------------------------------
// Daily history
// ----------------------------------------------------------------------------

#[tokio::test]
async fn history_success_preserves_order_and_gaps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("latitude", "51.5"))
        .and(query_param("longitude", "-0.12"))
        .and(query_param("wind_speed_unit", "ms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_body()))
        .mount(&server)
        .await;

    let archive = OpenMeteoArchive::with_base_url(server.uri());
    let series = archive
        .fetch_history(Coordinates {
            latitude: 51.5,
            longitude: -0.12,
        })
        .await
        .expect("should succeed");

    assert_eq!(series.len(), 3);
    assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(series[1].min_temp_c, None);
    assert_eq!(series[2].wind_speed_mps, None);
    assert_eq!(series[0].max_temp_c, Some(19.5));
}

#[tokio::test]
async fn history_requests_a_thirty_day_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_body()))
        .mount(&server)
        .await;

    let archive = OpenMeteoArchive::with_base_url(server.uri());
    archive
        .fetch_history(Coordinates {
            latitude: 51.5,
            longitude: -0.12,
        })
        .await
        .expect("should succeed");

    let requests = server.received_requests().await.expect("requests recorded");
    let query: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let get = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };
    let start: chrono::NaiveDate = get("start_date").parse().expect("start date sent");
    let end: chrono::NaiveDate = get("end_date").parse().expect("end date sent");
    assert_eq!(end - start, chrono::Duration::days(30));
    assert!(get("daily").contains("temperature_2m_min"));
}

#[tokio::test]
async fn history_server_error_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let archive = OpenMeteoArchive::with_base_url(server.uri());
    let err = archive
        .fetch_history(Coordinates {
            latitude: 51.5,
            longitude: -0.12,
        })
        .await
        .unwrap_err();

    let WeatherError::Provider(text) = err else {
        panic!("expected a provider error, got {err:?}");
    };
    assert!(text.contains("500"));
}

#[tokio::test]
async fn history_without_daily_data_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 51.5,
            "longitude": -0.12
        })))
        .mount(&server)
        .await;

    let archive = OpenMeteoArchive::with_base_url(server.uri());
    let err = archive
        .fetch_history(Coordinates {
            latitude: 51.5,
            longitude: -0.12,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Provider(_)), "got {err:?}");
}

#[tokio::test]
async fn history_with_no_days_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": {
                "time": [],
                "temperature_2m_min": [],
                "temperature_2m_max": [],
                "wind_speed_10m_max": []
            }
        })))
        .mount(&server)
        .await;

    let archive = OpenMeteoArchive::with_base_url(server.uri());
    let err = archive
        .fetch_history(Coordinates {
            latitude: 51.5,
            longitude: -0.12,
        })
        .await
        .unwrap_err();

    let WeatherError::Provider(text) = err else {
        panic!("expected a provider error, got {err:?}");
    };
    assert!(text.contains("no days"));
}
