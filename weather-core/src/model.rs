use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A point on the globe, produced by the geocoder and consumed by the
/// history client within the same request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Instantaneous weather for one city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Metric temperature, rounded to one decimal at the client boundary.
    pub temperature_c: f32,
    pub description: String,
    pub condition_code: i64,
}

/// One day of aggregated history. Fields are `None` for days the provider
/// has no observation for; gaps are never filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub min_temp_c: Option<f32>,
    pub max_temp_c: Option<f32>,
    pub wind_speed_mps: Option<f32>,
}

/// Chronologically ordered daily records over the history window.
pub type DailySeries = Vec<DailyRecord>;

/// Weather emoji for an OpenWeatherMap condition code.
pub fn condition_emoji(code: i64) -> &'static str {
    match code {
        200..=232 => "⛈",    // thunderstorm
        300..=321 => "🌦️",   // drizzle
        500..=531 => "🌧 ☔", // rain
        600..=622 => "☃ ❄",  // snow
        701..=781 => "🌫️",   // fog, haze, dust
        800 => "🔆",         // clear
        _ => "⛅",           // clouds and everything else
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
