#![allow(dead_code)]

use chrono::NaiveDate;
use weather_compass::domain::score::{Preferences, RainPreference, TimeOfDay, WindPreference};
use weather_compass::pipeline::{AnalysisRequest, LocationQuery};

/// One synthetic archive hour; columns default to plausible values so tests
/// only spell out what they assert on.
#[derive(Debug, Clone)]
pub struct HourFixture {
    pub timestamp: String,
    pub temperature: f64,
    pub apparent: f64,
    pub humidity: f64,
    pub precipitation: f64,
    pub snowfall: f64,
    pub wind: f64,
}

pub fn hour(timestamp: &str, temperature: f64, precipitation: f64, wind: f64) -> HourFixture {
    HourFixture {
        timestamp: timestamp.to_string(),
        temperature,
        apparent: temperature - 1.0,
        humidity: 60.0,
        precipitation,
        snowfall: 0.0,
        wind,
    }
}

pub fn snowy_hour(timestamp: &str, temperature: f64, snowfall: f64) -> HourFixture {
    HourFixture {
        timestamp: timestamp.to_string(),
        temperature,
        apparent: temperature - 3.0,
        humidity: 80.0,
        precipitation: 0.0,
        snowfall,
        wind: 8.0,
    }
}

pub fn archive_payload(hours: &[HourFixture]) -> serde_json::Value {
    serde_json::json!({
        "latitude": 10.52,
        "longitude": 76.21,
        "timezone": "Asia/Kolkata",
        "hourly": {
            "time": hours.iter().map(|h| h.timestamp.clone()).collect::<Vec<_>>(),
            "temperature_2m": hours.iter().map(|h| h.temperature).collect::<Vec<_>>(),
            "relativehumidity_2m": hours.iter().map(|h| h.humidity).collect::<Vec<_>>(),
            "apparent_temperature": hours.iter().map(|h| h.apparent).collect::<Vec<_>>(),
            "precipitation": hours.iter().map(|h| h.precipitation).collect::<Vec<_>>(),
            "snowfall": hours.iter().map(|h| h.snowfall).collect::<Vec<_>>(),
            "windspeed_10m": hours.iter().map(|h| h.wind).collect::<Vec<_>>(),
        }
    })
}

pub fn geocode_payload() -> serde_json::Value {
    serde_json::json!({
        "results": [
            {
                "name": "Thrissur",
                "latitude": 10.5276,
                "longitude": 76.2144,
                "country": "India",
                "admin1": "Kerala",
            }
        ]
    })
}

/// The upstream omits the `results` key entirely when nothing matches.
pub fn empty_geocode_payload() -> serde_json::Value {
    serde_json::json!({ "generationtime_ms": 0.5 })
}

pub fn reverse_payload() -> serde_json::Value {
    serde_json::json!({
        "address": {
            "city": "Thrissur",
            "state": "Kerala",
            "country": "India",
        }
    })
}

pub fn august_request() -> AnalysisRequest {
    AnalysisRequest {
        location: LocationQuery::Name("Thrissur".to_string()),
        target_date: NaiveDate::from_ymd_opt(2026, 8, 15).expect("valid date"),
        time_of_day: TimeOfDay::Afternoon,
        years_of_data: 28,
        preferences: Preferences {
            temp_min: 20.0,
            temp_max: 28.0,
            rain: RainPreference::AvoidRain,
            wind: WindPreference::Low,
        },
        today: NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid date"),
    }
}

/// Three years with exactly one matching afternoon hour each, plus hours the
/// filter must ignore. Produces the documented scenario: yearly means 20/22/24,
/// winds 10/12/14, one wet year.
pub fn three_year_hours() -> Vec<HourFixture> {
    vec![
        hour("2021-08-15T13:00", 20.0, 0.0, 10.0),
        hour("2022-08-15T13:00", 22.0, 0.0, 12.0),
        hour("2023-08-15T13:00", 24.0, 0.5, 14.0),
        // Outside the afternoon window.
        hour("2023-08-15T18:00", 99.0, 9.9, 99.0),
        // Wrong day.
        hour("2023-08-14T13:00", 99.0, 9.9, 99.0),
        // Wrong month.
        hour("2023-07-15T13:00", 99.0, 9.9, 99.0),
    ]
}
