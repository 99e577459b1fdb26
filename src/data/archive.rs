use chrono::{Datelike, Days, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

use crate::domain::series::{Coordinates, HourlyObservation, parse_datetime};
use crate::error::{CompassError, Result};

const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

const HOURLY_VARIABLES: &str =
    "temperature_2m,relativehumidity_2m,apparent_temperature,precipitation,snowfall,windspeed_10m";

/// The archive finalizes data with a few days of lag; requesting closer to
/// the current date yields holes.
const ARCHIVE_LAG_DAYS: u64 = 5;

/// Inclusive request range: ends `ARCHIVE_LAG_DAYS` before `today`, starts
/// `years` calendar years earlier. A Feb 29 endpoint in a non-leap start
/// year rolls forward to Mar 1.
pub fn lookback_range(today: NaiveDate, years: u32) -> (NaiveDate, NaiveDate) {
    let end = today - Days::new(ARCHIVE_LAG_DAYS);
    let start_year = end.year() - years as i32;
    let start = end
        .with_year(start_year)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(start_year, 3, 1).expect("valid date"));
    (start, end)
}

#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    base_url: String,
}

impl Default for ArchiveClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveClient {
    pub fn new() -> Self {
        Self::with_base_url(ARCHIVE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                // Multi-decade hourly payloads are tens of megabytes.
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
        }
    }

    /// Fetches the full hourly history for the range in one call, in the
    /// location's local timezone.
    pub async fn fetch_history(
        &self,
        coords: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HourlyObservation>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("start_date", start.format("%Y-%m-%d").to_string()),
                ("end_date", end.format("%Y-%m-%d").to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(CompassError::fetch("archive request failed"))?;

        let payload: ArchiveResponse = response
            .json()
            .await
            .map_err(CompassError::fetch("failed to decode archive payload"))?;

        let Some(hourly) = payload.hourly else {
            return Err(CompassError::DataUnavailable);
        };
        let observations = parse_hourly(&hourly);
        if observations.is_empty() {
            return Err(CompassError::DataUnavailable);
        }
        Ok(observations)
    }
}

fn parse_hourly(hourly: &HourlyBlock) -> Vec<HourlyObservation> {
    let mut out = Vec::with_capacity(hourly.time.len());
    for idx in 0..hourly.time.len() {
        let Some(time) = parse_datetime(&hourly.time[idx]) else {
            continue;
        };

        out.push(HourlyObservation {
            time,
            temperature: hourly.temperature_2m.get(idx).copied().flatten(),
            apparent_temperature: hourly.apparent_temperature.get(idx).copied().flatten(),
            humidity: hourly.relativehumidity_2m.get(idx).copied().flatten(),
            precipitation: hourly.precipitation.get(idx).copied().flatten(),
            snowfall: hourly.snowfall.get(idx).copied().flatten(),
            wind_speed: hourly.windspeed_10m.get(idx).copied().flatten(),
        });
    }
    out
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relativehumidity_2m: Vec<Option<f64>>,
    apparent_temperature: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    snowfall: Vec<Option<f64>>,
    windspeed_10m: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_ends_five_days_before_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let (start, end) = lookback_range(today, 28);
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 8, 2).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(1998, 8, 2).unwrap());
    }

    #[test]
    fn lag_can_cross_a_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let (start, end) = lookback_range(today, 1);
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 2, 26).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 2, 26).unwrap());
    }

    #[test]
    fn leap_day_endpoint_rolls_to_march_first() {
        // 2024-03-05 - 5 days = 2024-02-29; 2023 has no Feb 29.
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let (start, end) = lookback_range(today, 1);
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
    }

    #[test]
    fn parse_hourly_skips_bad_timestamps() {
        let block = HourlyBlock {
            time: vec!["bad".to_string(), "1998-08-02T10:00".to_string()],
            temperature_2m: vec![Some(20.0), Some(21.0)],
            relativehumidity_2m: vec![Some(50.0), Some(60.0)],
            apparent_temperature: vec![Some(19.0), Some(20.0)],
            precipitation: vec![Some(0.0), Some(0.1)],
            snowfall: vec![Some(0.0), Some(0.0)],
            windspeed_10m: vec![Some(5.0), Some(6.0)],
        };

        let parsed = parse_hourly(&block);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].temperature, Some(21.0));
        assert_eq!(parsed[0].humidity, Some(60.0));
    }

    #[test]
    fn parse_hourly_carries_nulls_through() {
        let block = HourlyBlock {
            time: vec!["1998-08-02T10:00".to_string()],
            temperature_2m: vec![None],
            relativehumidity_2m: vec![Some(60.0)],
            apparent_temperature: Vec::new(), // short column
            precipitation: vec![Some(0.1)],
            snowfall: vec![Some(0.0)],
            windspeed_10m: vec![Some(6.0)],
        };

        let parsed = parse_hourly(&block);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].temperature, None);
        assert_eq!(parsed[0].apparent_temperature, None);
        assert_eq!(parsed[0].precipitation, Some(0.1));
    }
}
