use crate::domain::aggregate::YearSummary;
use crate::error::{CompassError, Result};

/// Rainfall below this is treated as sensor noise, not a wet year.
const RAIN_TRACE_MM: f64 = 0.2;

/// Below this magnitude the trend is reported as stable.
const TREND_STABLE_EPSILON: f64 = 0.1;

/// Cross-year likelihood profile for the target date and window.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateProfile {
    pub avg_temp: f64,
    pub avg_comfort: f64,
    pub avg_humidity: f64,
    pub avg_max_wind: f64,
    /// Percent of years with measurable rain.
    pub rain_probability: f64,
    /// Percent of years with any snowfall.
    pub snow_probability: f64,
    /// °C per decade; `None` when fewer than two distinct years of data.
    pub temp_trend: Option<f64>,
    pub yearly: Vec<YearSummary>,
}

pub fn analyze(yearly: Vec<YearSummary>) -> Result<ClimateProfile> {
    if yearly.is_empty() {
        return Err(CompassError::NoHistoricalMatch);
    }

    let n = yearly.len() as f64;
    let wet_years = yearly.iter().filter(|y| y.rain_sum > RAIN_TRACE_MM).count();
    let snowy_years = yearly.iter().filter(|y| y.snow_sum > 0.0).count();

    Ok(ClimateProfile {
        avg_temp: yearly.iter().map(|y| y.temp_mean).sum::<f64>() / n,
        avg_comfort: yearly.iter().map(|y| y.comfort_mean).sum::<f64>() / n,
        avg_humidity: yearly.iter().map(|y| y.humidity_mean).sum::<f64>() / n,
        avg_max_wind: yearly.iter().map(|y| y.wind_max).sum::<f64>() / n,
        rain_probability: wet_years as f64 / n * 100.0,
        snow_probability: snowy_years as f64 / n * 100.0,
        temp_trend: temperature_trend(&yearly),
        yearly,
    })
}

/// Ordinary least-squares slope of yearly mean temperature over the year,
/// scaled to °C per decade. `None` when the regression is degenerate (fewer
/// than two summaries, or a single distinct year).
pub fn temperature_trend(yearly: &[YearSummary]) -> Option<f64> {
    if yearly.len() < 2 {
        return None;
    }

    let n = yearly.len() as f64;
    let sum_x: f64 = yearly.iter().map(|y| f64::from(y.year)).sum();
    let sum_y: f64 = yearly.iter().map(|y| y.temp_mean).sum();
    let sum_xy: f64 = yearly
        .iter()
        .map(|y| f64::from(y.year) * y.temp_mean)
        .sum();
    let sum_x2: f64 = yearly
        .iter()
        .map(|y| f64::from(y.year) * f64::from(y.year))
        .sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    Some((n * sum_xy - sum_x * sum_y) / denominator * 10.0)
}

pub fn trend_sentence(temp_trend: Option<f64>) -> String {
    match temp_trend {
        None => "Not enough years of data for a temperature trend.".to_string(),
        Some(t) if t.abs() < TREND_STABLE_EPSILON => {
            "Stable temperature trend over the years.".to_string()
        }
        Some(t) if t > 0.0 => format!("Warming trend of ~{t:.2}°C per decade."),
        Some(t) => format!("Cooling trend of ~{:.2}°C per decade.", t.abs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(year: i32, temp_mean: f64, rain_sum: f64, snow_sum: f64) -> YearSummary {
        YearSummary {
            year,
            temp_mean,
            comfort_mean: temp_mean - 1.0,
            humidity_mean: 60.0,
            wind_max: 10.0,
            rain_sum,
            snow_sum,
        }
    }

    #[test]
    fn empty_summaries_report_no_historical_match() {
        let err = analyze(Vec::new()).expect_err("empty input must not produce a profile");
        assert!(matches!(err, CompassError::NoHistoricalMatch));
    }

    #[test]
    fn averages_and_probabilities_over_three_years() {
        let yearly = vec![
            summary(2021, 20.0, 0.0, 0.0),
            summary(2022, 22.0, 0.0, 0.0),
            summary(2023, 24.0, 0.5, 0.0),
        ];

        let profile = analyze(yearly).unwrap();
        assert_eq!(profile.avg_temp, 22.0);
        assert_eq!(profile.avg_comfort, 21.0);
        assert_eq!(profile.avg_max_wind, 10.0);
        assert!((profile.rain_probability - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(profile.snow_probability, 0.0);
    }

    #[test]
    fn trace_rain_does_not_count_as_a_wet_year() {
        let yearly = vec![
            summary(2021, 20.0, 0.2, 0.0), // exactly at the trace threshold
            summary(2022, 20.0, 0.21, 0.0),
        ];

        let profile = analyze(yearly).unwrap();
        assert_eq!(profile.rain_probability, 50.0);
    }

    #[test]
    fn any_snowfall_counts_toward_snow_probability() {
        let yearly = vec![
            summary(2021, 0.0, 0.0, 0.01),
            summary(2022, 0.0, 0.0, 0.0),
        ];

        let profile = analyze(yearly).unwrap();
        assert_eq!(profile.snow_probability, 50.0);
    }

    #[test]
    fn rising_temperatures_give_positive_trend() {
        let yearly: Vec<YearSummary> = (0..5)
            .map(|i| summary(2019 + i, 20.0 + f64::from(i), 0.0, 0.0))
            .collect();
        let trend = temperature_trend(&yearly).unwrap();
        assert!(trend > 0.0);
        // 1°C per year is 10°C per decade.
        assert!((trend - 10.0).abs() < 1e-6);
    }

    #[test]
    fn falling_temperatures_give_negative_trend() {
        let yearly: Vec<YearSummary> = (0..5)
            .map(|i| summary(2019 + i, 20.0 - f64::from(i), 0.0, 0.0))
            .collect();
        assert!(temperature_trend(&yearly).unwrap() < 0.0);
    }

    #[test]
    fn constant_temperatures_give_near_zero_trend() {
        let yearly: Vec<YearSummary> = (0..5).map(|i| summary(2019 + i, 20.0, 0.0, 0.0)).collect();
        assert!(temperature_trend(&yearly).unwrap().abs() < 1e-9);
    }

    #[test]
    fn single_year_has_no_trend() {
        assert!(temperature_trend(&[summary(2021, 20.0, 0.0, 0.0)]).is_none());
        assert!(temperature_trend(&[]).is_none());
    }

    #[test]
    fn duplicate_year_denominator_is_guarded() {
        // Two summaries for the same year: NΣx² - (Σx)² is exactly zero.
        let yearly = vec![summary(2021, 20.0, 0.0, 0.0), summary(2021, 24.0, 0.0, 0.0)];
        assert!(temperature_trend(&yearly).is_none());
    }

    #[test]
    fn trend_sentences_cover_all_shapes() {
        assert_eq!(
            trend_sentence(Some(0.05)),
            "Stable temperature trend over the years."
        );
        assert_eq!(
            trend_sentence(Some(0.42)),
            "Warming trend of ~0.42°C per decade."
        );
        assert_eq!(
            trend_sentence(Some(-0.42)),
            "Cooling trend of ~0.42°C per decade."
        );
        assert_eq!(
            trend_sentence(None),
            "Not enough years of data for a temperature trend."
        );
    }
}
