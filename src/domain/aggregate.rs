use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};

use crate::domain::series::HourlyObservation;

/// Half-open time-of-day window `[start_hour, end_hour)`.
///
/// `start_hour > end_hour` means the window wraps midnight (e.g. 21 -> 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }
}

/// One hour that survived the date/window filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredSample {
    pub year: i32,
    pub temp: f64,
    pub comfort: f64,
    pub humidity: f64,
    pub wind: f64,
    pub rain: f64,
    pub snow: f64,
}

/// Per-year reduction of the filtered samples.
///
/// Wind keeps the peak rather than the mean; rain and snow accumulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub temp_mean: f64,
    pub comfort_mean: f64,
    pub humidity_mean: f64,
    pub wind_max: f64,
    pub rain_sum: f64,
    pub snow_sum: f64,
}

/// Stage one: keep the hours landing on `month`/`day` (any year) inside the
/// window. Hours with a missing variable are dropped so the per-year folds
/// never see holes.
pub fn filter_samples(
    observations: &[HourlyObservation],
    month: u32,
    day: u32,
    window: TimeWindow,
) -> Vec<FilteredSample> {
    observations
        .iter()
        .filter(|obs| {
            obs.time.month() == month && obs.time.day() == day && window.contains(obs.time.hour())
        })
        .filter_map(|obs| {
            Some(FilteredSample {
                year: obs.time.year(),
                temp: obs.temperature?,
                comfort: obs.apparent_temperature?,
                humidity: obs.humidity?,
                wind: obs.wind_speed?,
                rain: obs.precipitation?,
                snow: obs.snowfall?,
            })
        })
        .collect()
}

/// Stage two: group by year and reduce. Years without samples simply do not
/// appear; the output is ascending by year.
pub fn summarize_years(samples: &[FilteredSample]) -> Vec<YearSummary> {
    let mut by_year: BTreeMap<i32, Vec<&FilteredSample>> = BTreeMap::new();
    for sample in samples {
        by_year.entry(sample.year).or_default().push(sample);
    }

    by_year
        .into_iter()
        .map(|(year, group)| {
            let n = group.len() as f64;
            YearSummary {
                year,
                temp_mean: group.iter().map(|s| s.temp).sum::<f64>() / n,
                comfort_mean: group.iter().map(|s| s.comfort).sum::<f64>() / n,
                humidity_mean: group.iter().map(|s| s.humidity).sum::<f64>() / n,
                wind_max: group.iter().map(|s| s.wind).fold(f64::MIN, f64::max),
                rain_sum: group.iter().map(|s| s.rain).sum(),
                snow_sum: group.iter().map(|s| s.snow).sum(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;

    fn observation(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        value: f64,
    ) -> HourlyObservation {
        HourlyObservation {
            time: NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            temperature: Some(value),
            apparent_temperature: Some(value - 1.0),
            humidity: Some(60.0),
            precipitation: Some(0.1),
            snowfall: Some(0.0),
            wind_speed: Some(value / 2.0),
        }
    }

    #[test]
    fn plain_window_is_end_exclusive() {
        let window = TimeWindow::new(12, 17);
        assert!(window.contains(12));
        assert!(window.contains(16));
        assert!(!window.contains(17));
        assert!(!window.contains(11));
    }

    #[test]
    fn wraparound_window_spans_midnight() {
        let window = TimeWindow::new(21, 6);
        assert!(window.contains(23));
        assert!(window.contains(21));
        assert!(window.contains(5));
        assert!(window.contains(0));
        assert!(!window.contains(10));
        assert!(!window.contains(6));
    }

    #[test]
    fn filter_keeps_only_target_date_in_window() {
        let observations = vec![
            observation(2021, 7, 14, 13, 30.0),
            observation(2021, 7, 14, 18, 31.0), // outside window
            observation(2021, 7, 15, 13, 32.0), // wrong day
            observation(2022, 7, 14, 14, 28.0),
        ];

        let samples = filter_samples(&observations, 7, 14, TimeWindow::new(12, 17));
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].year, 2021);
        assert_eq!(samples[1].year, 2022);
    }

    #[test]
    fn filter_drops_hours_with_missing_variables() {
        let mut partial = observation(2021, 7, 14, 13, 30.0);
        partial.wind_speed = None;
        let observations = vec![partial, observation(2021, 7, 14, 14, 30.0)];

        let samples = filter_samples(&observations, 7, 14, TimeWindow::new(12, 17));
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn one_sample_per_year_passes_values_through() {
        let samples: Vec<FilteredSample> = (2019..2022)
            .map(|year| FilteredSample {
                year,
                temp: 20.0,
                comfort: 19.0,
                humidity: 55.0,
                wind: 12.5,
                rain: 0.4,
                snow: 0.2,
            })
            .collect();

        let summaries = summarize_years(&samples);
        assert_eq!(summaries.len(), 3);
        for summary in &summaries {
            assert_eq!(summary.wind_max, 12.5);
            assert_eq!(summary.rain_sum, 0.4);
            assert_eq!(summary.snow_sum, 0.2);
        }
    }

    #[test]
    fn summaries_fold_means_peaks_and_sums() {
        let samples = vec![
            FilteredSample {
                year: 2021,
                temp: 20.0,
                comfort: 18.0,
                humidity: 50.0,
                wind: 10.0,
                rain: 0.5,
                snow: 0.0,
            },
            FilteredSample {
                year: 2021,
                temp: 24.0,
                comfort: 22.0,
                humidity: 70.0,
                wind: 18.0,
                rain: 1.5,
                snow: 0.3,
            },
        ];

        let summaries = summarize_years(&samples);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.temp_mean, 22.0);
        assert_eq!(s.comfort_mean, 20.0);
        assert_eq!(s.humidity_mean, 60.0);
        assert_eq!(s.wind_max, 18.0);
        assert_eq!(s.rain_sum, 2.0);
        assert_eq!(s.snow_sum, 0.3);
    }

    #[test]
    fn summaries_sorted_ascending_by_year() {
        let samples = vec![
            FilteredSample {
                year: 2023,
                temp: 1.0,
                comfort: 1.0,
                humidity: 1.0,
                wind: 1.0,
                rain: 0.0,
                snow: 0.0,
            },
            FilteredSample {
                year: 1999,
                temp: 1.0,
                comfort: 1.0,
                humidity: 1.0,
                wind: 1.0,
                rain: 0.0,
                snow: 0.0,
            },
            FilteredSample {
                year: 2010,
                temp: 1.0,
                comfort: 1.0,
                humidity: 1.0,
                wind: 1.0,
                rain: 0.0,
                snow: 0.0,
            },
        ];

        let years: Vec<i32> = summarize_years(&samples).iter().map(|s| s.year).collect();
        assert_eq!(years, vec![1999, 2010, 2023]);
    }

    #[test]
    fn feb_29_only_matches_leap_years() {
        let observations = vec![
            observation(2020, 2, 29, 13, 5.0),
            observation(2021, 2, 28, 13, 6.0),
            observation(2024, 2, 29, 13, 7.0),
        ];

        let samples = filter_samples(&observations, 2, 29, TimeWindow::new(12, 17));
        let summaries = summarize_years(&samples);
        let years: Vec<i32> = summaries.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2020, 2024]);
    }

    #[test]
    fn no_matches_yield_empty_summary_not_zero_rows() {
        let observations = vec![observation(2021, 7, 14, 13, 30.0)];
        let samples = filter_samples(&observations, 12, 25, TimeWindow::new(12, 17));
        assert!(samples.is_empty());
        assert!(summarize_years(&samples).is_empty());
    }

    proptest! {
        // A wrapped window is exactly the complement of the plain window
        // with the same endpoints swapped.
        #[test]
        fn window_and_swapped_window_partition_the_day(
            start in 0u32..24,
            end in 0u32..24,
            hour in 0u32..24,
        ) {
            prop_assume!(start != end);
            let forward = TimeWindow::new(start, end);
            let swapped = TimeWindow::new(end, start);
            prop_assert_ne!(forward.contains(hour), swapped.contains(hour));
        }
    }
}
