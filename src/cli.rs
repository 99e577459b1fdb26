#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use chrono::{Days, Local, NaiveDate};
use clap::{Parser, ValueEnum};

use crate::domain::score::{
    EVENT_PRESETS, EventPreset, Preferences, RainPreference, TimeOfDay, WindPreference,
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RainArg {
    AvoidRain,
    DontMindRain,
    PreferSnow,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum WindArg {
    Low,
    Moderate,
    DoesntMatter,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TimeOfDayArg {
    Morning,
    Afternoon,
    Evening,
    Night,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PresetArg {
    BeachDay,
    Wedding,
    Hiking,
    Skiing,
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "weather-compass",
    version,
    about = "Historical-weather suitability planner for outdoor events"
)]
pub struct Cli {
    /// Location to analyze (default: Thrissur, India)
    pub location: Option<String>,

    /// Target date, YYYY-MM-DD (default: tomorrow)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Time-of-day window
    #[arg(long, value_enum, default_value_t = TimeOfDayArg::Afternoon)]
    pub time_of_day: TimeOfDayArg,

    /// Years of history to analyze
    #[arg(long, default_value_t = 28, value_parser = clap::value_parser!(u32).range(1..=80))]
    pub years: u32,

    /// Preferred temperature minimum, °C
    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
    pub temp_min: f64,

    /// Preferred temperature maximum, °C
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    pub temp_max: f64,

    /// Rain preference
    #[arg(long, value_enum, default_value_t = RainArg::AvoidRain)]
    pub rain: RainArg,

    /// Wind tolerance
    #[arg(long, value_enum, default_value_t = WindArg::Low)]
    pub wind: WindArg,

    /// Event preset; overrides the individual preference flags
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Direct latitude (requires --lon); skips geocoding
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Direct longitude (requires --lat)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Print the report to stdout and exit (non-interactive)
    #[arg(long)]
    pub one_shot: bool,

    /// With --one-shot, also write the yearly summary CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub csv: Option<PathBuf>,

    /// Geocoding endpoint override
    #[arg(long, value_name = "URL")]
    pub geocode_url: Option<String>,

    /// Archive endpoint override
    #[arg(long, value_name = "URL")]
    pub archive_url: Option<String>,

    /// Reverse-geocoding endpoint override
    #[arg(long, value_name = "URL")]
    pub reverse_url: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn default_location(&self) -> String {
        self.location
            .clone()
            .unwrap_or_else(|| "Thrissur, India".to_string())
    }

    #[must_use]
    pub fn target_date(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| Local::now().date_naive() + Days::new(1))
    }

    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        match self.time_of_day {
            TimeOfDayArg::Morning => TimeOfDay::Morning,
            TimeOfDayArg::Afternoon => TimeOfDay::Afternoon,
            TimeOfDayArg::Evening => TimeOfDay::Evening,
            TimeOfDayArg::Night => TimeOfDay::Night,
        }
    }

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        let mut prefs = Preferences {
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            rain: match self.rain {
                RainArg::AvoidRain => RainPreference::AvoidRain,
                RainArg::DontMindRain => RainPreference::DontMindRain,
                RainArg::PreferSnow => RainPreference::PreferSnow,
            },
            wind: match self.wind {
                WindArg::Low => WindPreference::Low,
                WindArg::Moderate => WindPreference::Moderate,
                WindArg::DoesntMatter => WindPreference::DoesNotMatter,
            },
        };
        if let Some(preset) = self.preset() {
            preset.apply(&mut prefs);
        }
        prefs
    }

    #[must_use]
    pub fn preset(&self) -> Option<&'static EventPreset> {
        let name = match self.preset? {
            PresetArg::BeachDay => "Beach Day",
            PresetArg::Wedding => "Wedding Ceremony",
            PresetArg::Hiking => "Hiking Trip",
            PresetArg::Skiing => "Skiing",
        };
        EVENT_PRESETS.iter().find(|p| p.name == name)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            _ => {}
        }
        if self.temp_min > self.temp_max {
            anyhow::bail!("--temp-min must not exceed --temp-max");
        }
        Ok(())
    }
}
