use crate::domain::aggregate::TimeWindow;
use crate::domain::analysis::ClimateProfile;

/// Sub-score for preferences the user opted out of.
const NEUTRAL_SCORE: f64 = 75.0;

/// Penalty per °C outside the preferred temperature range.
const TEMP_PENALTY_PER_DEGREE: f64 = 8.0;

/// Penalty per km/h above the wind tolerance limit.
const WIND_PENALTY_PER_KMH: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainPreference {
    AvoidRain,
    DontMindRain,
    PreferSnow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindPreference {
    Low,
    Moderate,
    DoesNotMatter,
}

impl WindPreference {
    pub fn limit_kmh(self) -> Option<f64> {
        match self {
            Self::Low => Some(15.0),
            Self::Moderate => Some(30.0),
            Self::DoesNotMatter => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn window(self) -> TimeWindow {
        match self {
            Self::Morning => TimeWindow::new(6, 12),
            Self::Afternoon => TimeWindow::new(12, 17),
            Self::Evening => TimeWindow::new(17, 21),
            Self::Night => TimeWindow::new(21, 6),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning (6am-12pm)",
            Self::Afternoon => "Afternoon (12pm-5pm)",
            Self::Evening => "Evening (5pm-9pm)",
            Self::Night => "Night (9pm-6am)",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preferences {
    pub temp_min: f64,
    pub temp_max: f64,
    pub rain: RainPreference,
    pub wind: WindPreference,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            temp_min: 20.0,
            temp_max: 30.0,
            rain: RainPreference::AvoidRain,
            wind: WindPreference::Low,
        }
    }
}

/// A named preference bundle; applying one overwrites the current
/// preferences, which stay independently editable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPreset {
    pub name: &'static str,
    pub temp_min: f64,
    pub temp_max: f64,
    pub rain: RainPreference,
    pub wind: WindPreference,
}

impl EventPreset {
    pub fn apply(&self, prefs: &mut Preferences) {
        prefs.temp_min = self.temp_min;
        prefs.temp_max = self.temp_max;
        prefs.rain = self.rain;
        prefs.wind = self.wind;
    }
}

pub const EVENT_PRESETS: [EventPreset; 4] = [
    EventPreset {
        name: "Beach Day",
        temp_min: 25.0,
        temp_max: 32.0,
        rain: RainPreference::AvoidRain,
        wind: WindPreference::Low,
    },
    EventPreset {
        name: "Wedding Ceremony",
        temp_min: 20.0,
        temp_max: 28.0,
        rain: RainPreference::AvoidRain,
        wind: WindPreference::Low,
    },
    EventPreset {
        name: "Hiking Trip",
        temp_min: 15.0,
        temp_max: 25.0,
        rain: RainPreference::DontMindRain,
        wind: WindPreference::DoesNotMatter,
    },
    EventPreset {
        name: "Skiing",
        temp_min: -5.0,
        temp_max: 5.0,
        rain: RainPreference::PreferSnow,
        wind: WindPreference::DoesNotMatter,
    },
];

/// The three equally weighted sub-scores, each on 0-100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub temperature: f64,
    pub precipitation: f64,
    pub wind: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        (self.temperature + self.precipitation + self.wind) / 3.0
    }

    pub fn verdict(&self) -> Verdict {
        let total = self.total();
        if total >= 75.0 {
            Verdict::Excellent
        } else if total >= 50.0 {
            Verdict::Good
        } else {
            Verdict::Risky
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Excellent,
    Good,
    Risky,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent!",
            Self::Good => "Good",
            Self::Risky => "Risky",
        }
    }
}

/// Pure scoring of a climate profile against user preferences.
pub fn suitability(profile: &ClimateProfile, prefs: &Preferences) -> ScoreBreakdown {
    ScoreBreakdown {
        temperature: temperature_score(profile.avg_temp, prefs.temp_min, prefs.temp_max),
        precipitation: precipitation_score(
            profile.rain_probability,
            profile.snow_probability,
            prefs.rain,
        ),
        wind: wind_score(profile.avg_max_wind, prefs.wind),
    }
}

fn temperature_score(avg_temp: f64, temp_min: f64, temp_max: f64) -> f64 {
    if avg_temp >= temp_min && avg_temp <= temp_max {
        return 100.0;
    }
    let distance = (avg_temp - temp_min).abs().min((avg_temp - temp_max).abs());
    (100.0 - distance * TEMP_PENALTY_PER_DEGREE).max(0.0)
}

fn precipitation_score(
    rain_probability: f64,
    snow_probability: f64,
    rain: RainPreference,
) -> f64 {
    match rain {
        RainPreference::AvoidRain => 100.0 - rain_probability,
        RainPreference::PreferSnow => snow_probability,
        RainPreference::DontMindRain => NEUTRAL_SCORE,
    }
}

fn wind_score(avg_max_wind: f64, wind: WindPreference) -> f64 {
    let Some(limit) = wind.limit_kmh() else {
        return NEUTRAL_SCORE;
    };
    if avg_max_wind <= limit {
        100.0
    } else {
        (100.0 - (avg_max_wind - limit) * WIND_PENALTY_PER_KMH).max(0.0)
    }
}
