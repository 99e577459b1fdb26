use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};

use crate::data::archive::{ArchiveClient, lookback_range};
use crate::data::geocode::GeocodeClient;
use crate::data::reverse::ReverseGeocodeClient;
use crate::domain::aggregate::{filter_samples, summarize_years};
use crate::domain::analysis::{ClimateProfile, analyze, trend_sentence};
use crate::domain::comfort::ComfortBand;
use crate::domain::score::{Preferences, ScoreBreakdown, TimeOfDay, suitability};
use crate::domain::series::Coordinates;
use crate::error::{CompassError, Result};

/// The external collaborators the pipeline calls, bundled so tests can point
/// every one of them at a mock server.
#[derive(Debug, Clone, Default)]
pub struct Clients {
    pub geocode: GeocodeClient,
    pub reverse: ReverseGeocodeClient,
    pub archive: ArchiveClient,
}

impl Clients {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        let mut clients = Self::default();
        if let Some(url) = &cli.geocode_url {
            clients.geocode = GeocodeClient::with_base_url(url);
        }
        if let Some(url) = &cli.archive_url {
            clients.archive = ArchiveClient::with_base_url(url);
        }
        if let Some(url) = &cli.reverse_url {
            clients.reverse = ReverseGeocodeClient::with_base_url(url);
        }
        clients
    }
}

/// How the user identified the location: a typed name to geocode, or a
/// map-picked point to reverse-label.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Name(String),
    Point(Coordinates),
}

/// Immutable description of one analysis run. `today` is injected rather
/// than read from the clock so the lookback range is a pure function of the
/// request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub location: LocationQuery,
    pub target_date: NaiveDate,
    pub time_of_day: TimeOfDay,
    pub years_of_data: u32,
    pub preferences: Preferences,
    pub today: NaiveDate,
}

impl AnalysisRequest {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        let location = match (cli.lat, cli.lon) {
            (Some(latitude), Some(longitude)) => LocationQuery::Point(Coordinates {
                latitude,
                longitude,
            }),
            _ => LocationQuery::Name(cli.default_location()),
        };
        Self {
            location,
            target_date: cli.target_date(),
            time_of_day: cli.time_of_day(),
            years_of_data: cli.years,
            preferences: cli.preferences(),
            today: chrono::Local::now().date_naive(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let LocationQuery::Name(name) = &self.location
            && name.trim().is_empty()
        {
            return Err(CompassError::InvalidInput(
                "enter a location or pick one on the map".to_string(),
            ));
        }
        if self.years_of_data == 0 {
            return Err(CompassError::InvalidInput(
                "years of data must be at least 1".to_string(),
            ));
        }
        if self.preferences.temp_min > self.preferences.temp_max {
            return Err(CompassError::InvalidInput(
                "temperature range minimum exceeds maximum".to_string(),
            ));
        }
        Ok(())
    }
}

/// One complete result; replaces any prior report in full.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub location_name: String,
    pub coordinates: Coordinates,
    pub target_date: NaiveDate,
    pub time_of_day: TimeOfDay,
    pub profile: ClimateProfile,
    pub score: ScoreBreakdown,
}

impl AnalysisReport {
    pub fn comfort_band(&self) -> ComfortBand {
        ComfortBand::classify(self.profile.avg_comfort)
    }

    /// Plain-text rendering for `--one-shot` output.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Report for {}", self.location_name);
        let _ = writeln!(
            out,
            "{} during the {}",
            self.target_date.format("%A, %B %-d"),
            self.time_of_day.name()
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Suitability score: {:.0}/100 ({})",
            self.score.total(),
            self.score.verdict().label()
        );
        let _ = writeln!(out, "  Temperature    {:>5.1}", self.score.temperature);
        let _ = writeln!(out, "  Precipitation  {:>5.1}", self.score.precipitation);
        let _ = writeln!(out, "  Wind           {:>5.1}", self.score.wind);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Predicted conditions ({} years of history)",
            self.profile.yearly.len()
        );
        let _ = writeln!(out, "  Avg temperature   {:.1}°C", self.profile.avg_temp);
        let _ = writeln!(
            out,
            "  Feels like        {:.1}°C ({})",
            self.profile.avg_comfort,
            self.comfort_band().label()
        );
        let _ = writeln!(out, "  Avg humidity      {:.1}%", self.profile.avg_humidity);
        let _ = writeln!(
            out,
            "  Rain probability  {:.0}%",
            self.profile.rain_probability
        );
        let _ = writeln!(
            out,
            "  Snow probability  {:.0}%",
            self.profile.snow_probability
        );
        let _ = writeln!(
            out,
            "  Avg max wind      {:.1} km/h",
            self.profile.avg_max_wind
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", trend_sentence(self.profile.temp_trend));
        out
    }
}

/// Runs the whole flow: validate, resolve coordinates, fetch the archive
/// range, filter and aggregate, analyze, score. Sequential by data
/// dependency; any stage error aborts the run.
pub async fn run_analysis(clients: &Clients, request: &AnalysisRequest) -> Result<AnalysisReport> {
    request.validate()?;

    let (location_name, coordinates) = match &request.location {
        LocationQuery::Name(name) => {
            let place = clients.geocode.resolve(name).await?;
            (place.display_name(), place.coordinates())
        }
        LocationQuery::Point(coords) => {
            // Reverse lookup failure degrades to "Lat: x, Lon: y".
            (clients.reverse.label_for(*coords).await, *coords)
        }
    };

    let (start, end) = lookback_range(request.today, request.years_of_data);
    let observations = clients
        .archive
        .fetch_history(coordinates, start, end)
        .await?;

    let samples = filter_samples(
        &observations,
        request.target_date.month(),
        request.target_date.day(),
        request.time_of_day.window(),
    );
    let profile = analyze(summarize_years(&samples))?;
    let score = suitability(&profile, &request.preferences);

    Ok(AnalysisReport {
        location_name,
        coordinates,
        target_date: request.target_date,
        time_of_day: request.time_of_day,
        profile,
        score,
    })
}
