use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::aggregate::YearSummary;

pub const CSV_HEADER: &str =
    "Year,Avg Temp (°C),Feels Like (°C),Avg Humidity (%),Max Wind (km/h),Total Rain (mm),Total Snow (cm)";

/// Renders the yearly summary table: fixed header, one row per year, means
/// and wind at one decimal, accumulations at two.
pub fn render_csv(yearly: &[YearSummary]) -> String {
    let mut lines = Vec::with_capacity(yearly.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for y in yearly {
        lines.push(format!(
            "{},{:.1},{:.1},{:.1},{:.1},{:.2},{:.2}",
            y.year, y.temp_mean, y.comfort_mean, y.humidity_mean, y.wind_max, y.rain_sum, y.snow_sum
        ));
    }
    lines.join("\n")
}

pub fn csv_filename(location: &str, date: NaiveDate) -> String {
    format!(
        "weather_compass_{}_{}.csv",
        sanitize(location),
        date.format("%Y-%m-%d")
    )
}

pub fn write_csv(
    dir: &Path,
    location: &str,
    date: NaiveDate,
    yearly: &[YearSummary],
) -> io::Result<PathBuf> {
    let path = dir.join(csv_filename(location, date));
    fs::write(&path, render_csv(yearly))?;
    Ok(path)
}

/// Collapses anything outside `[A-Za-z0-9-]` into single underscores so a
/// "City, Country" label becomes a safe filename stem.
fn sanitize(location: &str) -> String {
    let mut out = String::with_capacity(location.len());
    let mut gap = false;
    for c in location.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
            gap = false;
        } else if !gap && !out.is_empty() {
            out.push('_');
            gap = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() { "location".to_string() } else { out }
}
