use thiserror::Error;

/// Failures that abort an analysis run.
///
/// Insufficient data for the temperature trend is deliberately not here: the
/// trend degrades to `None` and the rest of the report still renders. Reverse
/// geocoding failures degrade to a coordinate label and are not surfaced
/// either.
#[derive(Debug, Error)]
pub enum CompassError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no geocoding result for \"{0}\"")]
    GeocodeNotFound(String),

    #[error("{context}: {source}")]
    Fetch {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("weather archive returned no hourly data for this location")]
    DataUnavailable,

    #[error("no historical hours match the selected date and time window")]
    NoHistoricalMatch,
}

impl CompassError {
    pub fn fetch(context: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Fetch { context, source }
    }
}

pub type Result<T> = std::result::Result<T, CompassError>;
