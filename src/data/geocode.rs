use reqwest::Client;
use serde::Deserialize;

use crate::domain::series::Place;
use crate::error::{CompassError, Result};

const GEOCODE_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Typeahead queries shorter than this never hit the network.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
}

impl Default for GeocodeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodeClient {
    pub fn new() -> Self {
        Self::with_base_url(GEOCODE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(8))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
        }
    }

    /// Up to five candidates for search-as-you-type. A payload without
    /// results is an empty list, not an error.
    pub async fn suggest(&self, query: &str) -> Result<Vec<Place>> {
        if query.trim().len() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }
        let results = self.search(query, 5).await?;
        Ok(results.into_iter().map(GeocodeResult::into_place).collect())
    }

    /// Resolves a place name to its best hit, for the analysis pipeline.
    pub async fn resolve(&self, query: &str) -> Result<Place> {
        let mut results = self.search(query, 1).await?;
        if results.is_empty() {
            return Err(CompassError::GeocodeNotFound(query.to_string()));
        }
        Ok(results.remove(0).into_place())
    }

    async fn search(&self, query: &str, count: u8) -> Result<Vec<GeocodeResult>> {
        let count = count.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(CompassError::fetch("geocoding request failed"))?;

        let payload: GeocodeResponse = response
            .json()
            .await
            .map_err(CompassError::fetch("failed to decode geocoding response"))?;

        Ok(payload.results.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

impl GeocodeResult {
    fn into_place(self) -> Place {
        Place {
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            country: self.country,
            admin1: self.admin1,
        }
    }
}
