use reqwest::Client;
use serde::Deserialize;

use crate::domain::series::Coordinates;

const REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Reverse geocoder for map-picked coordinates. Lookup failures are never
/// fatal; the caller always gets a usable label.
#[derive(Debug, Clone)]
pub struct ReverseGeocodeClient {
    client: Client,
    base_url: String,
}

impl Default for ReverseGeocodeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverseGeocodeClient {
    pub fn new() -> Self {
        Self::with_base_url(REVERSE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("weather-compass/", env!("CARGO_PKG_VERSION")))
                .timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
        }
    }

    /// "City, Country" when the lookup succeeds, otherwise the plain
    /// coordinate label.
    pub async fn label_for(&self, coords: Coordinates) -> String {
        self.lookup(coords).await.unwrap_or_else(|| coords.label())
    }

    async fn lookup(&self, coords: Coordinates) -> Option<String> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        let response: ReverseResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("format", "jsonv2"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
            ])
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?
            .json()
            .await
            .ok()?;

        let address = response.address?;
        let settlement = address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.state);

        match (settlement, address.country) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (Some(city), None) => Some(city),
            (None, Some(country)) => Some(country),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<ReverseAddress>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
}
