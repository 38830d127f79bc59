//! Reverse geocoding via the OpenStreetMap Nominatim API

use super::CollabError;
use serde::Deserialize;
use std::time::Duration;

const NOMINATIM_API_BASE: &str = "https://nominatim.openstreetmap.org";
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct LocationInfo {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Deserialize, Default)]
struct ApiResponse {
    #[serde(default)]
    address: ApiAddress,
}

#[derive(Deserialize, Default)]
struct ApiAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    region: Option<String>,
    country: Option<String>,
}

impl ApiAddress {
    fn into_parts(self) -> (String, String, String) {
        let city = self
            .city
            .or(self.town)
            .or(self.village)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let state = self
            .state
            .or(self.region)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let country = self.country.unwrap_or_else(|| UNKNOWN.to_string());
        (city, state, country)
    }
}

pub struct GeoClient {
    client: reqwest::Client,
}

impl Default for GeoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("agrivoice/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Resolve a coordinate to city/state/country; unresolvable parts come
    /// back as `Unknown` rather than failing the whole lookup.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<LocationInfo, CollabError> {
        let url = format!("{NOMINATIM_API_BASE}/reverse");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("zoom", "10".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| CollabError::Http(e.to_string()))?;

        let api: ApiResponse = response.json().await?;
        let (city, state, country) = api.address.into_parts();
        Ok(LocationInfo { latitude: lat, longitude: lon, city, state, country })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn town_fills_in_for_missing_city() {
        let json = r#"{"address": {"town": "Anantapur", "state": "Andhra Pradesh", "country": "India"}}"#;
        let api: ApiResponse = serde_json::from_str(json).unwrap();
        let (city, state, country) = api.address.into_parts();
        assert_eq!(city, "Anantapur");
        assert_eq!(state, "Andhra Pradesh");
        assert_eq!(country, "India");
    }

    #[test]
    fn missing_fields_become_unknown() {
        let api: ApiResponse = serde_json::from_str("{}").unwrap();
        let (city, state, country) = api.address.into_parts();
        assert_eq!(city, "Unknown");
        assert_eq!(state, "Unknown");
        assert_eq!(country, "Unknown");
    }
}
