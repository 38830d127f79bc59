//! Current-conditions lookup against the OpenWeather API

use super::CollabError;
use serde::Deserialize;
use std::time::Duration;

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Current conditions relevant to farm decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub humidity: u8,
    pub wind_kmh: f64,
    pub pressure_hpa: u32,
    pub rainfall_mm: f64,
    pub description: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    main: ApiMain,
    wind: ApiWind,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    rain: Option<ApiRain>,
}

#[derive(Deserialize)]
struct ApiMain {
    temp: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Deserialize)]
struct ApiWind {
    speed: f64,
}

#[derive(Deserialize)]
struct ApiCondition {
    description: String,
}

#[derive(Deserialize)]
struct ApiRain {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

impl From<ApiResponse> for WeatherReport {
    fn from(api: ApiResponse) -> Self {
        WeatherReport {
            temperature_c: api.main.temp,
            humidity: api.main.humidity,
            // API reports m/s
            wind_kmh: (api.wind.speed * 3.6 * 10.0).round() / 10.0,
            pressure_hpa: api.main.pressure,
            rainfall_mm: api.rain.map(|r| r.one_hour).unwrap_or(0.0),
            description: api
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
        }
    }
}

pub struct WeatherClient {
    api_key: String,
    client: reqwest::Client,
}

impl WeatherClient {
    /// Build from `OPENWEATHER_API_KEY`; `None` when no key is configured.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("OPENWEATHER_API_KEY").ok()?.trim().to_string();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key))
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { api_key: api_key.into(), client }
    }

    /// Current conditions at a coordinate, metric units.
    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherReport, CollabError> {
        let url = format!("{OPENWEATHER_API_BASE}/weather");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| CollabError::Http(e.to_string()))?;

        let api: ApiResponse = response.json().await?;
        Ok(api.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_and_converts_wind_speed() {
        let json = r#"{
            "main": {"temp": 28.4, "humidity": 65, "pressure": 1013},
            "wind": {"speed": 3.5},
            "weather": [{"description": "partly cloudy"}],
            "rain": {"1h": 0.4}
        }"#;
        let api: ApiResponse = serde_json::from_str(json).unwrap();
        let report = WeatherReport::from(api);
        assert_eq!(report.temperature_c, 28.4);
        assert_eq!(report.humidity, 65);
        assert_eq!(report.wind_kmh, 12.6);
        assert_eq!(report.rainfall_mm, 0.4);
        assert_eq!(report.description, "partly cloudy");
    }

    #[test]
    fn missing_rain_defaults_to_zero() {
        let json = r#"{
            "main": {"temp": 31.0, "humidity": 40, "pressure": 1009},
            "wind": {"speed": 0.0},
            "weather": []
        }"#;
        let api: ApiResponse = serde_json::from_str(json).unwrap();
        let report = WeatherReport::from(api);
        assert_eq!(report.rainfall_mm, 0.0);
        assert!(report.description.is_empty());
    }
}
