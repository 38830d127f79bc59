//! Collaborator clients consumed by the assistant shell
//!
//! Thin typed wrappers over the external weather and geolocation services.
//! These are plain request/response HTTP calls with no session state.

pub mod location;
pub mod weather;

pub use location::GeoClient;
pub use weather::WeatherClient;

#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CollabError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CollabError::Decode(err.to_string())
        } else {
            CollabError::Http(err.to_string())
        }
    }
}
