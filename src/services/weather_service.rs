//! Seam between the weather proxy endpoint and the upstream weather API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City is required")]
    MissingCity,

    #[error("Weather API key is not configured")]
    NotConfigured,

    #[error("Weather request failed: {0}")]
    Request(String),

    #[error("Weather API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Weather API returned a malformed body: {0}")]
    Malformed(String),
}

/// Current-weather lookup. The returned JSON is relayed to clients untouched.
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, city: &str) -> Result<serde_json::Value, WeatherError>;
}
