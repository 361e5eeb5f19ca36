use reqwest::Client;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::services::weather_service::{WeatherError, WeatherProvider};

/// OpenWeatherMap current-weather client.
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn from_config(client: Client, config: &WeatherConfig) -> Option<Self> {
        let api_key = config.key()?;
        Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            units: config.units.clone(),
        })
    }

    fn weather_url(&self, city: &str) -> String {
        format!(
            "{}/weather?q={}&appid={}&units={}",
            self.base_url,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.units)
        )
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<serde_json::Value, WeatherError> {
        debug!("Fetching current weather for {}", city);

        let response = self
            .client
            .get(self.weather_url(city))
            .send()
            .await
            .map_err(|e| WeatherError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| WeatherError::Malformed(e.without_url().to_string()))
    }
}
