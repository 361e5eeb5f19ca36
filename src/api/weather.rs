use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::require_field;
use super::{ApiError, ApiKeyResponse, AppState, WeatherQuery};
use crate::services::WeatherError;

const SERVICE: &str = "weather API";

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::MissingCity => Self::validation("City is required"),
            WeatherError::NotConfigured => Self::Configuration("Weather API key is not configured".to_string()),
            WeatherError::Request(msg) | WeatherError::Malformed(msg) => Self::upstream(SERVICE, msg),
            WeatherError::Status { status, body } => {
                Self::upstream(SERVICE, format!("HTTP {status}: {body}"))
            }
        }
    }
}

/// GET /api/weather?city=
/// Relays the upstream body untouched.
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let city = require_field(query.city.as_deref(), "City")
        .map_err(|_| WeatherError::MissingCity)?;

    let provider = state
        .shared
        .weather
        .as_ref()
        .ok_or(WeatherError::NotConfigured)?;

    let body = provider.current_weather(city).await?;
    Ok(Json(body))
}

/// GET /api/getApiKey
pub async fn get_api_key(State(state): State<Arc<AppState>>) -> Json<ApiKeyResponse> {
    Json(ApiKeyResponse {
        api_key: state.shared.config.weather.key().map(ToString::to_string),
    })
}
