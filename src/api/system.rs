use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use super::{AppState, MessageResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ready: bool,
    pub database: bool,
    pub weather_configured: bool,
    pub uptime_seconds: u64,
}

/// GET /api
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello from the server!"))
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match state.shared.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Database ping failed: {e}");
            false
        }
    };

    let body = HealthResponse {
        ready: database,
        database,
        weather_configured: state.shared.weather.is_some(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(body))
}
