//! Saved-city endpoints. Both routes sit behind [`super::auth::require_session`].

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::session_user_id;
use super::validation::{JsonBody, require_field, validate_city_name};
use super::{ApiError, AppState, SaveCityRequest, SaveCityResponse};
use crate::services::{CityDto, CityError};

impl From<CityError> for ApiError {
    fn from(err: CityError) -> Self {
        match err {
            CityError::MissingName => Self::validation("City is required"),
            CityError::AlreadySaved(_) => Self::conflict("City already saved"),
            CityError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// POST /cities
pub async fn save_city(
    State(state): State<Arc<AppState>>,
    session: Session,
    JsonBody(payload): JsonBody<SaveCityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = session_user_id(&session).await?;
    let name = validate_city_name(require_field(payload.city.as_deref(), "City")?)?;

    let city = state.shared.city_service.save(user_id, name).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveCityResponse {
            message: "City saved successfully".to_string(),
            city,
        }),
    ))
}

/// GET /cities
pub async fn list_cities(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Vec<CityDto>>, ApiError> {
    let user_id = session_user_id(&session).await?;
    let cities = state.shared.city_service.list(user_id).await?;
    Ok(Json(cities))
}
