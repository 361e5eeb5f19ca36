use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{JsonBody, require_field, require_secret};
use super::{ApiError, AppState, AuthResponse, CredentialsRequest, CurrentUserResponse, MessageResponse};
use crate::services::AuthError;

const SESSION_USER_ID: &str = "user_id";
const SESSION_USERNAME: &str = "user";

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::unauthorized("Invalid credentials"),
            AuthError::UsernameTaken(name) => {
                Self::conflict(format!("Username '{name}' is already taken"))
            }
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without an authenticated session.
pub async fn require_session(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = session_user_id(&session).await?;
    tracing::Span::current().record("user_id", user_id);
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = require_field(payload.username.as_deref(), "Username")?;
    let password = require_secret(payload.password.as_deref(), "Password")?;

    let user = state
        .shared
        .auth_service
        .register(username, password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// POST /login
/// A fresh session id is issued on success; failures leave the session untouched.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let username = require_field(payload.username.as_deref(), "Username")?;
    let password = require_secret(payload.password.as_deref(), "Password")?;

    let user = match state.shared.auth_service.login(username, password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Failed login attempt for user: {username}");
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(SESSION_USER_ID, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(SESSION_USERNAME, &user.username)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in: {}", user.username);

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
    }))
}

/// POST /logout
pub async fn logout(session: Session) -> Result<Json<MessageResponse>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to end session: {e}")))?;
    Ok(Json(MessageResponse::new("Logged out")))
}

/// GET /me
pub async fn me(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let user = state
        .shared
        .auth_service
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    Ok(Json(CurrentUserResponse { user }))
}

// ============================================================================
// Helpers
// ============================================================================

/// Get the user id from the session, returns error if not authenticated
pub async fn session_user_id(session: &Session) -> Result<i32, ApiError> {
    session
        .get::<i32>(SESSION_USER_ID)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
}
