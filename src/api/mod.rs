use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use sha2::{Digest, Sha512};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod chat;
mod cities;
mod error;
mod observability;
mod system;
mod types;
mod validation;
mod weather;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

/// Cookie signing key stretched from the configured secret.
fn session_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config();

    let session_layer = SessionManagerLayer::new(state.shared.session_store.clone())
        .with_secure(config.server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.server.session_ttl_minutes,
        )));

    let protected_routes = Router::new()
        .route("/cities", get(cities::list_cities).post(cities::save_city))
        .route("/me", get(auth::me))
        .route_layer(middleware::from_fn(auth::require_session));

    let app_routes = Router::new()
        .merge(protected_routes)
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/chat", post(chat::chat))
        .route("/api", get(system::root))
        .route("/api/health", get(system::health))
        .route("/api/weather", get(weather::get_weather))
        .route("/api/getApiKey", get(weather::get_api_key))
        .route("/metrics", get(observability::get_metrics));

    let app_routes = match config.server.session_secret.as_deref() {
        Some(secret) => app_routes.layer(session_layer.with_signed(session_key(secret))),
        None => app_routes.layer(session_layer),
    };

    app_routes
        .with_state(state.clone())
        .layer(cors_layer(&config.server.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

/// Wildcard origins cannot carry cookies, so credentials are only allowed
/// for an explicit origin list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
