use std::sync::Arc;
use tower_sessions_sqlx_store::SqliteStore;
use tracing::warn;

use crate::clients::openai::OpenAiClient;
use crate::clients::openweather::OpenWeatherClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ChatService, CityService, CompletionProvider, SeaOrmAuthService,
    SeaOrmCityService, WeatherProvider,
};

/// Build a shared HTTP client for all upstream calls.
/// Reusing one client keeps connection pooling across requests.
fn build_shared_http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            config.http.request_timeout_seconds,
        ))
        .user_agent(config.http.user_agent.clone())
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub session_store: SqliteStore,

    pub auth_service: Arc<dyn AuthService>,

    pub city_service: Arc<dyn CityService>,

    /// `None` when no weather API key is configured.
    pub weather: Option<Arc<dyn WeatherProvider>>,

    pub chat_service: Arc<ChatService>,
}

impl SharedState {
    /// Wires the real upstream clients from configuration.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(&config)?;

        let weather = OpenWeatherClient::from_config(http_client.clone(), &config.weather)
            .map(|c| Arc::new(c) as Arc<dyn WeatherProvider>);
        if weather.is_none() {
            warn!("WEATHER_API_KEY is not set; /api/weather will answer 500");
        }

        let completion =
            Arc::new(OpenAiClient::from_config(http_client, &config.completion)?)
                as Arc<dyn CompletionProvider>;

        Self::with_providers(config, weather, completion).await
    }

    /// Wires the state around caller-supplied upstream providers.
    pub async fn with_providers(
        config: Config,
        weather: Option<Arc<dyn WeatherProvider>>,
        completion: Arc<dyn CompletionProvider>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let session_store = store.session_store().await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let city_service = Arc::new(SeaOrmCityService::new(store.clone())) as Arc<dyn CityService>;

        let chat_service = Arc::new(ChatService::new(store.clone(), completion));

        Ok(Self {
            config: Arc::new(config),
            store,
            session_store,
            auth_service,
            city_service,
            weather,
            chat_service,
        })
    }
}
