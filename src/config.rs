use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Completion keys issued by the upstream provider carry this prefix.
const COMPLETION_KEY_PREFIX: &str = "sk-";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub weather: WeatherConfig,

    pub completion: CompletionConfig,

    pub http: HttpConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/nimbus.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Sessions expire after this many minutes without a request.
    pub session_ttl_minutes: i64,

    /// When set, session cookies are signed with a key derived from this secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            secure_cookies: true,
            session_ttl_minutes: 60 * 24,
            session_secret: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Unit system passed upstream ("metric", "imperial" or "standard")
    pub units: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: None,
            units: "metric".to_string(),
        }
    }
}

impl WeatherConfig {
    /// The configured key, ignoring blank values.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub model: String,

    pub max_tokens: u32,

    pub temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Upper bound for any single upstream call.
    pub request_timeout_seconds: u64,

    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            user_agent: format!("Nimbus/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            completion: CompletionConfig::default(),
            http: HttpConfig::default(),
            security: SecurityConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Overrides file values with the deployment environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.general.database_path = url;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.general.log_level = level;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }
        if let Some(secret) = lookup("SESSION_SECRET") {
            self.server.session_secret = Some(secret);
        }
        if let Some(key) = lookup("WEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.completion.api_key = Some(key);
        }
        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("nimbus").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".nimbus").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    /// Startup checks. The server must not come up without a usable completion key.
    pub fn validate(&self) -> Result<()> {
        let key = self
            .completion
            .api_key
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();

        if key.is_empty() {
            anyhow::bail!("Completion API key is not set (OPENAI_API_KEY)");
        }

        if !key.starts_with(COMPLETION_KEY_PREFIX) || key.len() <= COMPLETION_KEY_PREFIX.len() {
            anyhow::bail!("Completion API key is malformed");
        }

        if let Some(secret) = &self.server.session_secret
            && secret.len() < 32
        {
            anyhow::bail!("Session secret must be at least 32 characters");
        }

        if self.server.session_ttl_minutes <= 0 {
            anyhow::bail!("Session TTL must be > 0 minutes");
        }

        if self.http.request_timeout_seconds == 0 {
            anyhow::bail!("HTTP request timeout must be > 0 seconds");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.completion.api_key = Some("sk-test-123".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.weather.units, "metric");
        assert!(config.weather.key().is_none());
        assert_eq!(config.http.request_timeout_seconds, 30);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [weather]
            api_key = "abc"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.weather.key(), Some("abc"));
        assert_eq!(config.completion.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_serialization_omits_secrets() {
        let mut config = valid_config();
        config.weather.api_key = Some("weather-secret".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(!toml_str.contains("sk-test-123"));
        assert!(!toml_str.contains("weather-secret"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "8081"),
            ("WEATHER_API_KEY", "owm"),
            ("OPENAI_API_KEY", "sk-env"),
            ("DATABASE_URL", "sqlite:/tmp/x.db"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|name| env.get(name).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.weather.key(), Some("owm"));
        assert_eq!(config.completion.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.general.database_path, "sqlite:/tmp/x.db");
    }

    #[test]
    fn test_env_rejects_bad_port() {
        let mut config = Config::default();
        let result = config.apply_env(|name| (name == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_completion_key() {
        assert!(valid_config().validate().is_ok());

        let mut missing = valid_config();
        missing.completion.api_key = None;
        assert!(missing.validate().is_err());

        let mut blank = valid_config();
        blank.completion.api_key = Some("   ".to_string());
        assert!(blank.validate().is_err());

        let mut malformed = valid_config();
        malformed.completion.api_key = Some("not-a-key".to_string());
        assert!(malformed.validate().is_err());

        let mut prefix_only = valid_config();
        prefix_only.completion.api_key = Some("sk-".to_string());
        assert!(prefix_only.validate().is_err());
    }

    #[test]
    fn test_validate_session_secret_length() {
        let mut config = valid_config();
        config.server.session_secret = Some("short".to_string());
        assert!(config.validate().is_err());

        config.server.session_secret = Some("x".repeat(32));
        assert!(config.validate().is_ok());
    }
}
