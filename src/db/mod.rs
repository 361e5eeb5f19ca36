use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tower_sessions_sqlx_store::SqliteStore;
use tracing::info;

use crate::config::SecurityConfig;

pub mod migrator;
pub mod repositories;

pub use repositories::chat::ChatExchange;
pub use repositories::city::City;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");
        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let opt = connect_options(db_url, max_connections, min_connections);
        let (min_connections, max_connections) =
            (opt.get_min_connections(), opt.get_max_connections());

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections.unwrap_or_default(),
            max_connections.unwrap_or_default()
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Session store sharing this database's pool, with its table created.
    pub async fn session_store(&self) -> Result<SqliteStore> {
        let pool = self.conn.get_sqlite_connection_pool().clone();
        let store = SqliteStore::new(pool);
        store
            .migrate()
            .await
            .context("Failed to create session table")?;
        Ok(store)
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn city_repo(&self) -> repositories::city::CityRepository {
        repositories::city::CityRepository::new(self.conn.clone())
    }

    fn chat_repo(&self) -> repositories::chat::ChatRepository {
        repositories::chat::ChatRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo().create(username, password, config).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    // ========== Cities ==========

    pub async fn city_exists(&self, user_id: i32, name: &str) -> Result<bool> {
        self.city_repo().exists(user_id, name).await
    }

    pub async fn add_city(&self, user_id: i32, name: &str) -> Result<Option<City>> {
        self.city_repo().add(user_id, name).await
    }

    pub async fn list_cities(&self, user_id: i32) -> Result<Vec<City>> {
        self.city_repo().list_for_user(user_id).await
    }

    // ========== Chats ==========

    pub async fn record_chat(&self, user_message: &str, bot_message: &str) -> Result<ChatExchange> {
        self.chat_repo().record(user_message, bot_message).await
    }

    pub async fn recent_chats(&self, limit: u64) -> Result<Vec<ChatExchange>> {
        self.chat_repo().recent(limit).await
    }

    pub async fn chat_count(&self) -> Result<u64> {
        self.chat_repo().count().await
    }
}

fn connect_options(db_url: &str, max_connections: u32, min_connections: u32) -> ConnectOptions {
    let in_memory = db_url.contains(":memory:");

    // Every connection to an in-memory database gets its own empty database,
    // so there is exactly one and it is never recycled.
    let (max_connections, min_connections) = if in_memory {
        (1, 1)
    } else {
        (max_connections, min_connections)
    };

    let mut opt = ConnectOptions::new(db_url.to_string());
    opt.max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if !in_memory {
        opt.idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600));
    }

    opt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn in_memory_connection_is_never_recycled() {
        let opt = connect_options("sqlite::memory:", 5, 1);
        assert_eq!(opt.get_max_connections(), Some(1));
        assert_eq!(opt.get_idle_timeout(), None);
        assert_eq!(opt.get_max_lifetime(), None);

        let opt = connect_options("sqlite:./nimbus.db?mode=rwc", 5, 1);
        assert_eq!(opt.get_max_connections(), Some(5));
        assert_eq!(opt.get_idle_timeout(), Some(Duration::from_secs(300)));
        assert_eq!(opt.get_max_lifetime(), Some(Duration::from_secs(600)));
    }

    async fn memory_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = memory_store().await;
        let security = cheap_security();

        let first = store.create_user("ada", "pw-1", &security).await.unwrap();
        assert!(first.is_some());

        let second = store.create_user("ada", "pw-2", &security).await.unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn password_verification_round_trip() {
        let store = memory_store().await;
        store
            .create_user("grace", "cobol", &cheap_security())
            .await
            .unwrap();

        let ok = store.verify_user_password("grace", "cobol").await.unwrap();
        assert_eq!(ok.map(|u| u.username), Some("grace".to_string()));

        assert!(store.verify_user_password("grace", "fortran").await.unwrap().is_none());
        assert!(store.verify_user_password("nobody", "cobol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cities_are_unique_per_owner_and_scoped() {
        let store = memory_store().await;
        let security = cheap_security();
        let a = store.create_user("a", "pw", &security).await.unwrap().unwrap();
        let b = store.create_user("b", "pw", &security).await.unwrap().unwrap();

        assert!(store.add_city(a.id, "London").await.unwrap().is_some());
        assert!(store.add_city(a.id, "London").await.unwrap().is_none());
        assert!(store.add_city(b.id, "London").await.unwrap().is_some());
        assert!(store.add_city(b.id, "Paris").await.unwrap().is_some());

        let a_cities = store.list_cities(a.id).await.unwrap();
        assert_eq!(a_cities.len(), 1);
        assert!(a_cities.iter().all(|c| c.user_id == a.id));

        assert!(store.city_exists(b.id, "Paris").await.unwrap());
        assert!(!store.city_exists(a.id, "Paris").await.unwrap());
    }

    #[tokio::test]
    async fn chat_log_is_append_only() {
        let store = memory_store().await;
        store.record_chat("hi", "hello").await.unwrap();
        store.record_chat("hi", "hello again").await.unwrap();

        assert_eq!(store.chat_count().await.unwrap(), 2);
        let recent = store.recent_chats(1).await.unwrap();
        assert_eq!(recent[0].bot_message, "hello again");
    }
}
