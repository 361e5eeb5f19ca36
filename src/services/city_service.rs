//! Domain service for per-user saved cities.

use serde::Serialize;
use thiserror::Error;

use crate::db::City;

#[derive(Debug, Error)]
pub enum CityError {
    #[error("City is required")]
    MissingName,

    #[error("City '{0}' is already saved")]
    AlreadySaved(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    pub created_at: String,
}

impl From<City> for CityDto {
    fn from(city: City) -> Self {
        Self {
            id: city.id,
            name: city.name,
            user_id: city.user_id,
            created_at: city.created_at,
        }
    }
}

#[async_trait::async_trait]
pub trait CityService: Send + Sync {
    /// Saves `name` for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CityError::AlreadySaved`] if the user already has this city.
    async fn save(&self, user_id: i32, name: &str) -> Result<CityDto, CityError>;

    /// All cities owned by `user_id`, oldest first.
    async fn list(&self, user_id: i32) -> Result<Vec<CityDto>, CityError>;
}
