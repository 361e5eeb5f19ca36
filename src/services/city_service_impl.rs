//! `SeaORM` implementation of the `CityService` trait.

use crate::db::Store;
use crate::services::city_service::{CityDto, CityError, CityService};
use async_trait::async_trait;

pub struct SeaOrmCityService {
    store: Store,
}

impl SeaOrmCityService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CityService for SeaOrmCityService {
    async fn save(&self, user_id: i32, name: &str) -> Result<CityDto, CityError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CityError::MissingName);
        }

        if self.store.city_exists(user_id, name).await? {
            return Err(CityError::AlreadySaved(name.to_string()));
        }

        // The unique index still catches a concurrent insert of the same pair.
        self.store
            .add_city(user_id, name)
            .await?
            .map(CityDto::from)
            .ok_or_else(|| CityError::AlreadySaved(name.to_string()))
    }

    async fn list(&self, user_id: i32) -> Result<Vec<CityDto>, CityError> {
        let cities = self.store.list_cities(user_id).await?;
        Ok(cities.into_iter().map(CityDto::from).collect())
    }
}
