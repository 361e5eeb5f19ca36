use crate::entities::{cities, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::info;

/// Repository for saved cities. Every query is scoped to one owner.
pub struct CityRepository {
    conn: DatabaseConnection,
}

impl CityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: cities::Model) -> City {
        City {
            id: m.id,
            name: m.name,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }

    pub async fn exists(&self, user_id: i32, name: &str) -> Result<bool> {
        let found = Cities::find()
            .filter(cities::Column::UserId.eq(user_id))
            .filter(cities::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query city")?;

        Ok(found.is_some())
    }

    /// Returns `None` if the owner already saved this city.
    pub async fn add(&self, user_id: i32, name: &str) -> Result<Option<City>> {
        let active = cities::ActiveModel {
            name: Set(name.to_string()),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => {
                info!("Saved city '{}' for user {}", model.name, user_id);
                Ok(Some(Self::map_model(model)))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to insert city"),
        }
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<City>> {
        let rows = Cities::find()
            .filter(cities::Column::UserId.eq(user_id))
            .order_by_asc(cities::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list cities")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    pub created_at: String,
}
