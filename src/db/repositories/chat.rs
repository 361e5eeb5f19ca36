use crate::entities::{chats, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
};

/// Append-only log of relayed chat exchanges.
pub struct ChatRepository {
    conn: DatabaseConnection,
}

impl ChatRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&self, user_message: &str, bot_message: &str) -> Result<ChatExchange> {
        let active = chats::ActiveModel {
            user_message: Set(user_message.to_string()),
            bot_message: Set(bot_message.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to record chat exchange")?;

        Ok(ChatExchange::from(model))
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<ChatExchange>> {
        let rows = Chats::find()
            .order_by_desc(chats::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to load chat exchanges")?;

        Ok(rows.into_iter().map(ChatExchange::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Chats::find()
            .count(&self.conn)
            .await
            .context("Failed to count chat exchanges")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub id: i32,
    pub user_message: String,
    pub bot_message: String,
    pub created_at: String,
}

impl From<chats::Model> for ChatExchange {
    fn from(m: chats::Model) -> Self {
        Self {
            id: m.id,
            user_message: m.user_message,
            bot_message: m.bot_message,
            created_at: m.created_at,
        }
    }
}
