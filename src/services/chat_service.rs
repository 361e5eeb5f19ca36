//! Chat relay: forwards one message to the completion API and logs the exchange.
//!
//! Failures never reach the client as errors. The outcome says what happened
//! so the HTTP layer can still answer 200 with an explicit status.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::Store;

pub const EMPTY_MESSAGE_REPLY: &str = "Please type something.";
pub const APOLOGY_REPLY: &str = "Sorry, I couldn't come up with a reply right now. Please try again.";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Request(String),

    #[error("Completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion API returned no reply")]
    EmptyReply,

    #[error("Completion API returned a malformed body: {0}")]
    Malformed(String),
}

/// A single-turn text completion.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Nothing to send upstream.
    Empty,
    /// Trimmed reply, already persisted.
    Replied(String),
    /// Upstream or persistence failed; the client gets the apology text.
    Failed,
}

impl ChatOutcome {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Empty => EMPTY_MESSAGE_REPLY,
            Self::Replied(reply) => reply,
            Self::Failed => APOLOGY_REPLY,
        }
    }

    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Replied(_) => "ok",
            Self::Failed => "error",
        }
    }
}

pub struct ChatService {
    store: Store,
    provider: Arc<dyn CompletionProvider>,
}

impl ChatService {
    #[must_use]
    pub fn new(store: Store, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { store, provider }
    }

    pub async fn reply(&self, message: &str) -> ChatOutcome {
        if message.trim().is_empty() {
            return ChatOutcome::Empty;
        }

        let reply = match self.provider.complete(message).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Chat completion failed: {e}");
                return ChatOutcome::Failed;
            }
        };

        if reply.is_empty() {
            warn!("Chat completion returned only whitespace");
            return ChatOutcome::Failed;
        }

        if let Err(e) = self.store.record_chat(message, &reply).await {
            warn!("Failed to record chat exchange: {e:#}");
            return ChatOutcome::Failed;
        }

        info!(reply_len = reply.len(), "Chat reply relayed");
        ChatOutcome::Replied(reply)
    }
}
