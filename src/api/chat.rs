use axum::{Json, body::Bytes, extract::State};
use std::sync::Arc;
use tracing::debug;

use super::{AppState, ChatRequest, ChatResponse};

/// POST /chat
///
/// Always 200. An unreadable body is treated as an empty message, and
/// upstream failures come back as an apology with `status: "error"`.
pub async fn chat(State(state): State<Arc<AppState>>, body: Bytes) -> Json<ChatResponse> {
    let request: ChatRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Unreadable chat body, treating as empty: {e}");
        ChatRequest::default()
    });

    let outcome = state.shared.chat_service.reply(&request.message).await;

    Json(ChatResponse {
        response: outcome.text().to_string(),
        status: outcome.status(),
    })
}
