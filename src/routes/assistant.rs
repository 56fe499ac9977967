//! Assistant route.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::services::assistant;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub reply: String,
}

/// `POST /api/assistant/message` — answer a canned directory question.
pub async fn message(
    State(state): State<AppState>,
    Json(body): Json<AssistantRequest>,
) -> Result<Json<AssistantReply>, StatusCode> {
    if body.message.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let reply = assistant::respond(&state.pool, &body.message).await;
    Ok(Json(AssistantReply { reply }))
}

#[cfg(test)]
#[path = "assistant_test.rs"]
mod tests;
