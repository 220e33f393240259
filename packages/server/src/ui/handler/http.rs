//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{infrastructure::dto::http::PresenceDto, ui::state::AppState};

/// Static status text served at the root path
pub const ROOT_STATUS: &str = "Hubbub chat relay is running. Connect via WebSocket at /ws";

/// Root endpoint (human-readable status)
pub async fn root() -> &'static str {
    ROOT_STATUS
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the current presence snapshot
pub async fn get_presence(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PresenceDto>, StatusCode> {
    match state.relay.snapshot().await {
        Ok(users) => {
            // Domain Model から DTO への変換
            let users: Vec<String> = users.into_iter().map(|u| u.into_string()).collect();
            Ok(Json(PresenceDto {
                count: users.len(),
                users,
            }))
        }
        Err(e) => {
            tracing::error!("Failed to read presence: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
