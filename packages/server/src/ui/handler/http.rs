//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::GameSummaryDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of live games
pub async fn list_games(State(state): State<Arc<AppState>>) -> Json<Vec<GameSummaryDto>> {
    let games = state.list_games_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(games.into_iter().map(GameSummaryDto::from).collect())
}
