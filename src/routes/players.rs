use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;

use crate::error::Result;
use crate::services::game_service;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/players", get(get_players))
        .with_state(state)
}

async fn get_players(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    Ok(Json(game_service::list_players(&state).await?))
}
