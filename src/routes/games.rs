use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::models::game::{Game, GameResult};
use crate::services::{audio, game_service};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ProposeRequest {
    travelers: Vec<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_games).put(create_game))
        .nest(
            "/:game_id",
            Router::new()
                .route("/", get(get_game))
                .route("/board", get(get_board))
                .route("/propose", post(propose_team))
                .route("/vote/:player_id", post(cast_vote))
                .route("/quest_unsend", post(quest_unsend))
                .route("/votes", get(get_votes))
                .route("/votes/:quest_number", get(get_quest_votes))
                .route("/guess_merlin", post(guess_merlin))
                .route("/mp3", get(get_mp3)),
        )
        .with_state(state)
}

async fn create_game(
    State(state): State<AppState>,
    Json(req): Json<game_service::CreateGameRequest>,
) -> Result<Json<game_service::GameCreated>> {
    Ok(Json(game_service::create_game(&state, req).await?))
}

async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<serde_json::Value>>> {
    Ok(Json(game_service::list_games(&state).await?))
}

async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Game>> {
    Ok(Json(game_service::get_game(&state, &game_id).await?))
}

async fn get_board(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<game_service::BoardView>> {
    Ok(Json(game_service::board(&state, &game_id).await?))
}

async fn propose_team(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(req): Json<ProposeRequest>,
) -> Result<Json<game_service::BoardView>> {
    Ok(Json(
        game_service::propose_team(&state, &game_id, req.travelers).await?,
    ))
}

async fn cast_vote(
    State(state): State<AppState>,
    Path((game_id, player_id)): Path<(String, String)>,
    Json(vote): Json<bool>,
) -> Result<StatusCode> {
    game_service::record_vote(&state, &game_id, &player_id, vote).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn quest_unsend(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<game_service::BoardView>> {
    Ok(Json(game_service::unsend_mission(&state, &game_id).await?))
}

async fn get_votes(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<game_service::VotesView>> {
    Ok(Json(game_service::get_votes(&state, &game_id, None).await?))
}

async fn get_quest_votes(
    State(state): State<AppState>,
    Path((game_id, quest_number)): Path<(String, usize)>,
) -> Result<Json<game_service::VotesView>> {
    Ok(Json(
        game_service::get_votes(&state, &game_id, Some(quest_number)).await?,
    ))
}

async fn guess_merlin(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<HashMap<String, String>>,
) -> Result<Json<GameResult>> {
    let game = game_service::guess_merlin(&state, &game_id, payload).await?;
    let result = game.result.expect("guess requires an established result");
    Ok(Json(result))
}

async fn get_mp3(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse> {
    let bytes = audio::narration_bytes(&state, &game_id).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], bytes))
}
