use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::models::role::Role;
use crate::state::AppState;

/// Key selecting the pre-rendered narration track: the sorted,
/// hyphen-joined set of narrated special roles present in the game.
/// The base roles (and percival) share one narration and contribute
/// nothing to the key.
pub fn narration_key(roles: &[Role]) -> String {
    let mut narrated: Vec<&str> = roles
        .iter()
        .filter(|role| role.is_narrated())
        .map(|role| role.as_str())
        .collect();
    narrated.sort_unstable();
    narrated.dedup();
    narrated.join("-")
}

/// Resolves the narration file for a game from the roles of its players.
pub async fn narration_path(state: &AppState, game_id: &str) -> Result<PathBuf> {
    let game = state.load_game(game_id).await?;
    let mut roles = Vec::with_capacity(game.players.len());
    for player_id in &game.players {
        roles.push(state.load_player(player_id).await?.role);
    }
    let key = narration_key(&roles);
    Ok(state.config.resources_dir.join(format!("_{}.mp3", key)))
}

pub async fn narration_bytes(state: &AppState, game_id: &str) -> Result<Vec<u8>> {
    let path = narration_path(state, game_id).await?;
    tokio::fs::read(&path).await.map_err(|e| {
        log::warn!("narration asset {:?} unavailable: {}", path, e);
        Error::RecordNotFound {
            kind: "narration",
            id: path.to_string_lossy().into_owned(),
        }
    })
}
