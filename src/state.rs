use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::game::Game;
use crate::models::player::Player;
use crate::store::{MemoryStore, Store, Table};
use crate::utils::config::Config;

/// Shared handle every route and service receives. The store is injected
/// so tests can swap it; nothing reaches for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    /// One mutex per game id: every read-modify-write of a game record
    /// runs under its game's lock, so concurrent votes cannot lose updates.
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        AppState {
            store,
            config: Arc::new(Config::from_env()),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn game_lock(&self, game_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(game_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn load_game(&self, game_id: &str) -> Result<Game> {
        let value = self.store.get(Table::Games, game_id).await?;
        serde_json::from_value(value)
            .map_err(|e| crate::error::Error::BadRequest(format!("corrupt game record: {}", e)))
    }

    pub async fn save_game(&self, game: &Game) -> Result<()> {
        let value = serde_json::to_value(game)
            .map_err(|e| crate::error::Error::BadRequest(format!("unserializable game: {}", e)))?;
        self.store.put(Table::Games, &game.id, value).await
    }

    pub async fn load_player(&self, player_id: &str) -> Result<Player> {
        let value = self.store.get(Table::Players, player_id).await?;
        serde_json::from_value(value)
            .map_err(|e| crate::error::Error::BadRequest(format!("corrupt player record: {}", e)))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
