use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{Error, Result};

/// The two record kinds the game core persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Games,
    Players,
}

impl Table {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "games" => Ok(Table::Games),
            "players" => Ok(Table::Players),
            other => Err(Error::BadRequest(format!(
                "table '{}' should be 'games' or 'players'",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Table::Games => "games",
            Table::Players => "players",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value record store the core is handed at construction. Records are
/// written whole; a read-modify-write of one game is a single `get` plus a
/// single `put`, never a sequence of field updates.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a record and returns its id. The record's own `id` field
    /// wins when present; otherwise one is generated.
    async fn insert(&self, table: Table, record: Value) -> Result<String>;
    async fn get(&self, table: Table, id: &str) -> Result<Value>;
    async fn put(&self, table: Table, id: &str, record: Value) -> Result<()>;
    async fn list(&self, table: Table) -> Result<Vec<Value>>;
    async fn clear(&self, table: Table) -> Result<()>;
}

/// In-process store backing the server by default. One map per table.
#[derive(Clone, Default)]
pub struct MemoryStore {
    games: Arc<Mutex<HashMap<String, Value>>>,
    players: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, table: Table) -> &Arc<Mutex<HashMap<String, Value>>> {
        match table {
            Table::Games => &self.games,
            Table::Players => &self.players,
        }
    }

    fn kind(table: Table) -> &'static str {
        match table {
            Table::Games => "game",
            Table::Players => "player",
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, table: Table, mut record: Value) -> Result<String> {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        if let Some(map) = record.as_object_mut() {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        self.table(table).lock().await.insert(id.clone(), record);
        Ok(id)
    }

    async fn get(&self, table: Table, id: &str) -> Result<Value> {
        self.table(table)
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::RecordNotFound {
                kind: Self::kind(table),
                id: id.to_string(),
            })
    }

    async fn put(&self, table: Table, id: &str, record: Value) -> Result<()> {
        self.table(table)
            .lock()
            .await
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn list(&self, table: Table) -> Result<Vec<Value>> {
        Ok(self.table(table).lock().await.values().cloned().collect())
    }

    async fn clear(&self, table: Table) -> Result<()> {
        self.table(table).lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_generates_an_id_and_get_round_trips() {
        let store = MemoryStore::new();
        let id = store
            .insert(Table::Players, json!({"name": "Romain"}))
            .await
            .unwrap();
        let record = store.get(Table::Players, &id).await.unwrap();
        assert_eq!(record["name"], "Romain");
        assert_eq!(record["id"], Value::String(id));
    }

    #[tokio::test]
    async fn missing_record_is_a_not_found() {
        let store = MemoryStore::new();
        let err = store.get(Table::Games, "nope").await.unwrap_err();
        assert!(matches!(err, Error::RecordNotFound { kind: "game", .. }));
    }

    #[tokio::test]
    async fn clear_empties_one_table_only() {
        let store = MemoryStore::new();
        store.insert(Table::Games, json!({})).await.unwrap();
        store.insert(Table::Players, json!({})).await.unwrap();
        store.clear(Table::Games).await.unwrap();
        assert!(store.list(Table::Games).await.unwrap().is_empty());
        assert_eq!(store.list(Table::Players).await.unwrap().len(), 1);
    }
}
