//! SQLite checkpoint storage
//!
//! Embedded relational backend. The whole-record JSON blob lives in a
//! single `checkpoints` table; `put` is a one-statement upsert so a
//! concurrent reader never observes a partial row.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;
use crate::state::GameState;

use super::traits::CheckpointStore;

fn unix_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Checkpoint store backed by an embedded SQLite database.
///
/// The connection is owned by the store and shared behind a mutex; open
/// one store at startup and hand it to the save manager.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        // Timestamps are INTEGER epoch seconds, refreshed on every upsert.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS checkpoints (
                state_key TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<GameState>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let raw: Option<String> = conn
            .query_row(
                "SELECT state FROM checkpoints WHERE state_key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            None => Ok(None),
            Some(text) => match serde_json::from_str(&text) {
                Ok(state) => Ok(Some(state)),
                Err(e) => {
                    tracing::warn!(key, error = %e, "skipping corrupt checkpoint row");
                    Ok(None)
                }
            },
        }
    }

    async fn put(&self, key: &str, state: &GameState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        let now = unix_timestamp();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO checkpoints (state_key, state, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(state_key) DO UPDATE SET
                 state = excluded.state,
                 updated_at = excluded.updated_at",
            params![key, json, now],
        )?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM checkpoints WHERE state_key = ?1",
            params![key],
        )?;
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT state_key FROM checkpoints
             WHERE state_key LIKE ?1 || '%'
             ORDER BY state_key ASC",
        )?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        // LIKE treats `_` and `%` as wildcards; re-check the prefix exactly.
        Ok(keys
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }
}
