//! Postgres checkpoint storage
//!
//! Networked relational backend for hosted deployments. Same table shape
//! as the SQLite backend, with the state blob in a JSONB column and
//! timestamps kept by the server clock.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::state::GameState;

use super::traits::CheckpointStore;

/// Checkpoint store backed by a Postgres connection pool.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to the database and ensure the schema exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(url).await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Wrap an existing pool (shared with other application tables).
    pub async fn with_pool(pool: PgPool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS checkpoints (
                state_key TEXT PRIMARY KEY,
                state JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for PostgresStore {
    async fn get(&self, key: &str) -> Result<Option<GameState>, StoreError> {
        let raw: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT state FROM checkpoints WHERE state_key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        match raw {
            None => Ok(None),
            Some(value) => match serde_json::from_value(value) {
                Ok(state) => Ok(Some(state)),
                Err(e) => {
                    tracing::warn!(key, error = %e, "skipping corrupt checkpoint row");
                    Ok(None)
                }
            },
        }
    }

    async fn put(&self, key: &str, state: &GameState) -> Result<(), StoreError> {
        let value = serde_json::to_value(state)?;
        sqlx::query(
            r#"
            INSERT INTO checkpoints (state_key, state)
            VALUES ($1, $2)
            ON CONFLICT (state_key) DO UPDATE SET
                state = EXCLUDED.state,
                updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(&value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM checkpoints WHERE state_key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let keys: Vec<String> = sqlx::query_scalar(
            "SELECT state_key FROM checkpoints
             WHERE state_key LIKE $1 || '%'
             ORDER BY state_key ASC",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        // LIKE treats `_` and `%` as wildcards; re-check the prefix exactly.
        Ok(keys
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Message;

    // Runs only when a disposable database is configured, e.g.
    // FABULA_POSTGRES_TEST_URL=postgres://localhost/fabula_test cargo test --features postgres
    #[tokio::test]
    async fn roundtrip_against_live_database() {
        let Ok(url) = std::env::var("FABULA_POSTGRES_TEST_URL") else {
            return;
        };
        let store = PostgresStore::connect(&url).await.unwrap();

        let mut state = GameState::new();
        state.append(Message::player("hi"));
        state.append(Message::game_master("hello adventurer"));

        store.put("pg-test/thread-1", &state).await.unwrap();
        assert_eq!(store.get("pg-test/thread-1").await.unwrap().unwrap(), state);

        state.append(Message::player("again"));
        store.put("pg-test/thread-1", &state).await.unwrap();
        assert_eq!(
            store
                .get("pg-test/thread-1")
                .await
                .unwrap()
                .unwrap()
                .messages
                .len(),
            3
        );

        assert_eq!(
            store.list_keys("pg-test/").await.unwrap(),
            vec!["pg-test/thread-1".to_string()]
        );

        store.delete("pg-test/thread-1").await.unwrap();
        store.delete("pg-test/thread-1").await.unwrap();
        assert!(store.get("pg-test/thread-1").await.unwrap().is_none());
    }
}
