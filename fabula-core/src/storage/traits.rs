//! The checkpoint store contract
//!
//! Every backend (in-process map, JSON files, SQLite, Postgres) exposes
//! the same durable key→state mapping. Keys are opaque strings: a session
//! id, or a `scope/slot` composite built by the save manager.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::state::GameState;

/// Durable key→state mapping with upsert semantics.
///
/// Contract, identical across backends:
///
/// - `get` never fabricates a default; absence is `Ok(None)`. A stored
///   value that is present but unparseable is logged and reported as
///   absent, so a session is always recoverable by starting fresh.
/// - `put` upserts atomically per key: insert when absent, whole-record
///   replace when present, refreshing the backend's update timestamp.
///   A concurrent reader sees the old value or the new one, never a
///   partial write.
/// - `delete` is idempotent; deleting an absent key succeeds.
/// - `list_keys` returns every key beginning with `prefix`, in ascending
///   lexicographic order on every backend.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<GameState>, StoreError>;

    async fn put(&self, key: &str, state: &GameState) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
