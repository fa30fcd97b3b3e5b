//! File-backed checkpoint storage
//!
//! One JSON document per key under a root directory, named `<key>.json`.
//! Keys containing `/` map to subdirectories, which is how scoped save
//! slots land on disk (`checkpoints/s1/alpha.json`).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;

use crate::error::StoreError;
use crate::state::GameState;

use super::traits::CheckpointStore;

// Unique scratch names so concurrent writers to one key never share a
// temp file; the final rename is what makes the write atomic.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Checkpoint store keeping one JSON file per key.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn checkpoint_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl CheckpointStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<GameState>, StoreError> {
        let path = self.checkpoint_path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(key, error = %e, "skipping corrupt checkpoint file");
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, state: &GameState) -> Result<(), StoreError> {
        let path = self.checkpoint_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(state)?;
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = self.root.join(format!("{key}.json.tmp{seq}"));
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.checkpoint_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        // "s1/" lists the s1 subdirectory; a bare prefix filters stems in
        // the root. Listing is non-recursive: one scope, one directory.
        let (dir, dir_part, name_prefix) = match prefix.rsplit_once('/') {
            Some((dir_part, name_part)) => (self.root.join(dir_part), dir_part, name_part),
            None => (self.root.clone(), "", prefix),
        };

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !stem.starts_with(name_prefix) {
                continue;
            }
            if dir_part.is_empty() {
                keys.push(stem.to_string());
            } else {
                keys.push(format!("{dir_part}/{stem}"));
            }
        }
        keys.sort();
        Ok(keys)
    }
}
