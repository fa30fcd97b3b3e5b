//! Storage backend selection
//!
//! One external configuration value picks the backend at startup; the rest
//! of the crate is backend-agnostic. The store is constructed once here and
//! owned by the caller for the life of the process - there is no global
//! connection state.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StoreError;
use crate::storage::CheckpointStore;
#[cfg(feature = "postgres")]
use crate::storage::PostgresStore;
#[cfg(feature = "sqlite")]
use crate::storage::SqliteStore;
use crate::storage::{FileStore, MemoryStore};

/// Where checkpoints land when nothing is configured.
pub const DEFAULT_CHECKPOINT_DIR: &str = "./checkpoints";

/// Which checkpoint backend to run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    File { dir: PathBuf },
    Sqlite { path: PathBuf },
    Postgres { url: String },
}

impl StorageConfig {
    /// Map a single configuration value to a backend:
    ///
    /// - `memory` -> in-process store
    /// - `postgres://...` / `postgresql://...` -> Postgres
    /// - `sqlite://<path>` -> embedded SQLite
    /// - `file://<dir>` or a bare path -> JSON files under that directory
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("memory") {
            Self::Memory
        } else if value.starts_with("postgres://") || value.starts_with("postgresql://") {
            Self::Postgres {
                url: value.to_string(),
            }
        } else if let Some(path) = value.strip_prefix("sqlite://") {
            Self::Sqlite { path: path.into() }
        } else if let Some(dir) = value.strip_prefix("file://") {
            Self::File { dir: dir.into() }
        } else {
            Self::File { dir: value.into() }
        }
    }

    /// Read the backend from `FABULA_STORAGE_URL`, falling back to
    /// `DATABASE_URL` (the hosting convention the app deployed under),
    /// then to file storage in [`DEFAULT_CHECKPOINT_DIR`].
    pub fn from_env() -> Self {
        match std::env::var("FABULA_STORAGE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::File {
                dir: PathBuf::from(DEFAULT_CHECKPOINT_DIR),
            },
        }
    }

    /// Construct the configured store. Fails with `UnsupportedBackend`
    /// when the selection needs a feature this build was compiled without.
    pub async fn open(&self) -> Result<Arc<dyn CheckpointStore>, StoreError> {
        match self {
            Self::Memory => Ok(Arc::new(MemoryStore::new())),
            Self::File { dir } => Ok(Arc::new(FileStore::open(dir).await?)),
            #[cfg(feature = "sqlite")]
            Self::Sqlite { path } => Ok(Arc::new(SqliteStore::open(path)?)),
            #[cfg(not(feature = "sqlite"))]
            Self::Sqlite { .. } => Err(StoreError::UnsupportedBackend(
                "sqlite (build without the `sqlite` feature)".to_string(),
            )),
            #[cfg(feature = "postgres")]
            Self::Postgres { url } => Ok(Arc::new(PostgresStore::connect(url).await?)),
            #[cfg(not(feature = "postgres"))]
            Self::Postgres { .. } => Err(StoreError::UnsupportedBackend(
                "postgres (build without the `postgres` feature)".to_string(),
            )),
        }
    }
}
