//! Error taxonomy for the persistence layer
//!
//! Three classes matter to callers: validation failures (bad save name,
//! surfaced immediately and never retried), storage failures (I/O and
//! connectivity, propagated with detail for logging), and not-found, which
//! is not an error
//! at all: absent or corrupt state loads as a fresh default so the player
//! can always continue.

use thiserror::Error;

/// Errors surfaced by checkpoint stores and the save manager.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The slot name is reserved for system use (`autosave`, `new`).
    #[error("save name {name:?} is reserved")]
    ReservedSaveName { name: String },

    /// The slot name is malformed (empty, or contains a path separator).
    #[error("save name {name:?} is not allowed: {reason}")]
    InvalidSaveName { name: String, reason: &'static str },

    /// File-backend I/O failure.
    #[error("storage i/o failure")]
    Io(#[from] std::io::Error),

    /// The state could not be encoded for storage.
    #[error("failed to serialize game state")]
    Serialize(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("sqlite storage failure")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error("postgres storage failure")]
    Postgres(#[from] sqlx::Error),

    /// Configuration selected a backend this build does not include.
    #[error("unsupported storage backend {0:?}")]
    UnsupportedBackend(String),
}

impl StoreError {
    /// True for caller mistakes the route layer should map to a 4xx
    /// response rather than a generic storage failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ReservedSaveName { .. } | Self::InvalidSaveName { .. }
        )
    }
}
