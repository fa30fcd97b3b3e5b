//! Checkpoint storage backends
//!
//! This module provides the `CheckpointStore` trait and one implementation
//! per backend:
//!
//! - `MemoryStore` - in-process map (default, no persistence)
//! - `FileStore` - one JSON document per key under a directory
//! - `SqliteStore` - embedded database (requires the `sqlite` feature)
//! - `PostgresStore` - networked database (requires the `postgres` feature)
//!
//! All backends satisfy the same contract, making them interchangeable
//! behind `Arc<dyn CheckpointStore>`.

mod file;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use traits::CheckpointStore;
