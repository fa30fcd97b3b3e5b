//! Session persistence core for the Fabula game master
//!
//! This crate provides:
//! - **State model**: `GameState` / `Message` - the conversation record
//! - **Checkpoint stores**: `CheckpointStore` trait with `MemoryStore`,
//!   `FileStore`, `SqliteStore` (feature `sqlite`), and `PostgresStore`
//!   (feature `postgres`) backends
//! - **Save manager**: named slots with reserved-name rules and an
//!   always-current autosave mirror
//! - **Configuration**: `StorageConfig` - one value selects the backend
//!
//! The HTTP routes and the LLM call sit above this crate; they load state,
//! append messages, and store it back around each interaction:
//!
//! ```no_run
//! use fabula_core::{Message, SaveManager, StorageConfig};
//!
//! # async fn turn(player_input: &str) -> Result<(), fabula_core::StoreError> {
//! let store = StorageConfig::from_env().open().await?;
//! let saves = SaveManager::new(store);
//!
//! let mut state = saves.load_session("session-1").await?;
//! state.append(Message::player(player_input));
//! // ... run the model, append its response ...
//! saves.store_session(&state, "session-1").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod saves;
pub mod state;
pub mod storage;

pub use config::{StorageConfig, DEFAULT_CHECKPOINT_DIR};
pub use error::StoreError;
pub use saves::{SaveManager, AUTOSAVE_SLOT};
pub use state::{GameState, Message};
pub use storage::{CheckpointStore, FileStore, MemoryStore};
#[cfg(feature = "postgres")]
pub use storage::PostgresStore;
#[cfg(feature = "sqlite")]
pub use storage::SqliteStore;
