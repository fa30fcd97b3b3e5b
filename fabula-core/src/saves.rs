//! Named save slots and session records
//!
//! `SaveManager` layers the user-facing save surface over any
//! `CheckpointStore`:
//!
//! - named slots, with `autosave` and `new` reserved
//! - an autosave mirror that always reflects the most recent write
//! - per-session records keyed by the session id, saved around each turn
//! - start-fresh loading: absent or corrupt state becomes an empty state
//!
//! A named slot under scope `s` is stored at key `s/<name>`; an unscoped
//! slot at `<name>`; a session record at the bare session id. The scheme is
//! why slot names may not contain separators - a name like `a/b` would
//! escape its scope.

use std::sync::Arc;

use crate::error::StoreError;
use crate::state::GameState;
use crate::storage::CheckpointStore;

/// The slot mirroring the most recent write; never saved to directly.
pub const AUTOSAVE_SLOT: &str = "autosave";

/// Names the UI claims for its own flows ("new" starts a fresh game).
const RESERVED_SLOTS: &[&str] = &[AUTOSAVE_SLOT, "new"];

/// Save/load façade over a checkpoint store.
pub struct SaveManager {
    store: Arc<dyn CheckpointStore>,
}

impl SaveManager {
    pub fn new(store: Arc<dyn CheckpointStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CheckpointStore> {
        &self.store
    }

    fn slot_key(scope: Option<&str>, name: &str) -> String {
        match scope {
            Some(scope) => format!("{scope}/{name}"),
            None => name.to_string(),
        }
    }

    fn scope_prefix(scope: Option<&str>) -> String {
        match scope {
            Some(scope) => format!("{scope}/"),
            None => String::new(),
        }
    }

    /// Reject reserved and malformed slot names. Reserved names match
    /// case-insensitively ("AutoSave" is as off-limits as "autosave").
    pub fn validate_slot_name(name: &str) -> Result<(), StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidSaveName {
                name: name.to_string(),
                reason: "name is empty",
            });
        }
        if name.contains('/') || name.contains('\\') {
            return Err(StoreError::InvalidSaveName {
                name: name.to_string(),
                reason: "name contains a path separator",
            });
        }
        if RESERVED_SLOTS.iter().any(|r| name.eq_ignore_ascii_case(r)) {
            return Err(StoreError::ReservedSaveName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Write `state` to a named slot, then mirror it to the scope's
    /// autosave slot. Abandoning a named save never loses progress: the
    /// latest turn is always recoverable under `autosave`.
    pub async fn save_checkpoint(
        &self,
        state: &GameState,
        name: &str,
        scope: Option<&str>,
    ) -> Result<(), StoreError> {
        Self::validate_slot_name(name)?;
        self.store.put(&Self::slot_key(scope, name), state).await?;
        self.store
            .put(&Self::slot_key(scope, AUTOSAVE_SLOT), state)
            .await
    }

    /// Load a named slot, or a fresh empty state when the slot was never
    /// saved (or its blob is unreadable). Storage failures propagate.
    pub async fn load_checkpoint(
        &self,
        name: &str,
        scope: Option<&str>,
    ) -> Result<GameState, StoreError> {
        let key = Self::slot_key(scope, name);
        match self.store.get(&key).await? {
            Some(state) => Ok(state),
            None => {
                tracing::debug!(key = %key, "no checkpoint found, starting fresh");
                Ok(GameState::new())
            }
        }
    }

    /// Every slot name under the scope except `autosave`, in ascending
    /// lexicographic order.
    pub async fn list_saves(&self, scope: Option<&str>) -> Result<Vec<String>, StoreError> {
        let prefix = Self::scope_prefix(scope);
        let keys = self.store.list_keys(&prefix).await?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .filter(|name| !name.contains('/'))
            .filter(|name| !name.eq_ignore_ascii_case(AUTOSAVE_SLOT))
            .collect())
    }

    /// The per-session record written around each interaction.
    pub async fn load_session(&self, session_id: &str) -> Result<GameState, StoreError> {
        match self.store.get(session_id).await? {
            Some(state) => Ok(state),
            None => {
                tracing::debug!(session_id, "no session record, starting fresh");
                Ok(GameState::new())
            }
        }
    }

    pub async fn store_session(
        &self,
        state: &GameState,
        session_id: &str,
    ) -> Result<(), StoreError> {
        self.store.put(session_id, state).await
    }

    /// Remove the per-session record ("reset"). Idempotent.
    pub async fn delete_state(&self, session_id: &str) -> Result<(), StoreError> {
        self.store.delete(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Message;
    use crate::storage::MemoryStore;

    fn manager() -> SaveManager {
        SaveManager::new(Arc::new(MemoryStore::new()))
    }

    fn adventure() -> GameState {
        let mut state = GameState::new();
        state.append(Message::player("hi"));
        state.append(Message::game_master("hello adventurer"));
        state
    }

    #[tokio::test]
    async fn save_then_load_roundtrips() {
        let saves = manager();
        let state = adventure();

        saves.save_checkpoint(&state, "chapter1", None).await.unwrap();
        let loaded = saves.load_checkpoint("chapter1", None).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn autosave_is_reserved_in_any_case_and_scope() {
        let saves = manager();
        let state = adventure();

        for name in ["autosave", "Autosave", "AUTOSAVE"] {
            let err = saves
                .save_checkpoint(&state, name, None)
                .await
                .unwrap_err();
            assert!(err.is_validation(), "{name} must be rejected");

            let err = saves
                .save_checkpoint(&state, name, Some("s1"))
                .await
                .unwrap_err();
            assert!(err.is_validation(), "{name} must be rejected under a scope");
        }
    }

    #[tokio::test]
    async fn new_is_reserved_case_insensitively() {
        let saves = manager();
        let err = saves
            .save_checkpoint(&adventure(), "New", Some("s1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ReservedSaveName { .. }));
    }

    #[tokio::test]
    async fn malformed_names_are_rejected() {
        let saves = manager();
        for name in ["", "   ", "a/b", "a\\b"] {
            let err = saves
                .save_checkpoint(&adventure(), name, None)
                .await
                .unwrap_err();
            assert!(
                matches!(err, StoreError::InvalidSaveName { .. }),
                "{name:?} must be malformed"
            );
        }
    }

    #[tokio::test]
    async fn named_save_mirrors_autosave() {
        let saves = manager();
        let state = adventure();

        saves
            .save_checkpoint(&state, "chapter1", Some("s1"))
            .await
            .unwrap();

        let named = saves.load_checkpoint("chapter1", Some("s1")).await.unwrap();
        let auto = saves.load_checkpoint("autosave", Some("s1")).await.unwrap();
        assert_eq!(named, state);
        assert_eq!(auto, state);
    }

    #[tokio::test]
    async fn load_of_unsaved_slot_starts_fresh() {
        let saves = manager();
        let loaded = saves.load_checkpoint("never-saved", Some("s1")).await.unwrap();
        assert!(loaded.is_empty());
        assert!(!loaded.session_started);
    }

    #[tokio::test]
    async fn list_saves_is_sorted_and_excludes_autosave() {
        let saves = manager();
        let state = adventure();

        saves.save_checkpoint(&state, "bravo", Some("s1")).await.unwrap();
        saves.save_checkpoint(&state, "alpha", Some("s1")).await.unwrap();
        saves.save_checkpoint(&state, "Zulu", Some("s1")).await.unwrap();

        // Many saves later, autosave still never shows up.
        assert_eq!(
            saves.list_saves(Some("s1")).await.unwrap(),
            vec!["Zulu".to_string(), "alpha".to_string(), "bravo".to_string()]
        );
    }

    #[tokio::test]
    async fn scoped_slots_stay_out_of_unscoped_listing() {
        let saves = manager();
        let state = adventure();

        saves.save_checkpoint(&state, "global", None).await.unwrap();
        saves.save_checkpoint(&state, "scoped", Some("s1")).await.unwrap();

        assert_eq!(
            saves.list_saves(None).await.unwrap(),
            vec!["global".to_string()]
        );
        assert_eq!(
            saves.list_saves(Some("s1")).await.unwrap(),
            vec!["scoped".to_string()]
        );
    }

    #[tokio::test]
    async fn reset_then_load_returns_default_state() {
        let saves = manager();
        let state = adventure();

        saves.store_session(&state, "session-9").await.unwrap();
        saves.delete_state("session-9").await.unwrap();
        // Deleting again is not an error.
        saves.delete_state("session-9").await.unwrap();

        let loaded = saves.load_session("session-9").await.unwrap();
        assert_eq!(loaded, GameState::new());
    }

    #[tokio::test]
    async fn session_roundtrip_keeps_error_messages() {
        let saves = manager();
        let mut state = GameState::new();
        state.append(Message::player("roll for initiative"));
        state.append(Message::error("the dice rolled off the table, try again"));

        saves.store_session(&state, "session-1").await.unwrap();
        let loaded = saves.load_session("session-1").await.unwrap();
        assert_eq!(loaded, state);
        assert!(loaded.messages[1].is_error);
    }

    #[tokio::test]
    async fn alpha_scenario_end_to_end() {
        let saves = manager();
        let state = adventure();

        saves.save_checkpoint(&state, "alpha", Some("s1")).await.unwrap();

        assert_eq!(
            saves.list_saves(Some("s1")).await.unwrap(),
            vec!["alpha".to_string()]
        );

        let auto = saves.load_checkpoint("autosave", Some("s1")).await.unwrap();
        assert_eq!(auto.messages.len(), 2);
        assert_eq!(auto.messages[0].text, "hi");
        assert!(auto.messages[0].is_player);
        assert_eq!(auto.messages[1].text, "hello adventurer");
        assert!(!auto.messages[1].is_player);
    }
}
