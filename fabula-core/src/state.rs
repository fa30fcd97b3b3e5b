//! Conversation state model
//!
//! `GameState` is the whole-record unit of persistence: every store reads
//! and writes it as a single JSON document. It carries no behavior beyond
//! appending messages; all I/O lives in the storage layer.
//!
//! Field names on the wire are camelCase (`isPlayer`, `sessionStarted`),
//! matching the format the web client already speaks.

use chrono::Utc;
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single utterance in the conversation, either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    /// True for human input, false for generated output.
    pub is_player: bool,
    /// ISO-8601 creation time, stamped by the constructor, never by a store.
    pub timestamp: String,
    /// Marks a synthesized failure message (e.g. the model call failed and
    /// the orchestrator recorded an apology instead of losing the turn).
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl Message {
    /// A player utterance, stamped with the current UTC time.
    pub fn player(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_player: true,
            timestamp: Utc::now().to_rfc3339(),
            is_error: false,
        }
    }

    /// A game-master response, stamped with the current UTC time.
    pub fn game_master(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_player: false,
            timestamp: Utc::now().to_rfc3339(),
            is_error: false,
        }
    }

    /// A synthesized error message, recorded in place of a lost turn.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_player: false,
            timestamp: Utc::now().to_rfc3339(),
            is_error: true,
        }
    }

    /// Replace the stamped timestamp with one the caller already carries.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

/// The persisted conversation state for one session or save slot.
///
/// `messages` is append-only and never reordered. The optional bookkeeping
/// fields come from older save-slot designs; the persistence layer passes
/// them through untouched and omits them from JSON when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Set once the first successful game-master turn lands.
    #[serde(default)]
    pub session_started: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_save: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
}

impl GameState {
    /// The canonical empty state: no messages, session not started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. A non-player, non-error message marks the session
    /// as started; error messages do not, so a failed opening turn can be
    /// retried from scratch.
    pub fn append(&mut self, message: Message) {
        if !message.is_player && !message.is_error {
            self.session_started = true;
        }
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
