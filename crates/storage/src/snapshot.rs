//! Persisted shape of the active question session.
//!
//! Only the current session and its deck survive a restart. Anything the card
//! stack animates is rebuilt from scratch on launch.

use convo_core::model::{Deck, Session};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// Fixed key the active session is stored under.
pub const SESSION_STORE_KEY: &str = "question-session-storage";

/// Current encoding version of [`PersistedSessionState`].
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSessionState {
    pub version: u32,
    pub current_session: Option<Session>,
    pub current_deck: Option<Deck>,
}

impl PersistedSessionState {
    #[must_use]
    pub fn new(current_session: Option<Session>, current_deck: Option<Deck>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            current_session,
            current_deck,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(None, None)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current_session.is_none() && self.current_deck.is_none()
    }

    /// Encode as JSON for the key-value store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Decode a stored value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON or an unknown version.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let state: Self =
            serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        if state.version != SNAPSHOT_VERSION {
            return Err(StorageError::Serialization(format!(
                "unsupported snapshot version: {}",
                state.version
            )));
        }
        Ok(state)
    }
}
