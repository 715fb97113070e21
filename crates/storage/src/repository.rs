use async_trait::async_trait;
use convo_core::model::{Deck, DeckId, Question, QuestionId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::snapshot::PersistedSessionState;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for decks.
#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// Persist or update a deck.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deck cannot be stored.
    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError>;

    /// Fetch a deck by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures; a missing deck is `Ok(None)`.
    async fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError>;

    /// List decks ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn list_decks(&self, limit: u32) -> Result<Vec<Deck>, StorageError>;
}

/// Repository contract for questions.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist or update a question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// All questions of a deck in supply order (ascending id).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn list_questions(&self, deck_id: DeckId) -> Result<Vec<Question>, StorageError>;
}

/// Key-value persistence for the active session.
#[async_trait]
pub trait SessionSnapshotRepository: Send + Sync {
    /// Load the snapshot stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value cannot be decoded.
    async fn load_snapshot(&self, key: &str)
    -> Result<Option<PersistedSessionState>, StorageError>;

    /// Replace the snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    async fn save_snapshot(
        &self,
        key: &str,
        state: &PersistedSessionState,
    ) -> Result<(), StorageError>;

    /// Remove the snapshot stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn clear_snapshot(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    decks: Arc<Mutex<BTreeMap<DeckId, Deck>>>,
    questions: Arc<Mutex<HashMap<DeckId, BTreeMap<QuestionId, Question>>>>,
    kv: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl DeckRepository for InMemoryRepository {
    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let mut guard = self.decks.lock().map_err(poisoned)?;
        guard.insert(deck.id(), deck.clone());
        Ok(())
    }

    async fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, StorageError> {
        let guard = self.decks.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_decks(&self, limit: u32) -> Result<Vec<Deck>, StorageError> {
        let guard = self.decks.lock().map_err(poisoned)?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard.values().take(limit).cloned().collect())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self.questions.lock().map_err(poisoned)?;
        guard
            .entry(question.deck_id())
            .or_default()
            .insert(question.id(), question.clone());
        Ok(())
    }

    async fn list_questions(&self, deck_id: DeckId) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        Ok(guard
            .get(&deck_id)
            .map(|by_id| by_id.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl SessionSnapshotRepository for InMemoryRepository {
    async fn load_snapshot(
        &self,
        key: &str,
    ) -> Result<Option<PersistedSessionState>, StorageError> {
        let raw = {
            let guard = self.kv.lock().map_err(poisoned)?;
            guard.get(key).cloned()
        };
        raw.as_deref()
            .map(PersistedSessionState::from_json)
            .transpose()
    }

    async fn save_snapshot(
        &self,
        key: &str,
        state: &PersistedSessionState,
    ) -> Result<(), StorageError> {
        let raw = state.to_json()?;
        let mut guard = self.kv.lock().map_err(poisoned)?;
        guard.insert(key.to_owned(), raw);
        Ok(())
    }

    async fn clear_snapshot(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.kv.lock().map_err(poisoned)?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub decks: Arc<dyn DeckRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub snapshots: Arc<dyn SessionSnapshotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let decks: Arc<dyn DeckRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let snapshots: Arc<dyn SessionSnapshotRepository> = Arc::new(repo);
        Self {
            decks,
            questions,
            snapshots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SESSION_STORE_KEY;
    use convo_core::model::{DeckCategory, Session};
    use convo_core::time::fixed_now;

    fn build_deck(id: u64) -> Deck {
        Deck::new(
            DeckId::new(id),
            format!("Deck {id}"),
            None,
            DeckCategory::Friendship,
            None,
        )
        .unwrap()
    }

    fn build_question(id: u64, deck_id: DeckId) -> Question {
        Question::text_only(QuestionId::new(id), deck_id, format!("Question {id}")).unwrap()
    }

    #[tokio::test]
    async fn lists_questions_in_id_order() {
        let repo = InMemoryRepository::new();
        let deck = build_deck(1);
        repo.upsert_deck(&deck).await.unwrap();
        for id in [3, 1, 2] {
            repo.upsert_question(&build_question(id, deck.id()))
                .await
                .unwrap();
        }
        repo.upsert_question(&build_question(9, DeckId::new(2)))
            .await
            .unwrap();

        let ids: Vec<u64> = repo
            .list_questions(deck.id())
            .await
            .unwrap()
            .iter()
            .map(|q| q.id().value())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(repo.list_questions(DeckId::new(5)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_deck_is_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_deck(DeckId::new(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn snapshot_save_load_clear() {
        let repo = InMemoryRepository::new();
        let deck = build_deck(1);
        let session =
            Session::new(deck.id(), vec![build_question(1, deck.id())], fixed_now()).unwrap();
        let state = PersistedSessionState::new(Some(session), Some(deck));

        assert!(repo.load_snapshot(SESSION_STORE_KEY).await.unwrap().is_none());
        repo.save_snapshot(SESSION_STORE_KEY, &state).await.unwrap();
        assert_eq!(
            repo.load_snapshot(SESSION_STORE_KEY).await.unwrap(),
            Some(state)
        );
        repo.clear_snapshot(SESSION_STORE_KEY).await.unwrap();
        assert!(repo.load_snapshot(SESSION_STORE_KEY).await.unwrap().is_none());
    }
}
