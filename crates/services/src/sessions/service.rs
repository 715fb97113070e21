use std::sync::{Arc, Mutex, MutexGuard};

use convo_core::Clock;
use convo_core::model::{Deck, InteractionKind, Question, Session};
use storage::repository::SessionSnapshotRepository;
use storage::snapshot::SESSION_STORE_KEY;
use tokio::sync::Mutex as WriteGate;
use tracing::{debug, warn};

use super::machine::{SessionMachine, Transition};
use super::progress::SessionProgress;
use crate::error::SessionStoreError;

/// Session state machine backed by the persisted key-value snapshot.
///
/// Every operation mutates the in-memory machine first and then writes the
/// snapshot. A failed write is returned to the caller but the in-memory state
/// is kept, so navigation keeps working while storage is unavailable.
///
/// Writers are serialized from mutation through the snapshot write, so the
/// stored snapshot is always the one of the last mutation to finish.
pub struct SessionStoreService {
    machine: Mutex<SessionMachine>,
    writes: WriteGate<()>,
    snapshots: Arc<dyn SessionSnapshotRepository>,
    key: String,
}

impl SessionStoreService {
    /// Create a store with no active session.
    #[must_use]
    pub fn new(clock: Clock, snapshots: Arc<dyn SessionSnapshotRepository>) -> Self {
        Self {
            machine: Mutex::new(SessionMachine::new(clock)),
            writes: WriteGate::new(()),
            snapshots,
            key: SESSION_STORE_KEY.to_string(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Create a store and rehydrate it from the persisted snapshot, if any.
    ///
    /// An invalid snapshot is dropped from storage and the store starts empty.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Storage` if the snapshot cannot be read.
    pub async fn load(
        clock: Clock,
        snapshots: Arc<dyn SessionSnapshotRepository>,
    ) -> Result<Self, SessionStoreError> {
        let store = Self::new(clock, snapshots);
        store.restore().await?;
        Ok(store)
    }

    /// Replace the in-memory state with the persisted snapshot.
    ///
    /// Returns whether a session was restored.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Storage` if the snapshot cannot be read or
    /// a rejected snapshot cannot be cleared.
    pub async fn restore(&self) -> Result<bool, SessionStoreError> {
        let _write = self.writes.lock().await;
        let stored = match self.snapshots.load_snapshot(&self.key).await {
            Ok(stored) => stored,
            Err(storage::StorageError::Serialization(reason)) => {
                warn!(%reason, "stored session snapshot is unreadable");
                self.snapshots.clear_snapshot(&self.key).await?;
                None
            }
            Err(err) => return Err(err.into()),
        };
        let Some(state) = stored else {
            return Ok(false);
        };
        let had_session = state.current_session.is_some();
        let restored = self.lock()?.restore(state);
        if had_session && !restored {
            self.snapshots.clear_snapshot(&self.key).await?;
        }
        Ok(restored)
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError` if the new state cannot be persisted.
    pub async fn start_session(
        &self,
        deck: Deck,
        questions: Vec<Question>,
    ) -> Result<Transition, SessionStoreError> {
        self.apply(|m| m.start_session(deck, questions)).await
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError` if the new state cannot be persisted.
    pub async fn next_question(&self) -> Result<Transition, SessionStoreError> {
        self.apply(SessionMachine::next_question).await
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError` if the new state cannot be persisted.
    pub async fn previous_question(&self) -> Result<Transition, SessionStoreError> {
        self.apply(SessionMachine::previous_question).await
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError` if the new state cannot be persisted.
    pub async fn go_to_question(&self, index: usize) -> Result<Transition, SessionStoreError> {
        self.apply(|m| m.go_to_question(index)).await
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError` if the new state cannot be persisted.
    pub async fn record_interaction(
        &self,
        kind: InteractionKind,
    ) -> Result<Transition, SessionStoreError> {
        self.apply(|m| m.record_interaction(kind)).await
    }

    /// Advance past the current question and count it, as one commit.
    ///
    /// Both steps run under a single lock so readers never observe the index
    /// moved without the interaction counted. The snapshot is written once.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the new state cannot be persisted.
    pub async fn commit(
        &self,
        kind: InteractionKind,
    ) -> Result<(Transition, Transition), SessionStoreError> {
        let _write = self.writes.lock().await;
        let (moved, recorded, snapshot) = {
            let mut machine = self.lock()?;
            let moved = machine.next_question();
            let recorded = machine.record_interaction(kind);
            (moved, recorded, machine.snapshot())
        };
        if moved.changed_state() || recorded.changed_state() {
            self.persist(snapshot).await?;
        }
        Ok((moved, recorded))
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError` if the stored snapshot cannot be cleared.
    pub async fn end_session(&self) -> Result<Transition, SessionStoreError> {
        self.apply(SessionMachine::end_session).await
    }

    /// Run a read-only query against the current state.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Poisoned` if a writer panicked.
    pub fn read<R>(&self, f: impl FnOnce(&SessionMachine) -> R) -> Result<R, SessionStoreError> {
        let machine = self.lock()?;
        Ok(f(&machine))
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError::Poisoned` if a writer panicked.
    pub fn progress(&self) -> Result<SessionProgress, SessionStoreError> {
        self.read(SessionMachine::get_progress)
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError::Poisoned` if a writer panicked.
    pub fn current_session(&self) -> Result<Option<Session>, SessionStoreError> {
        self.read(|m| m.current_session().cloned())
    }

    async fn apply(
        &self,
        op: impl FnOnce(&mut SessionMachine) -> Transition,
    ) -> Result<Transition, SessionStoreError> {
        let _write = self.writes.lock().await;
        let (transition, snapshot) = {
            let mut machine = self.lock()?;
            let transition = op(&mut machine);
            (transition, machine.snapshot())
        };
        if transition.changed_state() {
            self.persist(snapshot).await?;
        }
        Ok(transition)
    }

    async fn persist(
        &self,
        snapshot: storage::PersistedSessionState,
    ) -> Result<(), SessionStoreError> {
        let result = if snapshot.is_empty() {
            self.snapshots.clear_snapshot(&self.key).await
        } else {
            self.snapshots.save_snapshot(&self.key, &snapshot).await
        };
        match result {
            Ok(()) => {
                debug!(key = %self.key, cleared = snapshot.is_empty(), "session snapshot written");
                Ok(())
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to persist session snapshot");
                Err(err.into())
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionMachine>, SessionStoreError> {
        self.machine.lock().map_err(|_| SessionStoreError::Poisoned)
    }
}
