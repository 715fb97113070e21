use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DeckId, InteractionKind, Question, SessionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a session needs at least one question")]
    Empty,

    #[error("current index {index} is outside 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("resolved count ({resolved}) exceeds question count ({len})")]
    CountersExceedTotal { resolved: u64, len: usize },

    #[error("question {question} belongs to {found:?}, not {expected:?}")]
    ForeignQuestion {
        question: u64,
        expected: DeckId,
        found: DeckId,
    },
}

/// A live, ordered traversal of a deck's questions.
///
/// The question list is fixed at creation. `current_index` always points at a
/// question and `completed + skipped` never exceeds the question count; every
/// mutator preserves both and reports whether it changed anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    deck_id: DeckId,
    questions: Vec<Question>,
    current_index: usize,
    completed: u32,
    skipped: u32,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Start a fresh session at the first question with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        deck_id: DeckId,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::from_persisted(SessionId::generate(), deck_id, questions, 0, 0, 0, started_at)
    }

    /// Rehydrate a session from persisted storage, re-checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the persisted values describe an impossible session.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: SessionId,
        deck_id: DeckId,
        questions: Vec<Question>,
        current_index: usize,
        completed: u32,
        skipped: u32,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let session = Self {
            id,
            deck_id,
            questions,
            current_index,
            completed,
            skipped,
            started_at,
        };
        session.validate()?;
        Ok(session)
    }

    /// Check the structural invariants. Deserialized values bypass the
    /// constructors, so callers restoring a snapshot must run this.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), SessionError> {
        let len = self.questions.len();
        if len == 0 {
            return Err(SessionError::Empty);
        }
        if self.current_index >= len {
            return Err(SessionError::IndexOutOfRange {
                index: self.current_index,
                len,
            });
        }
        let resolved = self.resolved();
        if resolved > len as u64 {
            return Err(SessionError::CountersExceedTotal { resolved, len });
        }
        if let Some(foreign) = self.questions.iter().find(|q| q.deck_id() != self.deck_id) {
            return Err(SessionError::ForeignQuestion {
                question: foreign.id().value(),
                expected: self.deck_id,
                found: foreign.deck_id(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed session; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn completed(&self) -> u32 {
        self.completed
    }

    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Questions resolved either way.
    #[must_use]
    pub fn resolved(&self) -> u64 {
        u64::from(self.completed) + u64::from(self.skipped)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Move to `index`. Returns `false` (and leaves the session untouched) when
    /// `index` is out of bounds or already current.
    pub fn move_to(&mut self, index: usize) -> bool {
        if index >= self.questions.len() || index == self.current_index {
            return false;
        }
        self.current_index = index;
        true
    }

    /// Count one interaction. Returns `false` when every question is already
    /// accounted for.
    pub fn record(&mut self, kind: InteractionKind) -> bool {
        if self.resolved() >= self.questions.len() as u64 {
            return false;
        }
        match kind {
            InteractionKind::Completed => self.completed = self.completed.saturating_add(1),
            InteractionKind::Skipped => self.skipped = self.skipped.saturating_add(1),
        }
        true
    }
}
