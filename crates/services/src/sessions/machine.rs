use convo_core::Clock;
use convo_core::model::{Deck, DeckId, InteractionKind, Question, Session};
use storage::snapshot::PersistedSessionState;
use tracing::{debug, info, warn};

use super::progress::SessionProgress;

//
// ─── TRANSITION ────────────────────────────────────────────────────────────────
//

/// What a state-machine operation did.
///
/// Operations never fail; an operation that would break an invariant is
/// reported as `Ignored` and leaves the machine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started { deck_id: DeckId, replaced: Option<DeckId> },
    AlreadyActive,
    Moved { from: usize, to: usize },
    Recorded(InteractionKind),
    Ended,
    Ignored,
}

impl Transition {
    /// Whether the persisted snapshot is now stale.
    #[must_use]
    pub fn changed_state(&self) -> bool {
        !matches!(self, Transition::AlreadyActive | Transition::Ignored)
    }
}

//
// ─── MACHINE ───────────────────────────────────────────────────────────────────
//

/// Question-session state machine: `NoSession` → `Active` → `NoSession`.
///
/// Holds the active session and the deck it was started from. Every mutator
/// returns a [`Transition`]; none of them can fail.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    clock: Clock,
    session: Option<Session>,
    deck: Option<Deck>,
}

impl SessionMachine {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            session: None,
            deck: None,
        }
    }

    /// Start a session over `questions`.
    ///
    /// A session for the same deck is left as is. A session for another deck
    /// is ended first. An empty list, or one containing questions from another
    /// deck, is ignored.
    pub fn start_session(&mut self, deck: Deck, questions: Vec<Question>) -> Transition {
        if self.session.as_ref().is_some_and(|s| s.deck_id() == deck.id()) {
            debug!(deck_id = %deck.id(), "session already active");
            return Transition::AlreadyActive;
        }

        let session = match Session::new(deck.id(), questions, self.clock.now()) {
            Ok(session) => session,
            Err(err) => {
                warn!(deck_id = %deck.id(), error = %err, "refusing to start session");
                return Transition::Ignored;
            }
        };

        let replaced = self.session.as_ref().map(Session::deck_id);
        if let Some(previous) = replaced {
            info!(deck_id = %previous, "ending session for previous deck");
        }

        let deck_id = deck.id();
        info!(
            deck_id = %deck_id,
            session_id = %session.id(),
            questions = session.len(),
            "session started"
        );
        self.session = Some(session);
        self.deck = Some(deck);
        Transition::Started { deck_id, replaced }
    }

    pub fn next_question(&mut self) -> Transition {
        let Some(index) = self.current_index() else {
            return Transition::Ignored;
        };
        self.go_to_question(index + 1)
    }

    pub fn previous_question(&mut self) -> Transition {
        match self.current_index() {
            Some(index) if index > 0 => self.go_to_question(index - 1),
            _ => Transition::Ignored,
        }
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn go_to_question(&mut self, index: usize) -> Transition {
        let Some(session) = self.session.as_mut() else {
            return Transition::Ignored;
        };
        let from = session.current_index();
        if !session.move_to(index) {
            return Transition::Ignored;
        }
        debug!(from, to = index, "moved to question");
        Transition::Moved { from, to: index }
    }

    /// Count one interaction. The index is not moved.
    pub fn record_interaction(&mut self, kind: InteractionKind) -> Transition {
        let Some(session) = self.session.as_mut() else {
            return Transition::Ignored;
        };
        if !session.record(kind) {
            debug!(?kind, "every question already resolved");
            return Transition::Ignored;
        }
        debug!(
            ?kind,
            completed = session.completed(),
            skipped = session.skipped(),
            "interaction recorded"
        );
        Transition::Recorded(kind)
    }

    pub fn end_session(&mut self) -> Transition {
        let Some(session) = self.session.take() else {
            return Transition::Ignored;
        };
        self.deck = None;
        info!(
            session_id = %session.id(),
            completed = session.completed(),
            skipped = session.skipped(),
            "session ended"
        );
        Transition::Ended
    }

    /// Replace the machine state with a persisted snapshot.
    ///
    /// A snapshot whose session breaks an invariant, or whose deck does not
    /// match the session, is discarded and the machine starts with no
    /// session. Returns whether a session was restored.
    pub fn restore(&mut self, state: PersistedSessionState) -> bool {
        self.session = None;
        self.deck = None;

        let Some(session) = state.current_session else {
            return false;
        };
        if let Err(err) = session.validate() {
            warn!(error = %err, "discarding persisted session");
            return false;
        }
        let deck = match state.current_deck {
            Some(deck) if deck.id() == session.deck_id() => deck,
            Some(deck) => {
                warn!(
                    session_deck = %session.deck_id(),
                    stored_deck = %deck.id(),
                    "discarding persisted session with mismatched deck"
                );
                return false;
            }
            None => {
                warn!("discarding persisted session without its deck");
                return false;
            }
        };

        info!(
            session_id = %session.id(),
            index = session.current_index(),
            "session restored"
        );
        self.session = Some(session);
        self.deck = Some(deck);
        true
    }

    /// The persisted shape of the current state.
    #[must_use]
    pub fn snapshot(&self) -> PersistedSessionState {
        PersistedSessionState::new(self.session.clone(), self.deck.clone())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn current_deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref().and_then(Session::current_question)
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(Session::current_index)
    }

    /// 1-based position of the current question, `0` without a session.
    #[must_use]
    pub fn get_current_question_number(&self) -> usize {
        self.current_index().map_or(0, |index| index + 1)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.session.as_ref().map_or(0, Session::len)
    }

    #[must_use]
    pub fn has_more_questions(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.current_index() + 1 < s.len())
    }

    #[must_use]
    pub fn get_progress(&self) -> SessionProgress {
        match &self.session {
            Some(session) => SessionProgress::new(session.resolved(), session.len()),
            None => SessionProgress::none(),
        }
    }
}

// ─── TESTS ─────────────────────────────────────────────────────────────────────
