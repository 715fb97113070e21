use std::sync::Arc;

use convo_core::model::{Deck, DeckId, Entitlement, Question};
use storage::repository::{DeckRepository, QuestionRepository};
use tracing::debug;

use crate::error::DeckServiceError;

/// Questions a free user sees per deck.
pub const DEFAULT_FREE_QUESTION_LIMIT: usize = 5;

/// A deck with its question count and how many of them are unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckOverview {
    pub deck: Deck,
    pub total: usize,
    pub visible: usize,
}

impl DeckOverview {
    #[must_use]
    pub fn locked(&self) -> usize {
        self.total.saturating_sub(self.visible)
    }
}

/// Supplies decks and the finalized question list a session starts from.
#[derive(Clone)]
pub struct DeckService {
    decks: Arc<dyn DeckRepository>,
    questions: Arc<dyn QuestionRepository>,
    free_question_limit: usize,
}

impl DeckService {
    #[must_use]
    pub fn new(decks: Arc<dyn DeckRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            decks,
            questions,
            free_question_limit: DEFAULT_FREE_QUESTION_LIMIT,
        }
    }

    #[must_use]
    pub fn with_free_limit(mut self, limit: usize) -> Self {
        self.free_question_limit = limit;
        self
    }

    #[must_use]
    pub fn free_question_limit(&self) -> usize {
        self.free_question_limit
    }

    /// List decks ordered by ID, up to the given limit.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub async fn list_decks(&self, limit: u32) -> Result<Vec<Deck>, DeckServiceError> {
        let decks = self.decks.list_decks(limit).await?;
        Ok(decks)
    }

    /// Fetch a deck by ID.
    ///
    /// Returns `Ok(None)` when the deck does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub async fn get_deck(&self, deck_id: DeckId) -> Result<Option<Deck>, DeckServiceError> {
        let deck = self.decks.get_deck(deck_id).await?;
        Ok(deck)
    }

    /// List decks with their question counts as seen under `entitlement`.
    ///
    /// The total prefers the count the catalog declares over the number of
    /// stored questions.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub async fn list_overviews(
        &self,
        limit: u32,
        entitlement: Entitlement,
    ) -> Result<Vec<DeckOverview>, DeckServiceError> {
        let decks = self.decks.list_decks(limit).await?;
        let mut overviews = Vec::with_capacity(decks.len());
        for deck in decks {
            let stored = self.questions.list_questions(deck.id()).await?.len();
            let total = deck.question_count(stored);
            let visible = entitlement.visible_count(stored, self.free_question_limit);
            overviews.push(DeckOverview {
                deck,
                total,
                visible,
            });
        }
        Ok(overviews)
    }

    /// Load a deck and the questions `entitlement` unlocks, in supply order.
    ///
    /// Free users get the first `free_question_limit` questions.
    ///
    /// # Errors
    ///
    /// Returns `DeckServiceError::NotFound` for an unknown deck.
    /// Returns `DeckServiceError::Empty` if no question survives the gate.
    /// Returns `DeckServiceError::Storage` if repository access fails.
    pub async fn questions_for_session(
        &self,
        deck_id: DeckId,
        entitlement: Entitlement,
    ) -> Result<(Deck, Vec<Question>), DeckServiceError> {
        let deck = self
            .decks
            .get_deck(deck_id)
            .await?
            .ok_or(DeckServiceError::NotFound)?;

        let mut questions = self.questions.list_questions(deck_id).await?;
        let total = questions.len();
        questions.truncate(entitlement.visible_count(total, self.free_question_limit));
        if questions.is_empty() {
            return Err(DeckServiceError::Empty);
        }

        debug!(
            deck_id = %deck_id,
            ?entitlement,
            total,
            visible = questions.len(),
            "questions supplied for session"
        );
        Ok((deck, questions))
    }
}
