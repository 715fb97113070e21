use thiserror::Error;

use crate::model::{DeckError, QuestionError, SessionError, TagError};

/// Umbrella error for callers that build several domain values at once
/// (fixtures, seeding, persisted-state rehydration).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Tag(#[from] TagError),
}
