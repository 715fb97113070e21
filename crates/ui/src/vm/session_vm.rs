use convo_core::model::{DeckId, Entitlement};
use services::{DeckService, DeckServiceError, SessionStoreService, Transition};
use tracing::warn;

use crate::views::ViewError;

/// How opening a deck affected the active session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOpened {
    Started,
    Resumed,
}

/// Load the questions `entitlement` unlocks for `deck_id` and start a session
/// on them. Re-opening the deck of the active session resumes it.
///
/// # Errors
///
/// Returns `ViewError::EmptyDeck` if the deck has no playable question and
/// `ViewError::Unknown` for any other failure.
pub async fn open_session(
    decks: &DeckService,
    store: &SessionStoreService,
    deck_id: DeckId,
    entitlement: Entitlement,
) -> Result<SessionOpened, ViewError> {
    let (deck, questions) = decks
        .questions_for_session(deck_id, entitlement)
        .await
        .map_err(|err| match err {
            DeckServiceError::Empty => ViewError::EmptyDeck,
            other => {
                warn!(error = %other, %deck_id, "deck could not be loaded");
                ViewError::Unknown
            }
        })?;

    let transition = store.start_session(deck, questions).await.map_err(|err| {
        warn!(error = %err, %deck_id, "session could not be started");
        ViewError::Unknown
    })?;

    match transition {
        Transition::Started { .. } => Ok(SessionOpened::Started),
        Transition::AlreadyActive => Ok(SessionOpened::Resumed),
        _ => Err(ViewError::EmptyDeck),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use convo_core::time::fixed_clock;
    use storage::fixtures::seed_catalog;
    use storage::repository::Storage;

    async fn services() -> (DeckService, SessionStoreService) {
        let storage = Storage::in_memory();
        seed_catalog(&storage).await.expect("seed");
        let decks = DeckService::new(
            Arc::clone(&storage.decks),
            Arc::clone(&storage.questions),
        );
        let store = SessionStoreService::new(fixed_clock(), Arc::clone(&storage.snapshots));
        (decks, store)
    }

    #[tokio::test]
    async fn opening_twice_resumes() {
        let (decks, store) = services().await;
        let first = open_session(&decks, &store, DeckId::new(1), Entitlement::Free).await;
        let second = open_session(&decks, &store, DeckId::new(1), Entitlement::Free).await;

        assert_eq!(first, Ok(SessionOpened::Started));
        assert_eq!(second, Ok(SessionOpened::Resumed));
        assert_eq!(store.progress().unwrap().total, 5);
    }

    #[tokio::test]
    async fn unknown_deck_is_an_error() {
        let (decks, store) = services().await;
        let result = open_session(&decks, &store, DeckId::new(99), Entitlement::Premium).await;
        assert_eq!(result, Err(ViewError::Unknown));
        assert!(store.current_session().unwrap().is_none());
    }
}
