use std::sync::Arc;

use convo_core::model::{DeckId, Entitlement};
use storage::fixtures::seed_catalog;
use storage::repository::{DeckRepository, Storage};
use tracing::info;

use crate::Clock;
use crate::deck_service::DeckService;
use crate::error::AppServicesError;
use crate::sessions::{SessionStoreService, Transition};

/// Assembles app-facing services and resolves a usable deck id.
#[derive(Clone)]
pub struct AppServices {
    deck_id: DeckId,
    entitlement: Entitlement,
    deck_service: Arc<DeckService>,
    session_store: Arc<SessionStoreService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization, seeding or
    /// session restore fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        preferred_deck_id: DeckId,
        entitlement: Entitlement,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, preferred_deck_id, entitlement).await
    }

    /// Build services over an existing storage aggregate.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if seeding or session restore fails.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        preferred_deck_id: DeckId,
        entitlement: Entitlement,
    ) -> Result<Self, AppServicesError> {
        let deck_id = ensure_catalog(&storage, preferred_deck_id).await?;
        let deck_service = Arc::new(DeckService::new(
            Arc::clone(&storage.decks),
            Arc::clone(&storage.questions),
        ));
        let session_store =
            Arc::new(SessionStoreService::load(clock, Arc::clone(&storage.snapshots)).await?);

        Ok(Self {
            deck_id,
            entitlement,
            deck_service,
            session_store,
        })
    }

    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    #[must_use]
    pub fn entitlement(&self) -> Entitlement {
        self.entitlement
    }

    #[must_use]
    pub fn deck_service(&self) -> Arc<DeckService> {
        Arc::clone(&self.deck_service)
    }

    #[must_use]
    pub fn session_store(&self) -> Arc<SessionStoreService> {
        Arc::clone(&self.session_store)
    }

    /// Start (or resume) a session on `deck_id` with the configured entitlement.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the deck cannot be supplied or the new
    /// session cannot be persisted.
    pub async fn open_deck(&self, deck_id: DeckId) -> Result<Transition, AppServicesError> {
        let (deck, questions) = self
            .deck_service
            .questions_for_session(deck_id, self.entitlement)
            .await?;
        let transition = self.session_store.start_session(deck, questions).await?;
        Ok(transition)
    }
}

async fn ensure_catalog(
    storage: &Storage,
    preferred_id: DeckId,
) -> Result<DeckId, AppServicesError> {
    let decks: &dyn DeckRepository = storage.decks.as_ref();
    if decks.get_deck(preferred_id).await?.is_some() {
        return Ok(preferred_id);
    }

    let existing = decks.list_decks(128).await?;
    if let Some(first) = existing.first() {
        return Ok(first.id());
    }

    let written = seed_catalog(storage).await?;
    info!(questions = written, "seeded empty catalog");
    if decks.get_deck(preferred_id).await?.is_some() {
        return Ok(preferred_id);
    }
    let seeded = decks.list_decks(1).await?;
    seeded
        .first()
        .map(|deck| deck.id())
        .ok_or_else(|| storage::StorageError::NotFound.into())
}
