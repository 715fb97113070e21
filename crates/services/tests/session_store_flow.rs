use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use convo_core::model::{DeckId, Entitlement, InteractionKind};
use convo_core::time::fixed_clock;
use services::{AppServices, DeckService, SessionStoreError, SessionStoreService, Transition};
use storage::fixtures::seed_catalog;
use storage::repository::{
    InMemoryRepository, SessionSnapshotRepository, Storage, StorageError,
};
use storage::snapshot::{PersistedSessionState, SESSION_STORE_KEY};

async fn seeded_storage() -> (InMemoryRepository, Storage) {
    let repo = InMemoryRepository::new();
    let storage = Storage {
        decks: Arc::new(repo.clone()),
        questions: Arc::new(repo.clone()),
        snapshots: Arc::new(repo.clone()),
    };
    seed_catalog(&storage).await.unwrap();
    (repo, storage)
}

fn deck_service(storage: &Storage) -> DeckService {
    DeckService::new(Arc::clone(&storage.decks), Arc::clone(&storage.questions))
}

#[tokio::test]
async fn full_session_walk_persists_each_step() {
    let (repo, storage) = seeded_storage().await;
    let (deck, questions) = deck_service(&storage)
        .with_free_limit(3)
        .questions_for_session(DeckId::new(1), Entitlement::Free)
        .await
        .unwrap();
    let store = SessionStoreService::new(fixed_clock(), Arc::new(repo.clone()));

    store.start_session(deck, questions).await.unwrap();
    assert_eq!(store.read(|m| m.get_current_question_number()).unwrap(), 1);

    let (moved, recorded) = store.commit(InteractionKind::Completed).await.unwrap();
    assert_eq!(moved, Transition::Moved { from: 0, to: 1 });
    assert_eq!(recorded, Transition::Recorded(InteractionKind::Completed));

    store.commit(InteractionKind::Skipped).await.unwrap();
    let session = store.current_session().unwrap().unwrap();
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.completed(), 1);
    assert_eq!(session.skipped(), 1);
    assert!(!store.read(|m| m.has_more_questions()).unwrap());

    let persisted = repo
        .load_snapshot(SESSION_STORE_KEY)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.current_session.as_ref(), Some(&session));
    assert_eq!(persisted.current_deck.unwrap().id(), DeckId::new(1));
}

#[tokio::test]
async fn session_survives_restart() {
    let (repo, storage) = seeded_storage().await;
    let (deck, questions) = deck_service(&storage)
        .questions_for_session(DeckId::new(2), Entitlement::Premium)
        .await
        .unwrap();

    {
        let store = SessionStoreService::new(fixed_clock(), Arc::new(repo.clone()));
        store.start_session(deck, questions).await.unwrap();
        store.go_to_question(3).await.unwrap();
        store
            .record_interaction(InteractionKind::Completed)
            .await
            .unwrap();
    }

    let reopened = SessionStoreService::load(fixed_clock(), Arc::new(repo))
        .await
        .unwrap();
    let session = reopened.current_session().unwrap().unwrap();
    assert_eq!(session.deck_id(), DeckId::new(2));
    assert_eq!(session.current_index(), 3);
    assert_eq!(session.completed(), 1);
}

#[tokio::test]
async fn ending_clears_the_stored_snapshot() {
    let (repo, storage) = seeded_storage().await;
    let (deck, questions) = deck_service(&storage)
        .questions_for_session(DeckId::new(3), Entitlement::Free)
        .await
        .unwrap();
    let store = SessionStoreService::new(fixed_clock(), Arc::new(repo.clone()));
    store.start_session(deck, questions).await.unwrap();

    assert_eq!(store.end_session().await.unwrap(), Transition::Ended);
    assert!(repo.load_snapshot(SESSION_STORE_KEY).await.unwrap().is_none());
    assert_eq!(store.end_session().await.unwrap(), Transition::Ignored);
}

#[tokio::test]
async fn deck_switch_resets_counters() {
    let (repo, storage) = seeded_storage().await;
    let decks = deck_service(&storage);
    let store = SessionStoreService::new(fixed_clock(), Arc::new(repo));

    let (deck_a, questions_a) = decks
        .questions_for_session(DeckId::new(1), Entitlement::Premium)
        .await
        .unwrap();
    store.start_session(deck_a, questions_a).await.unwrap();
    store.commit(InteractionKind::Completed).await.unwrap();
    store.commit(InteractionKind::Skipped).await.unwrap();

    let (deck_b, questions_b) = decks
        .questions_for_session(DeckId::new(2), Entitlement::Premium)
        .await
        .unwrap();
    let transition = store.start_session(deck_b, questions_b).await.unwrap();

    assert_eq!(
        transition,
        Transition::Started {
            deck_id: DeckId::new(2),
            replaced: Some(DeckId::new(1)),
        }
    );
    let progress = store.progress().unwrap();
    assert_eq!(progress.completed, 0);
    assert_eq!(store.read(|m| m.current_index()).unwrap(), Some(0));
}

#[tokio::test]
async fn corrupt_snapshot_is_discarded_on_load() {
    let repo = InMemoryRepository::new();
    let (_, storage) = seeded_storage().await;
    let (deck, questions) = deck_service(&storage)
        .questions_for_session(DeckId::new(1), Entitlement::Free)
        .await
        .unwrap();

    let store = SessionStoreService::new(fixed_clock(), Arc::new(repo.clone()));
    store.start_session(deck, questions).await.unwrap();
    let mut state = repo.load_snapshot(SESSION_STORE_KEY).await.unwrap().unwrap();
    state.current_deck = None;
    repo.save_snapshot(SESSION_STORE_KEY, &state).await.unwrap();

    let reopened = SessionStoreService::load(fixed_clock(), Arc::new(repo.clone()))
        .await
        .unwrap();
    assert!(!reopened.read(|m| m.is_active()).unwrap());
    assert!(repo.load_snapshot(SESSION_STORE_KEY).await.unwrap().is_none());
}

struct BrokenSnapshots;

#[async_trait]
impl SessionSnapshotRepository for BrokenSnapshots {
    async fn load_snapshot(
        &self,
        _key: &str,
    ) -> Result<Option<PersistedSessionState>, StorageError> {
        Ok(None)
    }

    async fn save_snapshot(
        &self,
        _key: &str,
        _state: &PersistedSessionState,
    ) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }

    async fn clear_snapshot(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }
}

/// Holds back the save of the first committed step so a later writer can
/// overtake it if the store lets it.
#[derive(Clone)]
struct SlowSnapshots {
    inner: InMemoryRepository,
}

#[async_trait]
impl SessionSnapshotRepository for SlowSnapshots {
    async fn load_snapshot(
        &self,
        key: &str,
    ) -> Result<Option<PersistedSessionState>, StorageError> {
        self.inner.load_snapshot(key).await
    }

    async fn save_snapshot(
        &self,
        key: &str,
        state: &PersistedSessionState,
    ) -> Result<(), StorageError> {
        let first_step = state
            .current_session
            .as_ref()
            .is_some_and(|s| s.current_index() == 1);
        if first_step {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.inner.save_snapshot(key, state).await
    }

    async fn clear_snapshot(&self, key: &str) -> Result<(), StorageError> {
        self.inner.clear_snapshot(key).await
    }
}

#[tokio::test]
async fn overlapping_commits_persist_the_latest_step() {
    let (_, storage) = seeded_storage().await;
    let (deck, questions) = deck_service(&storage)
        .questions_for_session(DeckId::new(1), Entitlement::Free)
        .await
        .unwrap();
    let repo = InMemoryRepository::new();
    let store = SessionStoreService::new(
        fixed_clock(),
        Arc::new(SlowSnapshots { inner: repo.clone() }),
    );
    store.start_session(deck, questions).await.unwrap();

    let (first, second) = tokio::join!(
        store.commit(InteractionKind::Completed),
        store.commit(InteractionKind::Skipped),
    );
    first.unwrap();
    second.unwrap();

    let live = store.current_session().unwrap().unwrap();
    assert_eq!(live.current_index(), 2);
    assert_eq!((live.completed(), live.skipped()), (1, 1));

    let stored = repo.load_snapshot(SESSION_STORE_KEY).await.unwrap().unwrap();
    assert_eq!(stored.current_session, Some(live));
}

#[tokio::test]
async fn end_after_slow_commit_leaves_nothing_stored() {
    let (_, storage) = seeded_storage().await;
    let (deck, questions) = deck_service(&storage)
        .questions_for_session(DeckId::new(1), Entitlement::Free)
        .await
        .unwrap();
    let repo = InMemoryRepository::new();
    let store = SessionStoreService::new(
        fixed_clock(),
        Arc::new(SlowSnapshots { inner: repo.clone() }),
    );
    store.start_session(deck, questions).await.unwrap();

    let (committed, ended) = tokio::join!(
        store.commit(InteractionKind::Completed),
        store.end_session(),
    );
    committed.unwrap();
    assert_eq!(ended.unwrap(), Transition::Ended);

    assert!(store.current_session().unwrap().is_none());
    assert!(repo.load_snapshot(SESSION_STORE_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_persist_keeps_in_memory_state() {
    let (_, storage) = seeded_storage().await;
    let (deck, questions) = deck_service(&storage)
        .questions_for_session(DeckId::new(1), Entitlement::Free)
        .await
        .unwrap();
    let store = SessionStoreService::new(fixed_clock(), Arc::new(BrokenSnapshots));

    let err = store.start_session(deck, questions).await.unwrap_err();
    assert!(matches!(err, SessionStoreError::Storage(_)));
    assert!(store.read(|m| m.is_active()).unwrap());

    let err = store.commit(InteractionKind::Completed).await.unwrap_err();
    assert!(matches!(err, SessionStoreError::Storage(_)));
    assert_eq!(store.read(|m| m.current_index()).unwrap(), Some(1));
}

#[tokio::test]
async fn bootstrap_seeds_and_opens_deck() {
    let services = AppServices::from_storage(
        Storage::in_memory(),
        fixed_clock(),
        DeckId::new(2),
        Entitlement::Free,
    )
    .await
    .unwrap();
    assert_eq!(services.deck_id(), DeckId::new(2));

    let transition = services.open_deck(services.deck_id()).await.unwrap();
    assert!(matches!(transition, Transition::Started { .. }));
    assert_eq!(
        services.open_deck(services.deck_id()).await.unwrap(),
        Transition::AlreadyActive
    );

    let store = services.session_store();
    assert_eq!(store.read(|m| m.total_questions()).unwrap(), 5);
}

#[tokio::test]
async fn bootstrap_falls_back_to_first_deck() {
    let services = AppServices::from_storage(
        Storage::in_memory(),
        fixed_clock(),
        DeckId::new(42),
        Entitlement::Premium,
    )
    .await
    .unwrap();
    assert_eq!(services.deck_id(), DeckId::new(1));
}
