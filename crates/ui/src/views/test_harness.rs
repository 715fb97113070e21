use std::sync::Arc;

use convo_core::model::{DeckId, Entitlement};
use convo_core::time::fixed_clock;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{DeckService, SessionStoreService};
use storage::fixtures::seed_catalog;
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{DeckListView, SessionView};

#[derive(Clone)]
struct TestApp {
    deck_id: DeckId,
    deck_service: Arc<DeckService>,
    session_store: Arc<SessionStoreService>,
}

impl UiApp for TestApp {
    fn current_deck_id(&self) -> DeckId {
        self.deck_id
    }

    fn entitlement(&self) -> Entitlement {
        Entitlement::Free
    }

    fn deck_service(&self) -> Arc<DeckService> {
        Arc::clone(&self.deck_service)
    }

    fn session_store(&self) -> Arc<SessionStoreService> {
        Arc::clone(&self.session_store)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Session,
    Decks,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Session => rsx! { SessionView {} },
        ViewKind::Decks => rsx! { DeckListView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub deck_service: Arc<DeckService>,
    pub session_store: Arc<SessionStoreService>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Start a free-tier session on `deck_id` behind the view's back.
    pub async fn start_session(&self, deck_id: DeckId) {
        let (deck, questions) = self
            .deck_service
            .questions_for_session(deck_id, Entitlement::Free)
            .await
            .expect("questions");
        self.session_store
            .start_session(deck, questions)
            .await
            .expect("start session");
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let storage = Storage::in_memory();
    seed_catalog(&storage).await.expect("seed catalog");

    let deck_service = Arc::new(DeckService::new(
        Arc::clone(&storage.decks),
        Arc::clone(&storage.questions),
    ));
    let session_store = Arc::new(SessionStoreService::new(
        fixed_clock(),
        Arc::clone(&storage.snapshots),
    ));

    let app = Arc::new(TestApp {
        deck_id: DeckId::new(1),
        deck_service: Arc::clone(&deck_service),
        session_store: Arc::clone(&session_store),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        storage,
        deck_service,
        session_store,
    }
}
