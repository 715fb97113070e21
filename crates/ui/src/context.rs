use std::sync::Arc;

use convo_core::model::{DeckId, Entitlement};
use services::{DeckService, SessionStoreService};

use crate::stack::{Haptics, NoopHaptics, StackConfig};

pub trait UiApp: Send + Sync {
    fn current_deck_id(&self) -> DeckId;
    fn entitlement(&self) -> Entitlement;

    fn deck_service(&self) -> Arc<DeckService>;
    fn session_store(&self) -> Arc<SessionStoreService>;

    fn haptics(&self) -> Arc<dyn Haptics> {
        Arc::new(NoopHaptics)
    }

    fn stack_config(&self) -> StackConfig {
        StackConfig::default()
    }
}

#[derive(Clone)]
pub struct AppContext {
    current_deck_id: DeckId,
    entitlement: Entitlement,
    stack_config: StackConfig,

    deck_service: Arc<DeckService>,
    session_store: Arc<SessionStoreService>,
    haptics: Arc<dyn Haptics>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            current_deck_id: app.current_deck_id(),
            entitlement: app.entitlement(),
            stack_config: app.stack_config(),
            deck_service: app.deck_service(),
            session_store: app.session_store(),
            haptics: app.haptics(),
        }
    }

    #[must_use]
    pub fn current_deck_id(&self) -> DeckId {
        self.current_deck_id
    }

    #[must_use]
    pub fn entitlement(&self) -> Entitlement {
        self.entitlement
    }

    #[must_use]
    pub fn stack_config(&self) -> StackConfig {
        self.stack_config
    }

    #[must_use]
    pub fn deck_service(&self) -> Arc<DeckService> {
        Arc::clone(&self.deck_service)
    }

    #[must_use]
    pub fn session_store(&self) -> Arc<SessionStoreService> {
        Arc::clone(&self.session_store)
    }

    #[must_use]
    pub fn haptics(&self) -> Arc<dyn Haptics> {
        Arc::clone(&self.haptics)
    }
}

/// Build an `AppContext` from a UI-facing app implementation. The desktop
/// binary calls this once at startup and provides the result to the tree.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
