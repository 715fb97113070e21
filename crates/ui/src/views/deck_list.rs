use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tracing::debug;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{DeckCardVm, map_deck_cards, open_session};

const DECK_LIST_LIMIT: u32 = 64;

#[component]
pub fn DeckListView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let entitlement = ctx.entitlement();
    let preferred = ctx.current_deck_id();
    let deck_service = ctx.deck_service();
    let deck_service_for_resource = deck_service.clone();
    let session_store = ctx.session_store();

    let mut open_error = use_signal(|| None::<ViewError>);

    let mut resource = use_resource(move || {
        let deck_service = deck_service_for_resource.clone();
        async move {
            let overviews = deck_service
                .list_overviews(DECK_LIST_LIMIT, entitlement)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(map_deck_cards(&overviews, preferred))
        }
    });
    let state = view_state_from_resource(&resource);

    let open_deck = use_callback(move |deck: DeckCardVm| {
        let deck_service = deck_service.clone();
        let session_store = session_store.clone();
        spawn(async move {
            match open_session(&deck_service, &session_store, deck.id, entitlement).await {
                Ok(opened) => {
                    debug!(deck_id = %deck.id, ?opened, "deck opened");
                    open_error.set(None);
                    navigator.push(Route::Session {});
                }
                Err(err) => open_error.set(Some(err)),
            }
        });
    });

    rsx! {
        div { class: "page",
            h2 { "Decks" }
            if let Some(err) = open_error() {
                p { class: "banner banner--error", "{err.message()}" }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(decks) if decks.is_empty() => rsx! {
                    p { class: "empty", "No decks yet." }
                },
                ViewState::Ready(decks) => rsx! {
                    ul { class: "deck-list",
                        for deck in decks {
                            li {
                                key: "{deck.id}",
                                class: "deck-tile",
                                style: "--deck-theme: {deck.theme_color}",
                                button {
                                    class: "deck-tile__open",
                                    onclick: {
                                        let deck = deck.clone();
                                        move |_| open_deck.call(deck.clone())
                                    },
                                    h3 { "{deck.name}" }
                                    if let Some(description) = deck.description.as_ref() {
                                        p { class: "deck-tile__description", "{description}" }
                                    }
                                    div { class: "deck-tile__meta",
                                        span { class: "deck-tile__category", "{deck.category}" }
                                        span { class: "deck-tile__count", "{deck.count_label}" }
                                        if let Some(locked) = deck.locked_label.as_ref() {
                                            span { class: "deck-tile__locked", "{locked}" }
                                        }
                                        if deck.suggested {
                                            span { class: "deck-tile__suggested", "Suggested" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn",
                        onclick: move |_| resource.restart(),
                        "Retry"
                    }
                },
            }
        }
    }
}
