use dioxus::prelude::*;
use dioxus_router::Link;
use tracing::debug;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{CardStackView, ViewError};
use crate::vm::open_session;

#[derive(Clone, Debug, PartialEq)]
struct ActiveSession {
    key: String,
    deck_name: String,
    theme_color: &'static str,
}

/// Resumes the active session. Without one it offers the preferred deck and
/// a link to the deck list.
#[component]
pub fn SessionView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = ctx.session_store();
    let preferred = ctx.current_deck_id();
    let entitlement = ctx.entitlement();

    // Bumped after a quick start so the store is read again.
    let mut revision = use_signal(|| 0_u32);
    let mut start_error = use_signal(|| None::<ViewError>);
    let _ = revision();

    let start_preferred = {
        let decks = ctx.deck_service();
        let store = store.clone();
        use_callback(move |()| {
            let decks = decks.clone();
            let store = store.clone();
            spawn(async move {
                match open_session(&decks, &store, preferred, entitlement).await {
                    Ok(opened) => {
                        debug!(deck_id = %preferred, ?opened, "preferred deck opened");
                        start_error.set(None);
                    }
                    Err(err) => start_error.set(Some(err)),
                }
                revision += 1;
            });
        })
    };

    let active = store.read(|machine| {
        let session = machine.current_session()?;
        let deck = machine.current_deck()?;
        Some(ActiveSession {
            key: session.id().to_string(),
            deck_name: deck.name().to_owned(),
            theme_color: deck.theme_color(),
        })
    });

    rsx! {
        div { class: "page",
            match active {
                Err(_) => rsx! {
                    p { "{ViewError::Unknown.message()}" }
                },
                Ok(None) => rsx! {
                    h2 { "No session yet" }
                    p { "Pick a deck to start talking." }
                    if let Some(err) = start_error() {
                        p { class: "banner banner--error", "{err.message()}" }
                    }
                    button {
                        class: "btn btn--primary",
                        onclick: move |_| start_preferred.call(()),
                        "Start suggested deck"
                    }
                    Link { class: "btn", to: Route::Decks {}, "Browse decks" }
                },
                Ok(Some(active)) => rsx! {
                    div {
                        class: "session",
                        style: "--deck-theme: {active.theme_color}",
                        h2 { "{active.deck_name}" }
                        CardStackView { key: "{active.key}" }
                    }
                },
            }
        }
    }
}
