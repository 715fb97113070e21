use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{DeckListView, SessionView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", SessionView)] Session {},
        #[route("/decks", DeckListView)] Decks {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            nav { class: "topbar",
                Link { to: Route::Session {}, "Session" }
                Link { to: Route::Decks {}, "Decks" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
