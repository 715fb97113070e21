use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::SessionProgress;
use tracing::warn;

use crate::context::AppContext;
use crate::routes::Route;
use crate::stack::{CardStackController, apply_commits};
use crate::views::ViewError;
use crate::vm::StackVm;

const FRAME: Duration = Duration::from_millis(16);

type StackSignal = Signal<Option<CardStackController>>;

fn with_stack<R: Default>(
    mut controller: StackSignal,
    f: impl FnOnce(&mut CardStackController) -> R,
) -> R {
    match &mut *controller.write() {
        Some(stack) => f(stack),
        None => R::default(),
    }
}

#[component]
pub fn CardStackView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let store = ctx.session_store();

    let controller: StackSignal = use_signal({
        let ctx = ctx.clone();
        move || {
            match CardStackController::new(ctx.session_store(), ctx.stack_config(), ctx.haptics()) {
                Ok(stack) => Some(stack),
                Err(err) => {
                    warn!(error = %err, "card stack unavailable");
                    None
                }
            }
        }
    });
    let mut origin = use_signal(|| None::<(f64, f64)>);
    let mut save_error = use_signal(|| None::<ViewError>);
    let mut applied = use_signal(|| 0_u64);

    // Frame loop; only writes (and re-renders) while something moves.
    use_future(move || async move {
        loop {
            tokio::time::sleep(FRAME).await;
            let animating = matches!(&*controller.peek(), Some(stack) if stack.is_animating());
            if animating {
                with_stack(controller, |stack| stack.tick(FRAME));
            }
        }
    });

    let store_for_pump = store.clone();
    let pump = use_callback(move |()| {
        let commits = with_stack(controller, CardStackController::drain_commits);
        if commits.is_empty() {
            return;
        }
        let store = store_for_pump.clone();
        spawn(async move {
            match apply_commits(&store, &commits).await {
                Ok(_) => save_error.set(None),
                Err(err) => {
                    warn!(error = %err, "stack commit not saved");
                    save_error.set(Some(ViewError::NotSaved));
                }
            }
            applied += 1;
        });
    });

    let finish_drag = use_callback(move |()| {
        if origin().is_none() {
            return;
        }
        origin.set(None);
        with_stack(controller, |stack| {
            stack.end_drag();
        });
        pump.call(());
    });

    let store_for_end = store.clone();
    let end_session = use_callback(move |()| {
        let store = store_for_end.clone();
        spawn(async move {
            match store.end_session().await {
                Ok(_) => {
                    navigator.push(Route::Decks {});
                }
                Err(err) => {
                    warn!(error = %err, "session end not saved");
                    save_error.set(Some(ViewError::NotSaved));
                }
            }
        });
    });

    let _generation = applied();
    let progress = store.progress().unwrap_or_else(|_| SessionProgress::none());
    let vm = (*controller.read())
        .as_ref()
        .map(|stack| StackVm::from_controller(stack, &progress));

    rsx! {
        div { class: "stack-screen",
            match vm {
                None => rsx! {
                    p { "{ViewError::Unknown.message()}" }
                },
                Some(vm) => rsx! {
                    header { class: "stack-header",
                        span { class: "stack-header__position", "{vm.position_label}" }
                        span { class: "stack-header__resolved", "{vm.resolved_label}" }
                    }
                    if let Some(err) = save_error() {
                        p { class: "banner banner--error", "{err.message()}" }
                    }
                    if vm.finished {
                        div { class: "stack-done",
                            h3 { "All questions answered" }
                            button {
                                class: "btn btn--primary",
                                onclick: move |_| end_session.call(()),
                                "End session"
                            }
                        }
                    } else if vm.cards.is_empty() {
                        p { class: "empty", "No questions in this session." }
                    } else {
                        div {
                            class: "card-stack",
                            onpointerdown: move |evt: PointerEvent| {
                                let point = evt.client_coordinates();
                                if with_stack(controller, |stack| stack.begin_drag(point.x, point.y)) {
                                    origin.set(Some((point.x, point.y)));
                                }
                            },
                            onpointermove: move |evt: PointerEvent| {
                                let Some((x0, y0)) = origin() else {
                                    return;
                                };
                                let point = evt.client_coordinates();
                                with_stack(controller, |stack| stack.drag(point.x - x0, point.y - y0));
                            },
                            onpointerup: move |_| finish_drag.call(()),
                            onpointercancel: move |_| finish_drag.call(()),
                            onpointerleave: move |_| finish_drag.call(()),
                            for card in vm.cards.iter() {
                                div {
                                    key: "{card.key}",
                                    class: "{card.class}",
                                    style: "{card.style}",
                                    p { class: "card__text", "{card.text}" }
                                }
                            }
                            if let Some(hint) = vm.hint {
                                div { class: "card-stack__hint", "{hint}" }
                            }
                        }
                        div { class: "stack-actions",
                            button {
                                class: "btn btn--skip",
                                onclick: move |_| {
                                    if with_stack(controller, CardStackController::skip) {
                                        pump.call(());
                                    }
                                },
                                "Skip"
                            }
                            button {
                                class: "btn btn--complete",
                                onclick: move |_| {
                                    if with_stack(controller, CardStackController::complete) {
                                        pump.call(());
                                    }
                                },
                                "Complete"
                            }
                        }
                    }
                },
            }
        }
    }
}
