//! Route Guard Component
//!
//! Wraps every admin surface. Resolves the access gate on mount, stores
//! the allowed profile in [`ConsoleState`] and renders the page, or sends
//! the visitor back to the login screen. Backend failures get a retry
//! button instead of a verdict.

use leptos::*;
use leptos_router::use_navigate;

use lectern::auth::{GateDecision, Surface};
use lectern::model::User;

use crate::api::use_backend;
use crate::state::use_console_state;

use super::loading::Loading;

#[component]
pub fn Guarded(surface: Surface, children: ChildrenFn) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();
    let navigate = use_navigate();

    let (allowed, set_allowed) = create_signal(None::<Result<User, String>>);
    let (attempt, set_attempt) = create_signal(0u32);

    create_effect(move |_| {
        attempt.track();
        let backend = backend.clone();
        let navigate = navigate.clone();
        set_allowed.set(None);
        spawn_local(async move {
            match backend.gate().resolve(surface).await {
                Ok(GateDecision::Allow(user)) => {
                    state.profile.set(Some(user.clone()));
                    set_allowed.set(Some(Ok(user)));
                }
                Ok(GateDecision::Login) => {
                    state.profile.set(None);
                    navigate("/login", Default::default());
                }
                Ok(GateDecision::Unauthorized) => {
                    state.profile.set(None);
                    navigate("/login?reason=unauthorized", Default::default());
                }
                Err(err) => {
                    set_allowed.set(Some(Err(err.to_string())));
                }
            }
        });
    });

    view! {
        {move || match allowed.get() {
            Some(Ok(_)) => children().into_view(),
            Some(Err(msg)) => view! {
                <div class="text-center py-12 space-y-4">
                    <p class="text-red-400">{format!("Could not verify access: {msg}")}</p>
                    <button
                        class="btn-secondary"
                        on:click=move |_| set_attempt.update(|n| *n += 1)
                    >
                        "Retry"
                    </button>
                </div>
            }.into_view(),
            None => view! { <Loading /> }.into_view(),
        }}
    }
}
