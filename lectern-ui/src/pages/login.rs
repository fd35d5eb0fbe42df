//! Login Page
//!
//! Password sign-in. After the token lands, the access gate resolves the
//! directory row so the visitor is routed to the first surface their role
//! may open; accounts with no place in the console are signed straight
//! back out by the gate.

use leptos::*;
use leptos_router::{use_navigate, use_query_map};

use lectern::auth::{home_surface, GateDecision, Surface};
use lectern::backend::AuthApi;

use crate::api::use_backend;
use crate::components::{surface_path, ConnectionSettings};
use crate::state::use_console_state;

#[component]
pub fn Login() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();
    let navigate = use_navigate();
    let query = use_query_map();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let was_bounced =
        move || query.with(|q| q.get("reason").map(|r| r == "unauthorized").unwrap_or(false));

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let backend = backend.clone();
        let navigate = navigate.clone();
        let email = email.get_untracked();
        let password = password.get_untracked();
        set_busy.set(true);
        spawn_local(async move {
            if let Err(err) = backend.auth().sign_in_with_password(&email, &password).await {
                state.show_error(&err.to_string());
                set_busy.set(false);
                return;
            }
            // Courses is the one surface every console role may open, so
            // resolving it doubles as the role probe after sign-in.
            match backend.gate().resolve(Surface::Courses).await {
                Ok(GateDecision::Allow(user)) => {
                    let home = home_surface(user.role).unwrap_or(Surface::Courses);
                    state.profile.set(Some(user));
                    navigate(surface_path(home), Default::default());
                }
                Ok(_) => {
                    state.show_error("This account cannot open the console");
                }
                Err(err) => {
                    state.show_error(&err.to_string());
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-gray-900 flex items-center justify-center p-4">
            <div class="w-full max-w-md space-y-6">
                <div class="text-center">
                    <h1 class="text-2xl font-bold text-white">"Lectern console"</h1>
                    <p class="text-sm text-gray-400 mt-1">"Sign in with your staff account"</p>
                </div>

                {move || was_bounced().then(|| view! {
                    <div class="bg-amber-900/50 border border-amber-700 text-amber-200 text-sm rounded px-4 py-3">
                        "You were signed out: that account cannot open the page it asked for."
                    </div>
                })}

                <form class="bg-gray-800 rounded-lg p-6 space-y-4" on:submit=submit>
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Email"</label>
                        <input
                            type="email"
                            class="input-field w-full"
                            prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Password"</label>
                        <input
                            type="password"
                            class="input-field w-full"
                            prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </div>
                    <button type="submit" class="btn-primary w-full" disabled=busy>
                        {move || if busy.get() { "Signing in…" } else { "Sign in" }}
                    </button>
                </form>

                <details class="bg-gray-800 rounded-lg p-4 text-sm">
                    <summary class="cursor-pointer text-gray-400">"Backend connection"</summary>
                    <div class="pt-4">
                        <ConnectionSettings />
                    </div>
                </details>
            </div>
        </div>
    }
}
