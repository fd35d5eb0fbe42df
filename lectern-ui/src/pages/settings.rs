//! Settings Page

use leptos::*;

use lectern::auth::Surface;

use crate::components::{ConnectionSettings, Guarded};
use crate::state::use_console_state;

#[component]
pub fn Settings() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Dashboard>
            <SettingsPanel />
        </Guarded>
    }
}

#[component]
fn SettingsPanel() -> impl IntoView {
    let state = use_console_state();

    view! {
        <div class="p-8 max-w-2xl">
            <h1 class="text-2xl font-bold text-white mb-6">"Settings"</h1>

            <section class="bg-gray-800 rounded-lg p-6 mb-8">
                <h2 class="text-lg font-semibold text-white mb-1">"Backend connection"</h2>
                <p class="text-sm text-gray-500 mb-4">
                    "Saved in this browser and read again on the next load."
                </p>
                <ConnectionSettings />
            </section>

            <section class="bg-gray-800 rounded-lg p-6">
                <h2 class="text-lg font-semibold text-white mb-4">"Signed in as"</h2>
                {move || state.profile.get().map(|user| view! {
                    <div class="text-sm text-gray-300">
                        <p class="text-white">{user.full_name.clone()}</p>
                        <p class="text-gray-500">{user.email.clone()}</p>
                        <p class="text-gray-500 mt-1">{user.role.label()}</p>
                    </div>
                })}
            </section>
        </div>
    }
}
