//! Connection Settings Component
//!
//! Edits the backend endpoints kept in browser storage. Shown on the login
//! page so a fresh install can be pointed at its stack before anyone can
//! sign in, and again under the admin settings page.

use leptos::*;

use crate::api::{
    get_anon_key, get_api_base, get_provisioner_base, set_anon_key, set_api_base,
    set_provisioner_base,
};
use crate::state::use_console_state;

#[component]
pub fn ConnectionSettings() -> impl IntoView {
    let state = use_console_state();

    let (api_base, set_api_base_input) = create_signal(get_api_base());
    let (anon_key, set_anon_key_input) = create_signal(get_anon_key());
    let (provisioner, set_provisioner_input) = create_signal(get_provisioner_base());

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_api_base(&api_base.get_untracked());
        set_anon_key(&anon_key.get_untracked());
        set_provisioner_base(&provisioner.get_untracked());
        state.show_success("Connection settings saved");
    };

    view! {
        <form class="space-y-4" on:submit=save>
            <div>
                <label class="block text-sm text-gray-400 mb-1">"API base URL"</label>
                <input
                    type="url"
                    class="input-field w-full"
                    prop:value=api_base
                    on:input=move |ev| set_api_base_input.set(event_target_value(&ev))
                />
            </div>
            <div>
                <label class="block text-sm text-gray-400 mb-1">"Anon key"</label>
                <input
                    type="text"
                    class="input-field w-full font-mono text-xs"
                    prop:value=anon_key
                    on:input=move |ev| set_anon_key_input.set(event_target_value(&ev))
                />
            </div>
            <div>
                <label class="block text-sm text-gray-400 mb-1">"Provisioner URL"</label>
                <input
                    type="url"
                    class="input-field w-full"
                    prop:value=provisioner
                    on:input=move |ev| set_provisioner_input.set(event_target_value(&ev))
                />
            </div>
            <button type="submit" class="btn-primary">"Save connection"</button>
        </form>
    }
}
