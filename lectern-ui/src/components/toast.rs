//! Toast Component
//!
//! Success and error toasts driven by [`ConsoleState`]. Messages expire on
//! their own; the close button is for the impatient.

use leptos::*;

use crate::state::use_console_state;

#[component]
pub fn Toast() -> impl IntoView {
    let state = use_console_state();

    view! {
        <div class="fixed bottom-4 right-4 z-50 space-y-2">
            {move || state.success.get().map(|msg| view! {
                <div class="bg-green-600 text-white px-4 py-3 rounded-lg shadow-lg flex items-center gap-3">
                    <span>{msg}</span>
                    <button
                        class="text-green-200 hover:text-white"
                        on:click=move |_| state.success.set(None)
                    >
                        "✕"
                    </button>
                </div>
            })}
            {move || state.error.get().map(|msg| view! {
                <div class="bg-red-600 text-white px-4 py-3 rounded-lg shadow-lg flex items-center gap-3">
                    <span>{msg}</span>
                    <button
                        class="text-red-200 hover:text-white"
                        on:click=move |_| state.error.set(None)
                    >
                        "✕"
                    </button>
                </div>
            })}
        </div>
    }
}
