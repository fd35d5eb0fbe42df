//! Modal Component
//!
//! Shared dialog shell. Callers own the open/closed signal and pass the
//! form body as children.

use leptos::*;

#[component]
pub fn Modal(
    #[prop(into)]
    title: String,
    on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="fixed inset-0 bg-black/50 flex items-center justify-center z-40 p-4">
            <div class="bg-gray-800 rounded-lg shadow-xl w-full max-w-lg max-h-[90vh] overflow-y-auto">
                <div class="flex items-center justify-between px-6 py-4 border-b border-gray-700">
                    <h2 class="text-lg font-semibold text-white">{title}</h2>
                    <button
                        class="text-gray-400 hover:text-white"
                        on:click=move |_| on_close.call(())
                    >
                        "✕"
                    </button>
                </div>
                <div class="px-6 py-4">
                    {children()}
                </div>
            </div>
        </div>
    }
}
