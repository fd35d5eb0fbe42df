//! Feature Flags Page
//!
//! Platform-wide switches. Setting a key that does not exist yet
//! creates it, so the new-flag form is just the same write.

use leptos::*;

use lectern::auth::Surface;
use lectern::model::FeatureFlag;

use crate::api::use_backend;
use crate::components::{EmptyState, Guarded};
use crate::state::{format_timestamp, use_console_state};

#[component]
pub fn Flags() -> impl IntoView {
    view! {
        <Guarded surface=Surface::FeatureFlags>
            <FlagList />
        </Guarded>
    }
}

#[component]
fn FlagList() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (flags, set_flags) = create_signal(Vec::<FeatureFlag>::new());
    let (version, set_version) = create_signal(0u32);
    let (new_key, set_new_key) = create_signal(String::new());

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            match backend.flags().list().await {
                Ok(list) => set_flags.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    let set_flag_backend = backend.clone();
    let set_flag = move |key: String, enabled: bool| {
        let backend = set_flag_backend.clone();
        spawn_local(async move {
            match backend.flags().set(&key, enabled).await {
                Ok(flag) => {
                    let verb = if flag.enabled { "on" } else { "off" };
                    state.show_success(&format!("{} is {}", flag.key, verb));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    let create = {
        let set_flag = set_flag.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let key = new_key.get_untracked().trim().to_string();
            if key.is_empty() {
                state.show_error("Flag key is required");
                return;
            }
            set_new_key.set(String::new());
            set_flag(key, false);
        }
    };

    view! {
        <div class="p-8">
            <h1 class="text-2xl font-bold text-white mb-6">"Feature flags"</h1>

            <div class="bg-gray-800 rounded-lg p-6 max-w-2xl">
                {move || {
                    let list = flags.get();
                    if list.is_empty() {
                        return view! {
                            <EmptyState message="No flags yet." />
                        }.into_view();
                    }
                    let set_flag = set_flag.clone();
                    list.into_iter().map(|flag| {
                        let set_flag = set_flag.clone();
                        let key = flag.key.clone();
                        let enabled = flag.enabled;
                        view! {
                            <div class="flex items-center justify-between py-3 border-b border-gray-700 last:border-0">
                                <div class="min-w-0">
                                    <p class="text-sm font-mono text-white">{flag.key.clone()}</p>
                                    {flag.description.clone().map(|text| view! {
                                        <p class="text-xs text-gray-500">{text}</p>
                                    })}
                                    <p class="text-xs text-gray-600">
                                        "Changed " {format_timestamp(flag.updated_at)}
                                    </p>
                                </div>
                                <button
                                    class=if enabled {
                                        "px-3 py-1 rounded-full text-xs bg-green-900 text-green-300"
                                    } else {
                                        "px-3 py-1 rounded-full text-xs bg-gray-700 text-gray-400"
                                    }
                                    on:click=move |_| set_flag(key.clone(), !enabled)
                                >
                                    {if enabled { "On" } else { "Off" }}
                                </button>
                            </div>
                        }
                    }).collect_view().into_view()
                }}

                <form class="flex gap-2 mt-4" on:submit=create>
                    <input
                        type="text"
                        class="input-field flex-1 font-mono text-sm"
                        placeholder="new_flag_key"
                        prop:value=new_key
                        on:input=move |ev| set_new_key.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn-primary">"Add flag"</button>
                </form>
                <p class="text-xs text-gray-500 mt-2">"New flags start off."</p>
            </div>
        </div>
    }
}
