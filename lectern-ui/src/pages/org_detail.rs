//! Organization Detail Page
//!
//! Settings form for one tenant: name, plan, seat cap, custom domain,
//! feature toggles and the lifecycle toggle. The slug is immutable
//! after creation and shown read-only. Blank clearable fields send an
//! explicit null so a stale value cannot survive the save.

use std::collections::BTreeMap;

use leptos::*;
use leptos_router::{use_params_map, A};
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::model::{Organization, OrgSettingsPatch, OrgStatus, PlanType, ORG_FEATURE_KEYS};

use crate::api::use_backend;
use crate::components::{org_tone, Guarded, Loading, StatusBadge};
use crate::state::{format_timestamp, use_console_state};

#[component]
pub fn OrgDetail() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Organizations>
            <OrgSettings />
        </Guarded>
    }
}

#[component]
fn OrgSettings() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();
    let params = use_params_map();

    let org_id = move || {
        params.with(|p| p.get("id").and_then(|raw| Uuid::parse_str(raw).ok()))
    };

    let (org, set_org) = create_signal(None::<Organization>);
    let (missing, set_missing) = create_signal(false);

    let (name, set_name) = create_signal(String::new());
    let (plan, set_plan) = create_signal(String::new());
    let (max_users, set_max_users) = create_signal(String::new());
    let (domain, set_domain) = create_signal(String::new());
    let features = create_rw_signal(BTreeMap::<String, bool>::new());
    let (busy, set_busy) = create_signal(false);

    let prefill = move |loaded: &Organization| {
        set_name.set(loaded.name.clone());
        set_plan.set(loaded.plan_type.as_str().to_string());
        set_max_users.set(
            loaded
                .max_users
                .map(|n| n.to_string())
                .unwrap_or_default(),
        );
        set_domain.set(loaded.custom_domain.clone().unwrap_or_default());
        features.set(
            ORG_FEATURE_KEYS
                .iter()
                .map(|key| (key.to_string(), loaded.feature_enabled(key)))
                .collect(),
        );
    };

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        let Some(id) = org_id() else {
            set_missing.set(true);
            return;
        };
        let backend = fetch_backend.clone();
        spawn_local(async move {
            match backend.orgs().get(id).await {
                Ok(Some(loaded)) => {
                    prefill(&loaded);
                    set_org.set(Some(loaded));
                }
                Ok(None) => set_missing.set(true),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    let save_backend = backend.clone();
    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = org_id() else { return };
        if busy.get_untracked() {
            return;
        }
        let cap_input = max_users.get_untracked();
        let cap = match cap_input.trim() {
            "" => None,
            raw => match raw.parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    state.show_error("Seat cap must be a whole number");
                    return;
                }
            },
        };
        let domain_input = domain.get_untracked();
        let domain_input = domain_input.trim();
        let patch = OrgSettingsPatch {
            name: Some(name.get_untracked().trim().to_string()),
            plan_type: Some(PlanType::parse(&plan.get_untracked()).unwrap_or(PlanType::Free)),
            // Blank fields clear: the patch carries an explicit null
            max_users: Some(cap),
            custom_domain: Some((!domain_input.is_empty()).then(|| domain_input.to_string())),
            features: Some(features.get_untracked()),
        };
        let backend = save_backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.orgs().update_settings(id, patch).await {
                Ok(updated) => {
                    state.show_success("Settings saved");
                    prefill(&updated);
                    set_org.set(Some(updated));
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            set_busy.set(false);
        });
    };

    let toggle_backend = backend.clone();
    let toggle = move |_| {
        let Some(current) = org.get_untracked() else { return };
        let backend = toggle_backend.clone();
        spawn_local(async move {
            match backend.orgs().toggle_status(&current).await {
                Ok(updated) => {
                    state.show_success(&format!(
                        "Organization is now {}",
                        updated.status.label().to_lowercase()
                    ));
                    set_org.set(Some(updated));
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <div class="p-8 max-w-2xl">
            <A href="/admin/orgs" class="text-sm text-indigo-400 hover:text-indigo-300">
                "← Organizations"
            </A>

            {move || {
                if missing.get() {
                    return view! {
                        <p class="text-gray-400 mt-6">"No such organization."</p>
                    }.into_view();
                }
                match org.get() {
                    None => view! { <Loading /> }.into_view(),
                    Some(current) => {
                        let toggle_label = if current.status == OrgStatus::Active {
                            "Suspend organization"
                        } else {
                            "Activate organization"
                        };
                        view! {
                            <div class="mt-4 space-y-6">
                                <div class="flex items-center justify-between">
                                    <div>
                                        <h1 class="text-2xl font-bold text-white">{current.name.clone()}</h1>
                                        <p class="text-sm text-gray-500 font-mono">{current.slug.clone()}</p>
                                    </div>
                                    <StatusBadge
                                        label=current.status.label()
                                        tone=org_tone(current.status)
                                    />
                                </div>

                                <form class="bg-gray-800 rounded-lg p-6 space-y-4" on:submit=save.clone()>
                                    <div>
                                        <label class="block text-sm text-gray-400 mb-1">"Name"</label>
                                        <input
                                            type="text"
                                            class="input-field w-full"
                                            required
                                            prop:value=name
                                            on:input=move |ev| set_name.set(event_target_value(&ev))
                                        />
                                    </div>
                                    <div>
                                        <label class="block text-sm text-gray-400 mb-1">"Plan"</label>
                                        <select
                                            class="input-field w-full"
                                            prop:value=plan
                                            on:change=move |ev| set_plan.set(event_target_value(&ev))
                                        >
                                            <option value="free">"Free"</option>
                                            <option value="standard">"Standard"</option>
                                            <option value="premium">"Premium"</option>
                                        </select>
                                    </div>
                                    <div>
                                        <label class="block text-sm text-gray-400 mb-1">
                                            "Seat cap (blank clears it back to the plan default)"
                                        </label>
                                        <input
                                            type="number"
                                            min="1"
                                            class="input-field w-full"
                                            prop:value=max_users
                                            on:input=move |ev| set_max_users.set(event_target_value(&ev))
                                        />
                                    </div>
                                    <div>
                                        <label class="block text-sm text-gray-400 mb-1">
                                            "Custom domain (blank removes it)"
                                        </label>
                                        <input
                                            type="text"
                                            class="input-field w-full font-mono text-sm"
                                            placeholder="school.example.edu"
                                            prop:value=domain
                                            on:input=move |ev| set_domain.set(event_target_value(&ev))
                                        />
                                    </div>
                                    <div>
                                        <label class="block text-sm text-gray-400 mb-2">"Features"</label>
                                        <div class="space-y-2">
                                            {ORG_FEATURE_KEYS.iter().map(|key| {
                                                let key = *key;
                                                view! {
                                                    <label class="flex items-center gap-2 text-sm text-gray-300">
                                                        <input
                                                            type="checkbox"
                                                            prop:checked=move || {
                                                                features.with(|map| {
                                                                    map.get(key).copied().unwrap_or(false)
                                                                })
                                                            }
                                                            on:change=move |ev| {
                                                                let on = event_target_checked(&ev);
                                                                features.update(|map| {
                                                                    map.insert(key.to_string(), on);
                                                                });
                                                            }
                                                        />
                                                        <span class="font-mono text-xs">{key}</span>
                                                    </label>
                                                }
                                            }).collect_view()}
                                        </div>
                                    </div>
                                    <button type="submit" class="btn-primary" disabled=busy>
                                        {move || if busy.get() { "Saving…" } else { "Save settings" }}
                                    </button>
                                </form>

                                <div class="bg-gray-800 rounded-lg p-6 flex items-center justify-between">
                                    <div>
                                        <p class="text-sm text-white">{toggle_label}</p>
                                        <p class="text-xs text-gray-500">
                                            "Created " {format_timestamp(current.created_at)}
                                        </p>
                                    </div>
                                    <button class="btn-secondary" on:click=toggle.clone()>
                                        {toggle_label}
                                    </button>
                                </div>
                            </div>
                        }.into_view()
                    }
                }
            }}
        </div>
    }
}
