//! Organizations Page
//!
//! Tenant directory for platform staff: search, filter, suspend or
//! activate, and onboard new organizations. Onboarding shows the first
//! admin's one-time password exactly once; there is no way to read it
//! again after the dialog closes.

use leptos::*;
use leptos_router::A;

use lectern::auth::Surface;
use lectern::model::{Organization, OrgStatus, PlanType};
use lectern::service::OrgQuery;

use crate::api::use_backend;
use crate::components::{org_tone, EmptyState, Guarded, ListSkeleton, Modal, StatusBadge};
use crate::state::{format_timestamp, use_console_state};

fn status_from_str(value: &str) -> Option<OrgStatus> {
    match value {
        "active" => Some(OrgStatus::Active),
        "suspended" => Some(OrgStatus::Suspended),
        "inactive" => Some(OrgStatus::Inactive),
        _ => None,
    }
}

#[component]
pub fn Organizations() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Organizations>
            <OrgList />
        </Guarded>
    }
}

#[component]
fn OrgList() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (orgs, set_orgs) = create_signal(Vec::<Organization>::new());
    let (loaded, set_loaded) = create_signal(false);
    let (version, set_version) = create_signal(0u32);

    let (search, set_search) = create_signal(String::new());
    let (status_filter, set_status_filter) = create_signal(String::new());

    let (show_onboard, set_show_onboard) = create_signal(false);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let search = search.get();
        let status = status_from_str(&status_filter.get());
        let backend = fetch_backend.clone();
        spawn_local(async move {
            let mut query = OrgQuery::new();
            if !search.trim().is_empty() {
                query = query.search(search.trim());
            }
            if let Some(status) = status {
                query = query.status(status);
            }
            match backend.orgs().list(&query).await {
                Ok(list) => set_orgs.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
            set_loaded.set(true);
        });
    });

    let toggle_backend = backend.clone();
    let toggle = move |org: Organization| {
        let backend = toggle_backend.clone();
        spawn_local(async move {
            match backend.orgs().toggle_status(&org).await {
                Ok(updated) => {
                    state.show_success(&format!(
                        "{} is now {}",
                        updated.name,
                        updated.status.label().to_lowercase()
                    ));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <div class="p-8">
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold text-white">"Organizations"</h1>
                <button class="btn-primary" on:click=move |_| set_show_onboard.set(true)>
                    "Onboard organization"
                </button>
            </div>

            <div class="flex gap-3 mb-4">
                <input
                    type="text"
                    class="input-field flex-1"
                    placeholder="Search by name or slug"
                    on:change=move |ev| set_search.set(event_target_value(&ev))
                />
                <select
                    class="input-field"
                    on:change=move |ev| set_status_filter.set(event_target_value(&ev))
                >
                    <option value="">"All statuses"</option>
                    <option value="active">"Active"</option>
                    <option value="suspended">"Suspended"</option>
                    <option value="inactive">"Inactive"</option>
                </select>
            </div>

            {move || {
                if !loaded.get() {
                    return view! { <ListSkeleton count=4 /> }.into_view();
                }
                let list = orgs.get();
                if list.is_empty() {
                    return view! { <EmptyState message="No organizations match" /> }.into_view();
                }
                let toggle = toggle.clone();
                view! {
                    <table class="w-full text-left">
                        <thead>
                            <tr class="text-xs uppercase text-gray-500 border-b border-gray-700">
                                <th class="py-2">"Name"</th>
                                <th>"Slug"</th>
                                <th>"Plan"</th>
                                <th>"Status"</th>
                                <th>"Created"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {list.into_iter().map(|org| {
                                let toggle = toggle.clone();
                                let row = org.clone();
                                let toggle_label = if org.status == OrgStatus::Active {
                                    "Suspend"
                                } else {
                                    "Activate"
                                };
                                view! {
                                    <tr class="border-b border-gray-800 text-sm text-gray-300">
                                        <td class="py-3 text-white">{org.name.clone()}</td>
                                        <td class="font-mono text-xs">{org.slug.clone()}</td>
                                        <td>{org.plan_type.label()}</td>
                                        <td>
                                            <StatusBadge label=org.status.label() tone=org_tone(org.status) />
                                        </td>
                                        <td>{format_timestamp(org.created_at)}</td>
                                        <td class="text-right space-x-3 whitespace-nowrap">
                                            <A
                                                href=format!("/admin/orgs/{}", org.id)
                                                class="text-indigo-400 hover:text-indigo-300"
                                            >
                                                "Manage"
                                            </A>
                                            <button
                                                class="text-gray-400 hover:text-white"
                                                on:click=move |_| toggle(row.clone())
                                            >
                                                {toggle_label}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }).collect_view()}
                        </tbody>
                    </table>
                }.into_view()
            }}

            {move || show_onboard.get().then(|| view! {
                <OnboardModal
                    on_close=Callback::new(move |changed: bool| {
                        set_show_onboard.set(false);
                        if changed {
                            set_version.update(|n| *n += 1);
                        }
                    })
                />
            })}
        </div>
    }
}

/// Onboarding dialog. Two phases: the form, then the one-time
/// credentials for the provisioned admin.
#[component]
fn OnboardModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (name, set_name) = create_signal(String::new());
    let (plan, set_plan) = create_signal("free".to_string());
    let (admin_email, set_admin_email) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);
    let (credentials, set_credentials) = create_signal(None::<(String, String)>);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let org_name = name.get_untracked();
        if org_name.trim().is_empty() {
            state.show_error("Organization name is required");
            return;
        }
        let backend = backend.clone();
        let plan = PlanType::parse(&plan.get_untracked()).unwrap_or(PlanType::Free);
        let email = admin_email.get_untracked();
        set_busy.set(true);
        spawn_local(async move {
            match backend.onboarding().onboard(&org_name, plan, &email).await {
                Ok(onboarded) => {
                    state.show_success(&format!("{} onboarded", onboarded.org.name));
                    set_credentials.set(Some((
                        onboarded.credentials.email,
                        onboarded.credentials.one_time_password,
                    )));
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <Modal
            title="Onboard organization"
            on_close=Callback::new(move |_| on_close.call(credentials.get_untracked().is_some()))
        >
            {move || match credentials.get() {
                Some((email, password)) => view! {
                    <div class="space-y-4">
                        <div class="bg-amber-900/50 border border-amber-700 text-amber-200 text-sm rounded px-4 py-3">
                            "Save these credentials now. The password is shown once and
                            cannot be recovered."
                        </div>
                        <div class="bg-gray-900 rounded p-4 font-mono text-sm space-y-2">
                            <p><span class="text-gray-500">"email     "</span>{email}</p>
                            <p><span class="text-gray-500">"password  "</span>{password}</p>
                        </div>
                        <button
                            class="btn-primary w-full"
                            on:click=move |_| on_close.call(true)
                        >
                            "Done"
                        </button>
                    </div>
                }.into_view(),
                None => view! {
                    <form class="space-y-4" on:submit=submit>
                        <div>
                            <label class="block text-sm text-gray-400 mb-1">"Organization name"</label>
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
                                on:change=move |ev| set_plan.set(event_target_value(&ev))
                            >
                                <option value="free">"Free"</option>
                                <option value="standard">"Standard"</option>
                                <option value="premium">"Premium"</option>
                            </select>
                        </div>
                        <div>
                            <label class="block text-sm text-gray-400 mb-1">"First admin email"</label>
                            <input
                                type="email"
                                class="input-field w-full"
                                required
                                prop:value=admin_email
                                on:input=move |ev| set_admin_email.set(event_target_value(&ev))
                            />
                        </div>
                        <button type="submit" class="btn-primary w-full" disabled=busy>
                            {move || if busy.get() { "Provisioning…" } else { "Create and provision admin" }}
                        </button>
                    </form>
                }.into_view(),
            }}
        </Modal>
    }
}
