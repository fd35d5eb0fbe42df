//! Notifications Page
//!
//! Compose an announcement and review what went out. Org admins always
//! target their own organization; platform staff pick the audience.

use leptos::*;
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::model::{Audience, Notification, Role};

use crate::api::use_backend;
use crate::components::{EmptyState, Guarded};
use crate::state::{format_timestamp, use_console_state};

#[component]
pub fn Notifications() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Notifications>
            <AnnouncerDesk />
        </Guarded>
    }
}

#[component]
fn AnnouncerDesk() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (sent, set_sent) = create_signal(Vec::<Notification>::new());
    let (version, set_version) = create_signal(0u32);

    let (title, set_title) = create_signal(String::new());
    let (body, set_body) = create_signal(String::new());
    let (target, set_target) = create_signal("all".to_string());
    let (target_org, set_target_org) = create_signal(String::new());
    let (target_role, set_target_role) = create_signal("student".to_string());
    let (busy, set_busy) = create_signal(false);

    let scoped = state.org_scope();

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            match backend.announcer().sent().await {
                Ok(list) => set_sent.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    let send_backend = backend.clone();
    let send = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let audience = if let Some(org_id) = scoped {
            Audience::Org(org_id)
        } else {
            match target.get_untracked().as_str() {
                "org" => {
                    let raw = target_org.get_untracked();
                    match Uuid::parse_str(raw.trim()) {
                        Ok(org_id) => Audience::Org(org_id),
                        Err(_) => {
                            state.show_error("Organization ID must be a UUID");
                            return;
                        }
                    }
                }
                "role" => {
                    let raw = target_role.get_untracked();
                    match Role::parse(&raw) {
                        Some(role) => Audience::RoleIs(role),
                        None => {
                            state.show_error("Pick a role to target");
                            return;
                        }
                    }
                }
                _ => Audience::All,
            }
        };
        let backend = send_backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            let result = backend
                .announcer()
                .send(
                    title.get_untracked().trim(),
                    body.get_untracked().trim(),
                    audience,
                )
                .await;
            set_busy.set(false);
            match result {
                Ok(notification) => {
                    state.show_success(&format!(
                        "Sent to {}",
                        notification.audience.describe().to_lowercase()
                    ));
                    set_title.set(String::new());
                    set_body.set(String::new());
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <div class="p-8">
            <h1 class="text-2xl font-bold text-white mb-6">"Notifications"</h1>

            <div class="grid gap-8 lg:grid-cols-2">
                <section class="bg-gray-800 rounded-lg p-6">
                    <h2 class="text-lg font-semibold text-white mb-4">"Compose"</h2>
                    <form class="space-y-4" on:submit=send>
                        <div>
                            <label class="block text-sm text-gray-400 mb-1">"Title"</label>
                            <input
                                type="text"
                                class="input-field w-full"
                                required
                                prop:value=title
                                on:input=move |ev| set_title.set(event_target_value(&ev))
                            />
                        </div>
                        <div>
                            <label class="block text-sm text-gray-400 mb-1">"Body"</label>
                            <textarea
                                class="input-field w-full h-28"
                                required
                                prop:value=body
                                on:input=move |ev| set_body.set(event_target_value(&ev))
                            />
                        </div>

                        {if scoped.is_some() {
                            view! {
                                <p class="text-sm text-gray-400">
                                    "Goes to everyone in your organization."
                                </p>
                            }.into_view()
                        } else {
                            view! {
                                <div class="space-y-3">
                                    <div>
                                        <label class="block text-sm text-gray-400 mb-1">"Audience"</label>
                                        <select
                                            class="input-field w-full"
                                            on:change=move |ev| set_target.set(event_target_value(&ev))
                                        >
                                            <option value="all" selected>"Everyone"</option>
                                            <option value="org">"One organization"</option>
                                            <option value="role">"One role"</option>
                                        </select>
                                    </div>
                                    {move || (target.get() == "org").then(|| view! {
                                        <input
                                            type="text"
                                            class="input-field w-full font-mono text-sm"
                                            placeholder="Organization ID"
                                            prop:value=target_org
                                            on:input=move |ev| set_target_org.set(event_target_value(&ev))
                                        />
                                    })}
                                    {move || (target.get() == "role").then(|| view! {
                                        <select
                                            class="input-field w-full"
                                            on:change=move |ev| set_target_role.set(event_target_value(&ev))
                                        >
                                            <option value="student" selected>"Students"</option>
                                            <option value="teacher">"Teachers"</option>
                                            <option value="org_admin">"Organization admins"</option>
                                        </select>
                                    })}
                                </div>
                            }.into_view()
                        }}

                        <button type="submit" class="btn-primary w-full" disabled=busy>
                            {move || if busy.get() { "Sending..." } else { "Send" }}
                        </button>
                    </form>
                </section>

                <section class="bg-gray-800 rounded-lg p-6">
                    <h2 class="text-lg font-semibold text-white mb-4">"Sent"</h2>
                    {move || {
                        let list = sent.get();
                        if list.is_empty() {
                            return view! {
                                <EmptyState message="Nothing sent yet." />
                            }.into_view();
                        }
                        list.into_iter().map(|notification| view! {
                            <div class="bg-gray-900 rounded p-4 mb-3">
                                <div class="flex items-center justify-between mb-1">
                                    <p class="text-sm text-white">{notification.title.clone()}</p>
                                    <span class="text-xs text-gray-500">
                                        {format_timestamp(notification.sent_at.or(notification.created_at))}
                                    </span>
                                </div>
                                <p class="text-sm text-gray-400 mb-2">{notification.body.clone()}</p>
                                <span class="text-xs text-indigo-400">
                                    {notification.audience.describe()}
                                </span>
                            </div>
                        }).collect_view().into_view()
                    }}
                </section>
            </div>
        </div>
    }
}
