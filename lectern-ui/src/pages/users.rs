//! Users Page
//!
//! Directory of accounts: search and filters, role changes, suspension,
//! and creating directory rows. Org admins only ever see their own
//! tenant; the org filter is applied server-side from the profile scope.

use leptos::*;
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::model::{AccountStatus, Role, User, UserDraft};
use lectern::service::UserQuery;

use crate::api::use_backend;
use crate::components::{
    account_tone, role_tone, EmptyState, Guarded, ListSkeleton, Modal, StatusBadge,
};
use crate::state::{format_timestamp, use_console_state};

#[component]
pub fn Users() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Users>
            <UserList />
        </Guarded>
    }
}

#[component]
fn UserList() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (users, set_users) = create_signal(Vec::<User>::new());
    let (loaded, set_loaded) = create_signal(false);
    let (version, set_version) = create_signal(0u32);

    let (search, set_search) = create_signal(String::new());
    let (role_filter, set_role_filter) = create_signal(String::new());
    let (status_filter, set_status_filter) = create_signal(String::new());
    let (show_create, set_show_create) = create_signal(false);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let search = search.get();
        let role = Role::parse(&role_filter.get());
        let status = match status_filter.get().as_str() {
            "active" => Some(AccountStatus::Active),
            "suspended" => Some(AccountStatus::Suspended),
            _ => None,
        };
        let org = state.org_scope();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            let mut query = UserQuery::new();
            if !search.trim().is_empty() {
                query = query.search(search.trim());
            }
            if let Some(role) = role {
                query = query.role(role);
            }
            if let Some(status) = status {
                query = query.status(status);
            }
            if let Some(org) = org {
                query = query.org(org);
            }
            match backend.users().list(&query).await {
                Ok(list) => set_users.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
            set_loaded.set(true);
        });
    });

    let toggle_backend = backend.clone();
    let toggle = move |user: User| {
        let backend = toggle_backend.clone();
        spawn_local(async move {
            match backend.users().toggle_status(&user).await {
                Ok(updated) => {
                    state.show_success(&format!(
                        "{} is now {}",
                        updated.full_name,
                        updated.status.label().to_lowercase()
                    ));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    let reassign_backend = backend.clone();
    let reassign = move |id: Uuid, raw: String| {
        let Some(role) = Role::parse(&raw) else { return };
        let backend = reassign_backend.clone();
        spawn_local(async move {
            match backend.users().set_role(id, role).await {
                Ok(updated) => {
                    state.show_success(&format!(
                        "{} is now a {}",
                        updated.full_name,
                        updated.role.label().to_lowercase()
                    ));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => {
                    state.show_error(&err.to_string());
                    set_version.update(|n| *n += 1);
                }
            }
        });
    };

    view! {
        <div class="p-8">
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold text-white">"Users"</h1>
                <button class="btn-primary" on:click=move |_| set_show_create.set(true)>
                    "Add user"
                </button>
            </div>

            <div class="flex gap-3 mb-4">
                <input
                    type="text"
                    class="input-field flex-1"
                    placeholder="Search by name or email"
                    on:change=move |ev| set_search.set(event_target_value(&ev))
                />
                <select
                    class="input-field"
                    on:change=move |ev| set_role_filter.set(event_target_value(&ev))
                >
                    <option value="">"All roles"</option>
                    <option value="super_admin">"Super admin"</option>
                    <option value="org_admin">"Org admin"</option>
                    <option value="teacher">"Teacher"</option>
                    <option value="student">"Student"</option>
                </select>
                <select
                    class="input-field"
                    on:change=move |ev| set_status_filter.set(event_target_value(&ev))
                >
                    <option value="">"All statuses"</option>
                    <option value="active">"Active"</option>
                    <option value="suspended">"Suspended"</option>
                </select>
            </div>

            {move || {
                if !loaded.get() {
                    return view! { <ListSkeleton count=5 /> }.into_view();
                }
                let list = users.get();
                if list.is_empty() {
                    return view! { <EmptyState message="No users match" /> }.into_view();
                }
                let toggle = toggle.clone();
                let reassign = reassign.clone();
                view! {
                    <table class="w-full text-left">
                        <thead>
                            <tr class="text-xs uppercase text-gray-500 border-b border-gray-700">
                                <th class="py-2">"Name"</th>
                                <th>"Email"</th>
                                <th>"Role"</th>
                                <th>"Status"</th>
                                <th>"Last login"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {list.into_iter().map(|user| {
                                let toggle = toggle.clone();
                                let reassign = reassign.clone();
                                let row = user.clone();
                                let user_id = user.id;
                                let toggle_label = if user.status == AccountStatus::Active {
                                    "Suspend"
                                } else {
                                    "Activate"
                                };
                                view! {
                                    <tr class="border-b border-gray-800 text-sm text-gray-300">
                                        <td class="py-3 text-white">{user.full_name.clone()}</td>
                                        <td>{user.email.clone()}</td>
                                        <td>
                                            <div class="flex items-center gap-2">
                                                <StatusBadge
                                                    label=user.role.label()
                                                    tone=role_tone(user.role)
                                                />
                                                <select
                                                    class="input-field text-xs py-0.5"
                                                    prop:value=user.role.as_str()
                                                    on:change=move |ev| reassign(user_id, event_target_value(&ev))
                                                >
                                                    <option value="super_admin">"Super admin"</option>
                                                    <option value="org_admin">"Org admin"</option>
                                                    <option value="teacher">"Teacher"</option>
                                                    <option value="student">"Student"</option>
                                                </select>
                                            </div>
                                        </td>
                                        <td>
                                            <StatusBadge
                                                label=user.status.label()
                                                tone=account_tone(user.status)
                                            />
                                        </td>
                                        <td>{format_timestamp(user.last_login_at)}</td>
                                        <td class="text-right">
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

            {move || show_create.get().then(|| view! {
                <CreateUserModal
                    on_close=Callback::new(move |changed: bool| {
                        set_show_create.set(false);
                        if changed {
                            set_version.update(|n| *n += 1);
                        }
                    })
                />
            })}
        </div>
    }
}

#[component]
fn CreateUserModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (full_name, set_full_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (role, set_role) = create_signal("student".to_string());
    let (org_input, set_org_input) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let scoped = state.org_scope();

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let org_id = match scoped {
            Some(org) => Some(org),
            None => {
                let raw = org_input.get_untracked();
                let raw = raw.trim();
                if raw.is_empty() {
                    None
                } else {
                    match Uuid::parse_str(raw) {
                        Ok(id) => Some(id),
                        Err(_) => {
                            state.show_error("Organization id must be a UUID");
                            return;
                        }
                    }
                }
            }
        };
        let Some(role) = Role::parse(&role.get_untracked()) else {
            return;
        };
        let mut draft = UserDraft::new(full_name.get_untracked(), email.get_untracked(), role);
        draft.org_id = org_id;
        let backend = backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.users().create(draft).await {
                Ok(created) => {
                    state.show_success(&format!("{} added", created.full_name));
                    on_close.call(true);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <Modal title="Add user" on_close=Callback::new(move |_| on_close.call(false))>
            <form class="space-y-4" on:submit=submit>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Full name"</label>
                    <input
                        type="text"
                        class="input-field w-full"
                        required
                        prop:value=full_name
                        on:input=move |ev| set_full_name.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Email"</label>
                    <input
                        type="email"
                        class="input-field w-full"
                        required
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Role"</label>
                    <select
                        class="input-field w-full"
                        on:change=move |ev| set_role.set(event_target_value(&ev))
                    >
                        <option value="student">"Student"</option>
                        <option value="teacher">"Teacher"</option>
                        <option value="org_admin">"Org admin"</option>
                        {(scoped.is_none()).then(|| view! {
                            <option value="super_admin">"Super admin"</option>
                        })}
                    </select>
                </div>
                {scoped.is_none().then(|| view! {
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">
                            "Organization id (blank for platform staff)"
                        </label>
                        <input
                            type="text"
                            class="input-field w-full font-mono text-xs"
                            prop:value=org_input
                            on:input=move |ev| set_org_input.set(event_target_value(&ev))
                        />
                    </div>
                })}
                <button type="submit" class="btn-primary w-full" disabled=busy>
                    {move || if busy.get() { "Adding…" } else { "Add user" }}
                </button>
            </form>
        </Modal>
    }
}
