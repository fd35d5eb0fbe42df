//! Content Page
//!
//! Library of course material: uploads and links with a kind filter.
//! Items are attached to a course or float free at the org level.

use leptos::*;
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::model::{ContentDraft, ContentItem, ContentKind};
use lectern::service::ContentQuery;

use crate::api::use_backend;
use crate::components::{EmptyState, Guarded, ListSkeleton, Modal, StatusBadge, Tone};
use crate::state::{format_timestamp, use_console_state};

fn kind_from_str(value: &str) -> Option<ContentKind> {
    match value {
        "video" => Some(ContentKind::Video),
        "document" => Some(ContentKind::Document),
        "presentation" => Some(ContentKind::Presentation),
        "link" => Some(ContentKind::Link),
        _ => None,
    }
}

#[component]
pub fn Library() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Content>
            <ContentList />
        </Guarded>
    }
}

#[component]
fn ContentList() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (items, set_items) = create_signal(Vec::<ContentItem>::new());
    let (loaded, set_loaded) = create_signal(false);
    let (version, set_version) = create_signal(0u32);

    let (search, set_search) = create_signal(String::new());
    let (kind_filter, set_kind_filter) = create_signal(String::new());
    let (show_add, set_show_add) = create_signal(false);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let search = search.get();
        let kind = kind_from_str(&kind_filter.get());
        let org = state.org_scope();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            let mut query = ContentQuery::new();
            if !search.trim().is_empty() {
                query = query.search(search.trim());
            }
            if let Some(kind) = kind {
                query = query.kind(kind);
            }
            if let Some(org) = org {
                query = query.org(org);
            }
            match backend.content().list(&query).await {
                Ok(list) => set_items.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
            set_loaded.set(true);
        });
    });

    let remove_backend = backend.clone();
    let remove = move |item: ContentItem| {
        let backend = remove_backend.clone();
        spawn_local(async move {
            match backend.content().remove(item.id).await {
                Ok(()) => {
                    state.show_success(&format!("{} removed", item.title));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <div class="p-8">
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold text-white">"Content"</h1>
                <button class="btn-primary" on:click=move |_| set_show_add.set(true)>
                    "Add item"
                </button>
            </div>

            <div class="flex gap-3 mb-4">
                <input
                    type="text"
                    class="input-field flex-1"
                    placeholder="Search by title"
                    on:change=move |ev| set_search.set(event_target_value(&ev))
                />
                <select
                    class="input-field"
                    on:change=move |ev| set_kind_filter.set(event_target_value(&ev))
                >
                    <option value="">"All kinds"</option>
                    <option value="video">"Video"</option>
                    <option value="document">"Document"</option>
                    <option value="presentation">"Presentation"</option>
                    <option value="link">"Link"</option>
                </select>
            </div>

            {move || {
                if !loaded.get() {
                    return view! { <ListSkeleton count=4 /> }.into_view();
                }
                let list = items.get();
                if list.is_empty() {
                    return view! { <EmptyState message="No content yet" /> }.into_view();
                }
                let remove = remove.clone();
                view! {
                    <table class="w-full text-left">
                        <thead>
                            <tr class="text-xs uppercase text-gray-500 border-b border-gray-700">
                                <th class="py-2">"Title"</th>
                                <th>"Kind"</th>
                                <th>"Location"</th>
                                <th>"Added"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {list.into_iter().map(|item| {
                                let remove = remove.clone();
                                let row = item.clone();
                                view! {
                                    <tr class="border-b border-gray-800 text-sm text-gray-300">
                                        <td class="py-3 text-white">{item.title.clone()}</td>
                                        <td>
                                            <StatusBadge label=item.kind.label() tone=Tone::Blue />
                                        </td>
                                        <td>
                                            <a
                                                href=item.url.clone()
                                                target="_blank"
                                                class="text-indigo-400 hover:text-indigo-300 text-xs break-all"
                                            >
                                                {item.url.clone()}
                                            </a>
                                        </td>
                                        <td>{format_timestamp(item.created_at)}</td>
                                        <td class="text-right">
                                            <button
                                                class="text-red-400 hover:text-red-300"
                                                on:click=move |_| remove(row.clone())
                                            >
                                                "Remove"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }).collect_view()}
                        </tbody>
                    </table>
                }.into_view()
            }}

            {move || show_add.get().then(|| view! {
                <AddContentModal
                    on_close=Callback::new(move |changed: bool| {
                        set_show_add.set(false);
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
fn AddContentModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (title, set_title) = create_signal(String::new());
    let (kind, set_kind) = create_signal("video".to_string());
    let (url, set_url) = create_signal(String::new());
    let (course_input, set_course_input) = create_signal(String::new());
    let (org_input, set_org_input) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let scoped = state.org_scope();

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let org_id = match scoped {
            Some(org) => org,
            None => match Uuid::parse_str(org_input.get_untracked().trim()) {
                Ok(id) => id,
                Err(_) => {
                    state.show_error("Organization id must be a UUID");
                    return;
                }
            },
        };
        let course_raw = course_input.get_untracked();
        let course_id = match course_raw.trim() {
            "" => None,
            raw => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    state.show_error("Course id must be a UUID");
                    return;
                }
            },
        };
        let Some(kind) = kind_from_str(&kind.get_untracked()) else {
            return;
        };
        let draft = ContentDraft {
            org_id,
            course_id,
            title: title.get_untracked().trim().to_string(),
            kind,
            url: url.get_untracked().trim().to_string(),
        };
        let backend = backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.content().add(draft).await {
                Ok(created) => {
                    state.show_success(&format!("{} added", created.title));
                    on_close.call(true);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <Modal title="Add content" on_close=Callback::new(move |_| on_close.call(false))>
            <form class="space-y-4" on:submit=submit>
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
                    <label class="block text-sm text-gray-400 mb-1">"Kind"</label>
                    <select
                        class="input-field w-full"
                        on:change=move |ev| set_kind.set(event_target_value(&ev))
                    >
                        <option value="video">"Video"</option>
                        <option value="document">"Document"</option>
                        <option value="presentation">"Presentation"</option>
                        <option value="link">"Link"</option>
                    </select>
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"URL"</label>
                    <input
                        type="url"
                        class="input-field w-full"
                        required
                        prop:value=url
                        on:input=move |ev| set_url.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Course id (optional)"</label>
                    <input
                        type="text"
                        class="input-field w-full font-mono text-xs"
                        prop:value=course_input
                        on:input=move |ev| set_course_input.set(event_target_value(&ev))
                    />
                </div>
                {scoped.is_none().then(|| view! {
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Organization id"</label>
                        <input
                            type="text"
                            class="input-field w-full font-mono text-xs"
                            required
                            prop:value=org_input
                            on:input=move |ev| set_org_input.set(event_target_value(&ev))
                        />
                    </div>
                })}
                <button type="submit" class="btn-primary w-full" disabled=busy>
                    {move || if busy.get() { "Adding…" } else { "Add item" }}
                </button>
            </form>
        </Modal>
    }
}
