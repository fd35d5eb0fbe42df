//! Marketing Page
//!
//! Landing-page content: the banner rail and the blog desk.

use futures_util::future::join;
use leptos::*;
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::model::{Banner, BannerDraft, BlogPost};

use crate::api::use_backend;
use crate::components::{Guarded, Modal, StatusBadge, Tone};
use crate::state::{format_timestamp, use_console_state};

#[component]
pub fn Marketing() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Marketing>
            <MarketingDesk />
        </Guarded>
    }
}

#[component]
fn MarketingDesk() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (banners, set_banners) = create_signal(Vec::<Banner>::new());
    let (posts, set_posts) = create_signal(Vec::<BlogPost>::new());
    let (version, set_version) = create_signal(0u32);
    let (show_banner_modal, set_show_banner_modal) = create_signal(false);
    let (show_post_modal, set_show_post_modal) = create_signal(false);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            let rail = backend.banners();
            let desk = backend.blog();
            let (rail_result, desk_result) = join(rail.all(), desk.all()).await;
            match rail_result {
                Ok(list) => set_banners.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
            match desk_result {
                Ok(list) => set_posts.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    let toggle_backend = backend.clone();
    let toggle_banner = move |banner: Banner| {
        let backend = toggle_backend.clone();
        spawn_local(async move {
            match backend.banners().toggle(&banner).await {
                Ok(updated) => {
                    let verb = if updated.active { "shown" } else { "hidden" };
                    state.show_success(&format!("\"{}\" is now {}", updated.title, verb));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    let remove_backend = backend.clone();
    let remove_banner = move |id: Uuid| {
        let backend = remove_backend.clone();
        spawn_local(async move {
            match backend.banners().remove(id).await {
                Ok(()) => {
                    state.show_success("Banner removed");
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    let publish_backend = backend.clone();
    let set_published = move |post: BlogPost| {
        let backend = publish_backend.clone();
        spawn_local(async move {
            match backend.blog().set_published(post.id, !post.published).await {
                Ok(updated) => {
                    let verb = if updated.published { "published" } else { "unpublished" };
                    state.show_success(&format!("\"{}\" {}", updated.title, verb));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <div class="p-8">
            <h1 class="text-2xl font-bold text-white mb-6">"Marketing"</h1>

            <div class="grid gap-8 lg:grid-cols-2">
                <section class="bg-gray-800 rounded-lg p-6">
                    <div class="flex items-center justify-between mb-4">
                        <h2 class="text-lg font-semibold text-white">"Banners"</h2>
                        <button class="btn-primary" on:click=move |_| set_show_banner_modal.set(true)>
                            "New banner"
                        </button>
                    </div>
                    {move || {
                        let list = banners.get();
                        if list.is_empty() {
                            return view! {
                                <p class="text-sm text-gray-500">"No banners yet."</p>
                            }.into_view();
                        }
                        let toggle_banner = toggle_banner.clone();
                        let remove_banner = remove_banner.clone();
                        list.into_iter().map(|banner| {
                            let toggle_banner = toggle_banner.clone();
                            let remove_banner = remove_banner.clone();
                            let banner_id = banner.id;
                            let toggled = banner.clone();
                            let toggle_label = if banner.active { "Hide" } else { "Show" };
                            view! {
                                <div class="bg-gray-900 rounded p-4 mb-3 flex items-start justify-between gap-3">
                                    <div class="min-w-0">
                                        <div class="flex items-center gap-2 mb-1">
                                            <p class="text-sm text-white truncate">{banner.title.clone()}</p>
                                            <StatusBadge
                                                label=if banner.active { "Active" } else { "Hidden" }
                                                tone=if banner.active { Tone::Green } else { Tone::Gray }
                                            />
                                        </div>
                                        <p class="text-xs text-gray-500 font-mono truncate">{banner.image_url.clone()}</p>
                                        {banner.sort_order.map(|order| view! {
                                            <p class="text-xs text-gray-500">"Position " {order}</p>
                                        })}
                                    </div>
                                    <div class="flex gap-2 shrink-0">
                                        <button
                                            class="text-xs text-indigo-400 hover:text-indigo-300"
                                            on:click=move |_| toggle_banner(toggled.clone())
                                        >
                                            {toggle_label}
                                        </button>
                                        <button
                                            class="text-xs text-red-400 hover:text-red-300"
                                            on:click=move |_| remove_banner(banner_id)
                                        >
                                            "Remove"
                                        </button>
                                    </div>
                                </div>
                            }
                        }).collect_view().into_view()
                    }}
                </section>

                <section class="bg-gray-800 rounded-lg p-6">
                    <div class="flex items-center justify-between mb-4">
                        <h2 class="text-lg font-semibold text-white">"Blog"</h2>
                        <button class="btn-primary" on:click=move |_| set_show_post_modal.set(true)>
                            "New draft"
                        </button>
                    </div>
                    {move || {
                        let list = posts.get();
                        if list.is_empty() {
                            return view! {
                                <p class="text-sm text-gray-500">"No posts yet."</p>
                            }.into_view();
                        }
                        let set_published = set_published.clone();
                        list.into_iter().map(|post| {
                            let set_published = set_published.clone();
                            let target = post.clone();
                            let publish_label = if post.published { "Unpublish" } else { "Publish" };
                            view! {
                                <div class="bg-gray-900 rounded p-4 mb-3 flex items-start justify-between gap-3">
                                    <div class="min-w-0">
                                        <div class="flex items-center gap-2 mb-1">
                                            <p class="text-sm text-white truncate">{post.title.clone()}</p>
                                            <StatusBadge
                                                label=if post.published { "Published" } else { "Draft" }
                                                tone=if post.published { Tone::Green } else { Tone::Gray }
                                            />
                                        </div>
                                        <p class="text-xs text-gray-500 font-mono">{post.slug.clone()}</p>
                                        {post.published_at.map(|at| view! {
                                            <p class="text-xs text-gray-500">{format_timestamp(Some(at))}</p>
                                        })}
                                    </div>
                                    <button
                                        class="text-xs text-indigo-400 hover:text-indigo-300 shrink-0"
                                        on:click=move |_| set_published(target.clone())
                                    >
                                        {publish_label}
                                    </button>
                                </div>
                            }
                        }).collect_view().into_view()
                    }}
                </section>
            </div>

            {move || show_banner_modal.get().then(|| view! {
                <CreateBannerModal on_close=Callback::new(move |changed: bool| {
                    set_show_banner_modal.set(false);
                    if changed {
                        set_version.update(|n| *n += 1);
                    }
                }) />
            })}
            {move || show_post_modal.get().then(|| view! {
                <DraftPostModal on_close=Callback::new(move |changed: bool| {
                    set_show_post_modal.set(false);
                    if changed {
                        set_version.update(|n| *n += 1);
                    }
                }) />
            })}
        </div>
    }
}

#[component]
fn CreateBannerModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (title, set_title) = create_signal(String::new());
    let (image_url, set_image_url) = create_signal(String::new());
    let (link_url, set_link_url) = create_signal(String::new());
    let (sort_order, set_sort_order) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let submit_backend = backend.clone();
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let order = sort_order.get_untracked();
        let order = order.trim();
        let sort_order = if order.is_empty() {
            None
        } else {
            match order.parse::<i32>() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    state.show_error("Position must be a whole number");
                    return;
                }
            }
        };
        let link = link_url.get_untracked().trim().to_string();
        let draft = BannerDraft {
            title: title.get_untracked().trim().to_string(),
            image_url: image_url.get_untracked().trim().to_string(),
            link_url: (!link.is_empty()).then_some(link),
            active: true,
            sort_order,
        };
        let backend = submit_backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.banners().create(draft).await {
                Ok(created) => {
                    state.show_success(&format!("\"{}\" created", created.title));
                    on_close.call(true);
                }
                Err(err) => {
                    set_busy.set(false);
                    state.show_error(&err.to_string());
                }
            }
        });
    };

    view! {
        <Modal title="New banner" on_close=Callback::new(move |()| on_close.call(false))>
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
                    <label class="block text-sm text-gray-400 mb-1">"Image URL"</label>
                    <input
                        type="url"
                        class="input-field w-full font-mono text-sm"
                        required
                        prop:value=image_url
                        on:input=move |ev| set_image_url.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Link URL (optional)"</label>
                    <input
                        type="url"
                        class="input-field w-full font-mono text-sm"
                        prop:value=link_url
                        on:input=move |ev| set_link_url.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Position (optional, lowest first)"</label>
                    <input
                        type="number"
                        class="input-field w-full"
                        prop:value=sort_order
                        on:input=move |ev| set_sort_order.set(event_target_value(&ev))
                    />
                </div>
                <button type="submit" class="btn-primary w-full" disabled=busy>
                    {move || if busy.get() { "Creating..." } else { "Create banner" }}
                </button>
            </form>
        </Modal>
    }
}

#[component]
fn DraftPostModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (title, set_title) = create_signal(String::new());
    let (body, set_body) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let submit_backend = backend.clone();
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let backend = submit_backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            let result = backend
                .blog()
                .draft(title.get_untracked().trim(), &body.get_untracked())
                .await;
            match result {
                Ok(created) => {
                    state.show_success(&format!("\"{}\" drafted", created.title));
                    on_close.call(true);
                }
                Err(err) => {
                    set_busy.set(false);
                    state.show_error(&err.to_string());
                }
            }
        });
    };

    view! {
        <Modal title="New draft" on_close=Callback::new(move |()| on_close.call(false))>
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
                    <label class="block text-sm text-gray-400 mb-1">"Body"</label>
                    <textarea
                        class="input-field w-full h-40"
                        required
                        prop:value=body
                        on:input=move |ev| set_body.set(event_target_value(&ev))
                    />
                </div>
                <button type="submit" class="btn-primary w-full" disabled=busy>
                    {move || if busy.get() { "Saving..." } else { "Save draft" }}
                </button>
            </form>
        </Modal>
    }
}
