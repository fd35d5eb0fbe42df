//! Session Room Page
//!
//! Control room for one live stream: polls with a live tally and the
//! moderated chat. Both widgets subscribe to row changes and re-run
//! their read query on every notification; the subscription stops when
//! the component unmounts or, for polls, when a different poll opens.

use std::cell::RefCell;
use std::rc::Rc;

use futures_channel::oneshot;
use futures_util::future::{self, Either};
use futures_util::StreamExt;
use leptos::*;
use leptos_router::{use_params_map, A};
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::backend::{RowChange, RowChanges};
use lectern::model::{MessageDraft, Poll, PollDraft, Stream, StreamMessage};
use lectern::service::{ChatFeed, PollTally};

use crate::api::use_backend;
use crate::components::{stream_tone, Guarded, Loading, StatusBadge};
use crate::state::{format_timestamp, use_console_state};

/// Pump a change stream into a handler until `stop` fires or the stream
/// ends. Dropping the stream is what tells the feed to leave the table.
fn pump(changes: RowChanges, stop: oneshot::Receiver<()>, mut on_change: impl FnMut(RowChange) + 'static) {
    spawn_local(async move {
        let mut changes = changes;
        let mut stop = stop;
        loop {
            match future::select(changes.next(), &mut stop).await {
                Either::Left((Some(change), _)) => on_change(change),
                _ => break,
            }
        }
    });
}

#[component]
pub fn SessionRoom() -> impl IntoView {
    view! {
        <Guarded surface=Surface::LiveSessions>
            <RoomView />
        </Guarded>
    }
}

#[component]
fn RoomView() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();
    let params = use_params_map();

    let stream_id = move || {
        params.with(|p| p.get("id").and_then(|raw| Uuid::parse_str(raw).ok()))
    };

    let (stream, set_stream) = create_signal(None::<Stream>);
    let (missing, set_missing) = create_signal(false);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        let Some(id) = stream_id() else {
            set_missing.set(true);
            return;
        };
        let backend = fetch_backend.clone();
        spawn_local(async move {
            match backend.live().stream(id).await {
                Ok(Some(found)) => set_stream.set(Some(found)),
                Ok(None) => set_missing.set(true),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    view! {
        <div class="p-8">
            <A href="/admin/live" class="text-sm text-indigo-400 hover:text-indigo-300">
                "← Live streams"
            </A>

            {move || {
                if missing.get() {
                    return view! {
                        <p class="text-gray-400 mt-6">"No such stream."</p>
                    }.into_view();
                }
                match stream.get() {
                    None => view! { <Loading /> }.into_view(),
                    Some(current) => view! {
                        <div class="mt-4">
                            <div class="flex items-center gap-3 mb-6">
                                <h1 class="text-2xl font-bold text-white">{current.title.clone()}</h1>
                                <StatusBadge
                                    label=current.status.label()
                                    tone=stream_tone(current.status)
                                />
                            </div>
                            <div class="grid gap-8 lg:grid-cols-2">
                                <PollPanel stream_id=current.id />
                                <ChatPanel stream_id=current.id />
                            </div>
                        </div>
                    }.into_view(),
                }
            }}
        </div>
    }
}

/// Polls for one stream. The open poll's votes are watched live; every
/// notification re-fetches polls and tallies.
#[component]
fn PollPanel(stream_id: Uuid) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (polls, set_polls) = create_signal(Vec::<Poll>::new());
    let (tallies, set_tallies) = create_signal(Vec::<(Uuid, PollTally)>::new());
    let (version, set_version) = create_signal(0u32);

    let (question, set_question) = create_signal(String::new());
    let (options_text, set_options_text) = create_signal(String::new());

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            let board = backend.polls();
            let list = match board.polls(stream_id).await {
                Ok(list) => list,
                Err(err) => {
                    state.show_error(&err.to_string());
                    return;
                }
            };
            let mut counted = Vec::with_capacity(list.len());
            for poll in &list {
                match board.tally(poll).await {
                    Ok(tally) => counted.push((poll.id, tally)),
                    Err(err) => state.show_error(&err.to_string()),
                }
            }
            set_polls.set(list);
            set_tallies.set(counted);
        });
    });

    // One vote watch at a time, keyed by the currently open poll.
    // Replacing the slot drops the old stop sender, which ends the old
    // pump and with it the old subscription.
    let active_watch: Rc<RefCell<Option<(Uuid, oneshot::Sender<()>)>>> =
        Rc::new(RefCell::new(None));
    on_cleanup({
        let active_watch = active_watch.clone();
        move || {
            active_watch.borrow_mut().take();
        }
    });

    let watch_backend = backend.clone();
    create_effect(move |_| {
        let open = polls.with(|list| list.iter().find(|p| p.is_open).map(|p| p.id));
        let mut slot = active_watch.borrow_mut();
        let current = slot.as_ref().map(|(id, _)| *id);
        match (open, current) {
            (Some(id), Some(watched)) if id == watched => {}
            (Some(id), _) => {
                let (stop_tx, stop_rx) = oneshot::channel();
                *slot = Some((id, stop_tx));
                let changes = watch_backend.polls().watch_votes(id);
                pump(changes, stop_rx, move |_| {
                    set_version.update(|n| *n += 1);
                });
            }
            (None, Some(_)) => {
                *slot = None;
            }
            (None, None) => {}
        }
    });

    let open_backend = backend.clone();
    let open_poll = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let options: Vec<String> = options_text.with_untracked(|text| {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        });
        if options.len() < 2 {
            state.show_error("A poll needs at least two options");
            return;
        }
        let draft = PollDraft {
            stream_id,
            question: question.get_untracked().trim().to_string(),
            options,
            is_open: true,
        };
        let backend = open_backend.clone();
        spawn_local(async move {
            match backend.polls().open_poll(draft).await {
                Ok(_) => {
                    state.show_success("Poll opened");
                    set_question.set(String::new());
                    set_options_text.set(String::new());
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    let close_backend = backend.clone();
    let close_poll = move |id: Uuid| {
        let backend = close_backend.clone();
        spawn_local(async move {
            match backend.polls().close_poll(id).await {
                Ok(_) => {
                    state.show_success("Poll closed");
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <section class="bg-gray-800 rounded-lg p-6">
            <h2 class="text-lg font-semibold text-white mb-4">"Polls"</h2>

            {move || {
                let list = polls.get();
                if list.is_empty() {
                    return view! {
                        <p class="text-sm text-gray-500 mb-4">"No polls yet."</p>
                    }.into_view();
                }
                let close_poll = close_poll.clone();
                list.into_iter().map(|poll| {
                    let close_poll = close_poll.clone();
                    let poll_id = poll.id;
                    let tally = tallies.with(|all| {
                        all.iter()
                            .find(|(id, _)| *id == poll_id)
                            .map(|(_, tally)| tally.clone())
                    });
                    view! {
                        <div class="bg-gray-900 rounded p-4 mb-3">
                            <div class="flex items-start justify-between gap-3 mb-2">
                                <p class="text-sm text-white">{poll.question.clone()}</p>
                                {poll.is_open.then(|| view! {
                                    <button
                                        class="text-xs text-red-400 hover:text-red-300"
                                        on:click=move |_| close_poll(poll_id)
                                    >
                                        "Close"
                                    </button>
                                })}
                            </div>
                            {poll.options.iter().enumerate().map(|(index, option)| {
                                let (count, percent, leading) = tally
                                    .as_ref()
                                    .map(|t| {
                                        (
                                            t.counts().get(index).copied().unwrap_or(0),
                                            t.percent(index),
                                            t.leader() == Some(index),
                                        )
                                    })
                                    .unwrap_or((0, 0, false));
                                let bar_class = if leading {
                                    "bg-indigo-500 h-2 rounded"
                                } else {
                                    "bg-gray-600 h-2 rounded"
                                };
                                view! {
                                    <div class="mb-2">
                                        <div class="flex justify-between text-xs text-gray-400 mb-1">
                                            <span>{option.clone()}</span>
                                            <span>{count} " · " {percent} "%"</span>
                                        </div>
                                        <div class="bg-gray-800 rounded h-2">
                                            <div class=bar_class style=format!("width: {percent}%") />
                                        </div>
                                    </div>
                                }
                            }).collect_view()}
                            <p class="text-xs text-gray-500 mt-1">
                                {tally.as_ref().map(|t| t.total()).unwrap_or(0)} " votes"
                                {poll.is_open.then_some(" · live")}
                            </p>
                        </div>
                    }
                }).collect_view().into_view()
            }}

            <form class="space-y-3 border-t border-gray-700 pt-4" on:submit=open_poll>
                <input
                    type="text"
                    class="input-field w-full"
                    placeholder="Poll question"
                    required
                    prop:value=question
                    on:input=move |ev| set_question.set(event_target_value(&ev))
                />
                <textarea
                    class="input-field w-full h-20"
                    placeholder="Options, one per line"
                    prop:value=options_text
                    on:input=move |ev| set_options_text.set(event_target_value(&ev))
                />
                <button type="submit" class="btn-primary w-full">"Open poll"</button>
            </form>
        </section>
    }
}

/// Chat for one stream. Changes are applied to the local feed as they
/// arrive, and a full re-fetch reconciles; reconciliation never
/// duplicates a message that came in both ways.
#[component]
fn ChatPanel(stream_id: Uuid) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let feed = Rc::new(RefCell::new(ChatFeed::new()));
    let (messages, set_messages) = create_signal(Vec::<StreamMessage>::new());
    let (version, set_version) = create_signal(0u32);
    let (body, set_body) = create_signal(String::new());

    let fetch_backend = backend.clone();
    let fetch_feed = feed.clone();
    create_effect(move |_| {
        version.track();
        let backend = fetch_backend.clone();
        let feed = fetch_feed.clone();
        spawn_local(async move {
            match backend.chat().messages(stream_id).await {
                Ok(fetched) => {
                    feed.borrow_mut().reconcile(fetched);
                    set_messages.set(feed.borrow().messages().to_vec());
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    let (stop_tx, stop_rx) = oneshot::channel();
    on_cleanup(move || {
        let _ = stop_tx.send(());
    });
    let live_feed = feed.clone();
    pump(backend.chat().watch(stream_id), stop_rx, move |change| {
        live_feed.borrow_mut().apply(change);
        set_messages.set(live_feed.borrow().messages().to_vec());
        // Re-fetch for truth; reconcile dedupes the change just applied
        set_version.update(|n| *n += 1);
    });

    let remove_backend = backend.clone();
    let remove = move |id: Uuid| {
        let backend = remove_backend.clone();
        spawn_local(async move {
            match backend.chat().remove(id).await {
                Ok(()) => {
                    state.show_success("Message removed");
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    let post_backend = backend.clone();
    let post = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = body.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        let sender = state.profile.get_untracked();
        let draft = MessageDraft {
            stream_id,
            sender_id: sender.as_ref().map(|user| user.id),
            sender_name: sender.map(|user| user.full_name),
            body: text.trim().to_string(),
        };
        let backend = post_backend.clone();
        spawn_local(async move {
            match backend.chat().post(draft).await {
                Ok(_) => {
                    set_body.set(String::new());
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <section class="bg-gray-800 rounded-lg p-6 flex flex-col">
            <h2 class="text-lg font-semibold text-white mb-4">"Chat"</h2>

            <div class="flex-1 space-y-2 overflow-y-auto max-h-96 mb-4">
                {move || {
                    let list = messages.get();
                    if list.is_empty() {
                        return view! {
                            <p class="text-sm text-gray-500">"Nothing said yet."</p>
                        }.into_view();
                    }
                    let remove = remove.clone();
                    list.into_iter().map(|message| {
                        let remove = remove.clone();
                        let message_id = message.id;
                        view! {
                            <div class="bg-gray-900 rounded px-3 py-2 flex items-start justify-between gap-3">
                                <div>
                                    <p class="text-xs text-gray-500">
                                        {message.sender_name.clone().unwrap_or_else(|| "Anonymous".to_string())}
                                        " · "
                                        {format_timestamp(message.created_at)}
                                    </p>
                                    <p class="text-sm text-gray-200">{message.body.clone()}</p>
                                </div>
                                <button
                                    class="text-xs text-red-400 hover:text-red-300"
                                    on:click=move |_| remove(message_id)
                                >
                                    "Remove"
                                </button>
                            </div>
                        }
                    }).collect_view().into_view()
                }}
            </div>

            <form class="flex gap-2" on:submit=post>
                <input
                    type="text"
                    class="input-field flex-1"
                    placeholder="Say something"
                    prop:value=body
                    on:input=move |ev| set_body.set(event_target_value(&ev))
                />
                <button type="submit" class="btn-primary">"Send"</button>
            </form>
        </section>
    }
}
