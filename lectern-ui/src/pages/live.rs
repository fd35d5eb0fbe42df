//! Live Sessions Page
//!
//! Streams and scheduled events. Stream lifecycle only moves forward:
//! scheduled, live, ended. The room view for a running stream handles
//! polls and chat.

use chrono::{DateTime, NaiveDateTime, Utc};
use leptos::*;
use leptos_router::A;
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::model::{LiveEvent, LiveEventDraft, Stream, StreamDraft, StreamStatus};

use crate::api::use_backend;
use crate::components::{stream_tone, EmptyState, Guarded, ListSkeleton, Modal, StatusBadge};
use crate::state::{format_timestamp, use_console_state};

/// Parse the value of a `datetime-local` input as UTC
pub(super) fn parse_local_datetime(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[component]
pub fn Live() -> impl IntoView {
    view! {
        <Guarded surface=Surface::LiveSessions>
            <LiveBoard />
        </Guarded>
    }
}

#[component]
fn LiveBoard() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (streams, set_streams) = create_signal(Vec::<Stream>::new());
    let (events, set_events) = create_signal(Vec::<LiveEvent>::new());
    let (loaded, set_loaded) = create_signal(false);
    let (version, set_version) = create_signal(0u32);

    let (show_schedule, set_show_schedule) = create_signal(false);
    let (show_event, set_show_event) = create_signal(false);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let org = state.org_scope();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            let live = backend.live();
            let (streams, events) =
                futures_util::future::join(live.streams(org), live.events(org)).await;
            match streams {
                Ok(list) => set_streams.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
            match events {
                Ok(list) => set_events.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
            set_loaded.set(true);
        });
    });

    let advance_backend = backend.clone();
    let advance = move |stream: Stream| {
        let backend = advance_backend.clone();
        spawn_local(async move {
            match backend.live().advance(&stream).await {
                Ok(updated) => {
                    state.show_success(&format!(
                        "{} is now {}",
                        updated.title,
                        updated.status.label().to_lowercase()
                    ));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <div class="p-8 space-y-10">
            <section>
                <div class="flex items-center justify-between mb-4">
                    <h1 class="text-2xl font-bold text-white">"Live streams"</h1>
                    <button class="btn-primary" on:click=move |_| set_show_schedule.set(true)>
                        "Schedule stream"
                    </button>
                </div>

                {move || {
                    if !loaded.get() {
                        return view! { <ListSkeleton count=3 /> }.into_view();
                    }
                    let list = streams.get();
                    if list.is_empty() {
                        return view! { <EmptyState message="No streams scheduled" /> }.into_view();
                    }
                    let advance = advance.clone();
                    view! {
                        <table class="w-full text-left">
                            <thead>
                                <tr class="text-xs uppercase text-gray-500 border-b border-gray-700">
                                    <th class="py-2">"Title"</th>
                                    <th>"Status"</th>
                                    <th>"Scheduled for"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {list.into_iter().map(|stream| {
                                    let advance = advance.clone();
                                    let row = stream.clone();
                                    let advance_label = match stream.status {
                                        StreamStatus::Scheduled => Some("Go live"),
                                        StreamStatus::Live => Some("End stream"),
                                        StreamStatus::Ended => None,
                                    };
                                    view! {
                                        <tr class="border-b border-gray-800 text-sm text-gray-300">
                                            <td class="py-3 text-white">{stream.title.clone()}</td>
                                            <td>
                                                <StatusBadge
                                                    label=stream.status.label()
                                                    tone=stream_tone(stream.status)
                                                />
                                            </td>
                                            <td>{format_timestamp(stream.scheduled_for)}</td>
                                            <td class="text-right space-x-3 whitespace-nowrap">
                                                <A
                                                    href=format!("/admin/live/{}", stream.id)
                                                    class="text-indigo-400 hover:text-indigo-300"
                                                >
                                                    "Open room"
                                                </A>
                                                {advance_label.map(|label| view! {
                                                    <button
                                                        class="text-gray-400 hover:text-white"
                                                        on:click=move |_| advance(row.clone())
                                                    >
                                                        {label}
                                                    </button>
                                                })}
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view()
                }}
            </section>

            <section>
                <div class="flex items-center justify-between mb-4">
                    <h2 class="text-xl font-semibold text-white">"Events"</h2>
                    <button class="btn-secondary" on:click=move |_| set_show_event.set(true)>
                        "New event"
                    </button>
                </div>

                {move || {
                    if !loaded.get() {
                        return view! { <ListSkeleton count=2 /> }.into_view();
                    }
                    let list = events.get();
                    if list.is_empty() {
                        return view! { <EmptyState message="No events" /> }.into_view();
                    }
                    list.into_iter().map(|event| view! {
                        <div class="bg-gray-800 rounded-lg p-4 mb-2 flex items-center justify-between">
                            <div>
                                <p class="text-sm text-white">{event.title.clone()}</p>
                                <p class="text-xs text-gray-500">
                                    {format_timestamp(event.starts_at)}
                                    {event.location.clone().map(|place| format!(" · {place}"))}
                                </p>
                            </div>
                        </div>
                    }).collect_view().into_view()
                }}
            </section>

            {move || show_schedule.get().then(|| view! {
                <ScheduleStreamModal
                    on_close=Callback::new(move |changed: bool| {
                        set_show_schedule.set(false);
                        if changed {
                            set_version.update(|n| *n += 1);
                        }
                    })
                />
            })}

            {move || show_event.get().then(|| view! {
                <CreateEventModal
                    on_close=Callback::new(move |changed: bool| {
                        set_show_event.set(false);
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
fn ScheduleStreamModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (title, set_title) = create_signal(String::new());
    let (when, set_when) = create_signal(String::new());
    let (playback, set_playback) = create_signal(String::new());
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
        let mut draft = StreamDraft::new(org_id, title.get_untracked().trim());
        let when_raw = when.get_untracked();
        if !when_raw.trim().is_empty() {
            match parse_local_datetime(when_raw.trim()) {
                Some(at) => draft.scheduled_for = Some(at),
                None => {
                    state.show_error("Could not read the scheduled time");
                    return;
                }
            }
        }
        let playback_raw = playback.get_untracked();
        if !playback_raw.trim().is_empty() {
            draft.playback_url = Some(playback_raw.trim().to_string());
        }
        let backend = backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.live().schedule(draft).await {
                Ok(created) => {
                    state.show_success(&format!("{} scheduled", created.title));
                    on_close.call(true);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <Modal title="Schedule stream" on_close=Callback::new(move |_| on_close.call(false))>
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
                    <label class="block text-sm text-gray-400 mb-1">"Starts (optional)"</label>
                    <input
                        type="datetime-local"
                        class="input-field w-full"
                        prop:value=when
                        on:input=move |ev| set_when.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Playback URL (optional)"</label>
                    <input
                        type="url"
                        class="input-field w-full"
                        prop:value=playback
                        on:input=move |ev| set_playback.set(event_target_value(&ev))
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
                    {move || if busy.get() { "Scheduling…" } else { "Schedule" }}
                </button>
            </form>
        </Modal>
    }
}

#[component]
fn CreateEventModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (title, set_title) = create_signal(String::new());
    let (when, set_when) = create_signal(String::new());
    let (location, set_location) = create_signal(String::new());
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
        let when_raw = when.get_untracked();
        let starts_at = match when_raw.trim() {
            "" => None,
            raw => match parse_local_datetime(raw) {
                Some(at) => Some(at),
                None => {
                    state.show_error("Could not read the start time");
                    return;
                }
            },
        };
        let location_raw = location.get_untracked();
        let draft = LiveEventDraft {
            org_id,
            title: title.get_untracked().trim().to_string(),
            starts_at,
            location: (!location_raw.trim().is_empty()).then(|| location_raw.trim().to_string()),
        };
        let backend = backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.live().create_event(draft).await {
                Ok(created) => {
                    state.show_success(&format!("{} created", created.title));
                    on_close.call(true);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <Modal title="New event" on_close=Callback::new(move |_| on_close.call(false))>
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
                    <label class="block text-sm text-gray-400 mb-1">"Starts (optional)"</label>
                    <input
                        type="datetime-local"
                        class="input-field w-full"
                        prop:value=when
                        on:input=move |ev| set_when.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Location (optional)"</label>
                    <input
                        type="text"
                        class="input-field w-full"
                        prop:value=location
                        on:input=move |ev| set_location.set(event_target_value(&ev))
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
                    {move || if busy.get() { "Creating…" } else { "Create event" }}
                </button>
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_datetime_without_seconds() {
        let parsed = parse_local_datetime("2026-08-21T14:30").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-08-21T14:30:00+00:00");
    }

    #[test]
    fn test_parse_local_datetime_rejects_garbage() {
        assert!(parse_local_datetime("next tuesday").is_none());
    }
}
