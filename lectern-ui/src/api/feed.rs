//! Row-Change Feed
//!
//! WebSocket implementation of the core crate's `Realtime` trait. Each
//! subscription opens one socket, joins the feed for its table, and
//! forwards decoded row changes into the returned stream. Dropping the
//! stream is the cancellation: the next event fails to send, and the
//! socket leaves the feed and closes.

use std::cell::RefCell;
use std::rc::Rc;

use futures_channel::mpsc;
use futures_util::stream::StreamExt;
use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use lectern::backend::{Realtime, RowChange, RowChanges, TableWatch};

use super::client::{get_anon_key, get_api_base};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Messages the console sends on a feed socket
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedCommand {
    /// Join the change feed for one table, optionally narrowed to rows
    /// matching a `column=eq.value` expression
    Join {
        table: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        filter: Option<String>,
    },
    Leave {
        table: String,
    },
}

/// Messages the feed pushes back
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedEvent {
    Joined {
        table: String,
    },
    Change {
        table: String,
        #[serde(flatten)]
        change: RowChange,
    },
    Heartbeat,
    Error {
        message: String,
    },
}

/// Change-feed client. One socket per subscription; the shared signal
/// reflects whether any feed socket is currently open.
pub struct ChangeFeed {
    connected: RwSignal<bool>,
}

impl ChangeFeed {
    pub fn new(connected: RwSignal<bool>) -> Self {
        Self { connected }
    }
}

impl Realtime for ChangeFeed {
    fn subscribe(&self, watch: TableWatch) -> RowChanges {
        let (tx, rx) = mpsc::unbounded();
        open_socket(watch, tx, Rc::new(RefCell::new(0)), self.connected);
        rx.boxed_local()
    }
}

/// The feed endpoint, derived from the backend base URL
fn feed_url() -> String {
    let ws_base = get_api_base()
        .replace("http://", "ws://")
        .replace("https://", "wss://");
    format!("{}/realtime/v1/websocket?apikey={}", ws_base, get_anon_key())
}

fn join_command(watch: &TableWatch) -> FeedCommand {
    let filter = watch.filter.as_ref().map(|f| {
        let (column, expr) = f.to_query_pair();
        format!("{column}={expr}")
    });
    FeedCommand::Join {
        table: watch.table.clone(),
        filter,
    }
}

/// Tell the server we are leaving, then close. Used when the subscriber
/// stream has been dropped.
fn leave_and_close(ws: &WebSocket, table: &str) {
    let command = FeedCommand::Leave {
        table: table.to_string(),
    };
    if let Ok(json) = serde_json::to_string(&command) {
        let _ = ws.send_with_str(&json);
    }
    let _ = ws.close();
}

fn open_socket(
    watch: TableWatch,
    tx: mpsc::UnboundedSender<RowChange>,
    attempts: Rc<RefCell<u32>>,
    connected: RwSignal<bool>,
) {
    let ws = match WebSocket::new(&feed_url()) {
        Ok(ws) => ws,
        Err(e) => {
            web_sys::console::error_1(&format!("Feed connection failed: {:?}", e).into());
            schedule_reconnect(watch, tx, attempts, connected);
            return;
        }
    };

    // On open: reset the backoff and join the table's feed
    let ws_for_open = ws.clone();
    let watch_for_open = watch.clone();
    let attempts_for_open = Rc::clone(&attempts);
    let on_open = Closure::wrap(Box::new(move |_: JsValue| {
        *attempts_for_open.borrow_mut() = 0;
        connected.set(true);
        if let Ok(json) = serde_json::to_string(&join_command(&watch_for_open)) {
            let _ = ws_for_open.send_with_str(&json);
        }
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    on_open.forget();

    // On message: decode, filter, forward
    let ws_for_message = ws.clone();
    let watch_for_message = watch.clone();
    let tx_for_message = tx.clone();
    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(text) = event.data().dyn_into::<js_sys::JsString>() {
            let text: String = text.into();
            if !handle_event(&text, &watch_for_message, &tx_for_message) {
                leave_and_close(&ws_for_message, &watch_for_message.table);
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    // On close: reconnect while the subscriber stream is still alive
    let watch_for_close = watch.clone();
    let tx_for_close = tx.clone();
    let attempts_for_close = Rc::clone(&attempts);
    let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
        web_sys::console::log_1(
            &format!("Feed closed: code={}, reason={}", event.code(), event.reason()).into(),
        );
        connected.set(false);
        if !tx_for_close.is_closed() {
            schedule_reconnect(
                watch_for_close.clone(),
                tx_for_close.clone(),
                Rc::clone(&attempts_for_close),
                connected,
            );
        }
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
    on_close.forget();

    let on_error = Closure::wrap(Box::new(move |e: JsValue| {
        web_sys::console::error_1(&format!("Feed error: {:?}", e).into());
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();
}

fn schedule_reconnect(
    watch: TableWatch,
    tx: mpsc::UnboundedSender<RowChange>,
    attempts: Rc<RefCell<u32>>,
    connected: RwSignal<bool>,
) {
    let attempt = *attempts.borrow();
    if attempt >= MAX_RECONNECT_ATTEMPTS {
        web_sys::console::error_1(&"Feed gave up reconnecting".into());
        return;
    }

    let delay = (2_u32.pow(attempt) * 1000).min(30_000);
    *attempts.borrow_mut() = attempt + 1;

    gloo_timers::callback::Timeout::new(delay, move || {
        if !tx.is_closed() {
            open_socket(watch, tx, attempts, connected);
        }
    })
    .forget();
}

/// Handle one incoming frame. Returns false once the subscriber stream
/// is gone and the socket should shut down.
fn handle_event(text: &str, watch: &TableWatch, tx: &mpsc::UnboundedSender<RowChange>) -> bool {
    match serde_json::from_str::<FeedEvent>(text) {
        Ok(FeedEvent::Change { table, change }) => {
            if table != watch.table || !watch.matches(change.row()) {
                return true;
            }
            tx.unbounded_send(change).is_ok()
        }
        Ok(FeedEvent::Joined { table }) => {
            web_sys::console::log_1(&format!("Feed joined: {}", table).into());
            true
        }
        Ok(FeedEvent::Heartbeat) => true,
        Ok(FeedEvent::Error { message }) => {
            web_sys::console::error_1(&format!("Feed server error: {}", message).into());
            true
        }
        Err(e) => {
            web_sys::console::error_1(&format!("Unparseable feed frame: {}", e).into());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern::backend::Filter;
    use serde_json::json;

    #[test]
    fn test_join_command_wire_shape() {
        let watch = TableWatch::new("stream_messages").filtered(Filter::eq("stream_id", "s-1"));
        let encoded = serde_json::to_value(join_command(&watch)).unwrap();
        assert_eq!(
            encoded,
            json!({
                "event": "join",
                "table": "stream_messages",
                "filter": "stream_id=eq.s-1"
            })
        );

        let unfiltered = serde_json::to_value(join_command(&TableWatch::new("poll_votes"))).unwrap();
        assert_eq!(unfiltered, json!({"event": "join", "table": "poll_votes"}));
    }

    #[test]
    fn test_change_event_decodes_row_change() {
        let frame = json!({
            "event": "change",
            "table": "poll_votes",
            "type": "insert",
            "row": {"id": "v-1", "option_index": 2}
        });
        let event: FeedEvent = serde_json::from_value(frame).unwrap();
        match event {
            FeedEvent::Change { table, change } => {
                assert_eq!(table, "poll_votes");
                assert!(matches!(change, RowChange::Insert(_)));
            }
            other => panic!("expected change, got {other:?}"),
        }
    }
}
