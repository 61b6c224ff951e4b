use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::AppState;

const CHANNEL_CAPACITY: usize = 64;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
struct Frame {
    origin: u64,
    payload: String,
}

/// Best-effort broadcast relay: every JSON text message received from one
/// client is forwarded to every other currently-open client. At-most-once,
/// no ordering guarantee across connections, no acknowledgment; a lagged
/// subscriber loses the overwritten frames instead of blocking the channel.
#[derive(Clone)]
pub struct Relay {
    tx: broadcast::Sender<Frame>,
}

impl Default for Relay {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl Relay {
    pub fn connections(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Only well-formed JSON is relayed; anything else is dropped.
fn relayable(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

pub async fn handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let relay = state.relay.clone();
    ws.on_upgrade(move |socket| run(socket, relay))
}

async fn run(socket: WebSocket, relay: Relay) {
    let client_id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    let (mut sink, mut stream) = socket.split();
    let mut rx = relay.tx.subscribe();
    debug!(
        "relay client {} connected, {} subscribed",
        client_id,
        relay.connections()
    );

    let mut forward = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(frame) => {
                    if frame.origin == client_id {
                        continue;
                    }
                    if sink.send(Message::Text(frame.payload)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("relay client {} lagged, skipped {} frames", client_id, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let tx = relay.tx.clone();
    let mut inbound = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            if let Message::Text(text) = message {
                if relayable(&text) {
                    // Send only fails when there are no other subscribers;
                    // best-effort fan-out ignores that.
                    let _ = tx.send(Frame {
                        origin: client_id,
                        payload: text,
                    });
                } else {
                    warn!("relay client {} sent non-JSON payload, dropped", client_id);
                }
            }
        }
    });

    tokio::select! {
        _ = &mut forward => inbound.abort(),
        _ = &mut inbound => forward.abort(),
    }
    debug!("relay client {} disconnected", client_id);
}
