//! Per-subscriber state stream
//!
//! Every WebSocket gets its own timer task. On connect it receives
//! `{"type":"hello"}`, then one `state` message per tick, the first one a
//! full period later, until the socket closes or a send fails. Dropping the
//! task drops its timer; nothing else is shared between subscribers except
//! the simulator lock.

use super::AppState;
use super::messages::StreamMessage;
use crate::error::{Error, Result};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// `GET /ws`
pub(super) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let active = state.subscribers.fetch_add(1, Ordering::Relaxed) + 1;
    info!("Subscriber connected ({} active)", active);

    if let Err(e) = stream_state(socket, &state).await {
        debug!("Subscriber stream ended: {}", e);
    }

    let active = state.subscribers.fetch_sub(1, Ordering::Relaxed) - 1;
    info!("Subscriber disconnected ({} active)", active);
}

async fn stream_state(mut socket: WebSocket, state: &AppState) -> Result<()> {
    send_json(&mut socket, &StreamMessage::Hello).await?;

    // First push one period after hello, not immediately
    let period = state.tick_interval();
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = StreamMessage::from(state.observe());
                send_json(&mut socket, &frame).await?;
            }

            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => return Ok(()),
                    Some(Err(e)) => return Err(Error::Server(e.to_string())),
                    // Inbound text/ping frames carry no commands
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

async fn send_json(socket: &mut WebSocket, msg: &StreamMessage) -> Result<()> {
    let json = serde_json::to_string(msg)?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| Error::Server(e.to_string()))
}
