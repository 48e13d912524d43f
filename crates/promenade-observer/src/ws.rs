//! `WebSocket` frame streaming.
//!
//! Clients connect to `GET /ws/frames` and receive one JSON
//! [`FrameBroadcast`](crate::frame::FrameBroadcast) per tick. A client that
//! falls behind skips straight to the newest frame.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade to a `WebSocket` and start streaming frames.
pub async fn ws_frames(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("frame client connected");
    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => match result {
                Ok(frame) => {
                    let json = match serde_json::to_string(frame.as_ref()) {
                        Ok(j) => j,
                        Err(e) => {
                            warn!(tick = frame.tick, "failed to serialize frame: {e}");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(json.into())).await.is_err() {
                        debug!("frame client disconnected (send failed)");
                        return;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    debug!(skipped = n, "frame client lagged, skipping ahead");
                }
                Err(RecvError::Closed) => {
                    debug!("frame channel closed, closing socket");
                    return;
                }
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_))) | None => {
                    debug!("frame client disconnected");
                    return;
                }
                Some(Ok(Message::Ping(data))) => {
                    if socket.send(Message::Pong(data)).await.is_err() {
                        debug!("frame client disconnected (pong failed)");
                        return;
                    }
                }
                Some(Err(e)) => {
                    debug!("frame socket error: {e}");
                    return;
                }
                Some(Ok(_)) => {}
            },
        }
    }
}
