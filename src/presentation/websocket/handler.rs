//! WebSocket Connection Handler
//!
//! Drives one client session: registration, inbound dispatch, outbound
//! writes and cleanup.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, Utf8Bytes, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::ClientFrame;
use super::session::{Connection, Outbound};
use crate::application::{EventRouter, HandlerContext};
use crate::domain::{ConnectionId, DisconnectReason, EventSink};
use crate::startup::AppState;

/// How long the writer may keep flushing after the session loop ends.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    // A single frame may carry a whole message, so only the message size is capped
    let max_message_size = state.settings.websocket.max_message_size;
    ws.max_message_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = ConnectionId::new();
    tracing::debug!(connection_id = %connection_id, "New WebSocket connection");

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();
    let connection = Arc::new(Connection::new(connection_id, tx));

    // Subscribe before registering so a shutdown racing the handshake is seen
    let mut shutdown_rx = state.registry.subscribe_shutdown();
    state.registry.register(Arc::clone(&connection));

    // Spawn task to forward messages from channel to WebSocket
    let mut writer = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Frame(frame) => {
                    let text = match serde_json::to_string(&frame) {
                        Ok(t) => t,
                        Err(e) => {
                            tracing::error!("Failed to serialize frame: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = sender
                        .send(Message::Close(Some(CloseFrame {
                            code: close_code::AWAY,
                            reason: Utf8Bytes::from_static(DisconnectReason::ServerShutdown.as_str()),
                        })))
                        .await;
                    break;
                }
            }
        }
        // Completes a pending closing handshake
        let _ = sender.close().await;
    });

    let ctx = HandlerContext::new(connection_id, Arc::clone(&state.registry) as Arc<dyn EventSink>);

    let reason = if *shutdown_rx.borrow_and_update() {
        DisconnectReason::ServerShutdown
    } else {
        loop {
            tokio::select! {
                msg = receiver.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            handle_text(text.as_str(), &ctx, &state.router).await;
                        }
                        Some(Ok(Message::Binary(_))) => {
                            tracing::debug!(connection_id = %connection_id, "Ignoring binary frame");
                        }
                        Some(Ok(Message::Close(_))) => break DisconnectReason::ClientDisconnect,
                        None => break DisconnectReason::TransportClose,
                        Some(Err(e)) => {
                            tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                            break DisconnectReason::TransportError;
                        }
                        // Ping/Pong are answered by axum
                        Some(Ok(_)) => {}
                    }
                }

                _ = shutdown_rx.changed() => break DisconnectReason::ServerShutdown,
            }
        }
    };

    // Cleanup
    state.registry.unregister(connection_id, reason);
    if reason == DisconnectReason::ServerShutdown {
        connection.close();
    }
    drop(connection);
    drop(ctx);

    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer).await.is_err() {
        writer.abort();
    }

    tracing::debug!(connection_id = %connection_id, reason = %reason, "Session ended");
}

/// Decode one text frame and route it. Malformed frames are dropped.
async fn handle_text(text: &str, ctx: &HandlerContext, router: &EventRouter) {
    match ClientFrame::parse(text) {
        Ok(frame) => {
            let outcome = router.dispatch(ctx, frame.into_event()).await;
            tracing::trace!(connection_id = %ctx.connection_id, ?outcome, "Event handled");
        }
        Err(e) => {
            tracing::debug!(
                connection_id = %ctx.connection_id,
                error = %e,
                "Ignoring malformed frame"
            );
        }
    }
}
