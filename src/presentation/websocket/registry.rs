//! Connection Registry
//!
//! Tracks live sessions and delivers outbound events to them.
//!
//! Connections live in a [`DashMap`]. Broadcasts take a snapshot of the
//! current members before sending, so concurrent connects and disconnects
//! never interfere with an in-progress broadcast.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::{broadcast, watch};

use super::messages::ServerFrame;
use super::session::Connection;
use crate::domain::{AckId, ConnectionId, DisconnectReason, EventSink, OutboundEvent};
use crate::infrastructure::metrics;

/// Connect/disconnect notifications published by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Connected(ConnectionId),
    Disconnected(ConnectionId, DisconnectReason),
}

/// Registry of currently connected clients
pub struct ConnectionRegistry {
    /// Active connections by id
    connections: DashMap<ConnectionId, Arc<Connection>>,
    /// Lifecycle notifications
    lifecycle_tx: broadcast::Sender<LifecycleEvent>,
    /// Flips to `true` once when the server shuts down
    shutdown_tx: watch::Sender<bool>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        let (lifecycle_tx, _) = broadcast::channel(1024);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            connections: DashMap::new(),
            lifecycle_tx,
            shutdown_tx,
        }
    }

    /// Add a connection after a successful handshake.
    pub fn register(&self, connection: Arc<Connection>) {
        let connection_id = connection.id();
        if self.connections.insert(connection_id, connection).is_some() {
            tracing::warn!(connection_id = %connection_id, "Connection id registered twice, replaced");
        }
        metrics::set_websocket_connections(self.connections.len());
        let _ = self.lifecycle_tx.send(LifecycleEvent::Connected(connection_id));

        tracing::info!(connection_id = %connection_id, "Connection registered");
    }

    /// Remove a connection. Returns `false` if it was already gone.
    pub fn unregister(&self, connection_id: ConnectionId, reason: DisconnectReason) -> bool {
        let Some((_, connection)) = self.connections.remove(&connection_id) else {
            return false;
        };

        metrics::set_websocket_connections(self.connections.len());
        metrics::record_disconnect(reason.as_str());
        let _ = self
            .lifecycle_tx
            .send(LifecycleEvent::Disconnected(connection_id, reason));

        let connected_secs = (chrono::Utc::now() - connection.connected_at()).num_seconds();
        tracing::info!(
            connection_id = %connection_id,
            reason = %reason,
            connected_secs,
            "Connection unregistered"
        );
        true
    }

    /// Look up a registered connection.
    pub fn get(&self, connection_id: ConnectionId) -> Option<Arc<Connection>> {
        self.connections
            .get(&connection_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Check whether a connection is registered.
    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.connections.contains_key(&connection_id)
    }

    /// Get connection count
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Copy of the current members.
    pub fn snapshot(&self) -> Vec<Arc<Connection>> {
        self.connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Subscribe to connect/disconnect notifications
    pub fn subscribe_lifecycle(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.lifecycle_tx.subscribe()
    }

    /// Subscribe to the shutdown signal
    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Whether shutdown has been requested.
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Tell every session to close.
    pub fn shutdown(&self) {
        tracing::info!(
            connections = self.connections.len(),
            "Closing all connections for shutdown"
        );
        self.shutdown_tx.send_replace(true);
    }

    fn send_frame(&self, connection_id: ConnectionId, frame: ServerFrame) -> bool {
        let Some(connection) = self.get(connection_id) else {
            tracing::debug!(connection_id = %connection_id, "Dropping frame for unknown connection");
            return false;
        };
        let name = frame.name().to_string();
        let delivered = connection.send(frame);
        if delivered {
            metrics::record_events_emitted(&name, 1);
        } else {
            tracing::debug!(connection_id = %connection_id, "Dropping frame for closed connection");
        }
        delivered
    }
}

impl EventSink for ConnectionRegistry {
    fn emit_to(&self, connection_id: ConnectionId, event: OutboundEvent) -> bool {
        self.send_frame(connection_id, event.into())
    }

    fn acknowledge(&self, connection_id: ConnectionId, ack: AckId, data: Value) -> bool {
        self.send_frame(connection_id, ServerFrame::ack(ack, data))
    }

    fn broadcast(&self, event: OutboundEvent) -> usize {
        let recipients = self.snapshot();
        let frame = ServerFrame::from(event);
        let delivered = recipients
            .iter()
            .filter(|connection| connection.send(frame.clone()))
            .count();

        metrics::record_events_emitted(frame.name(), delivered);
        tracing::debug!(
            event = frame.name(),
            recipients = recipients.len(),
            delivered,
            "Broadcast event to all"
        );
        delivered
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
