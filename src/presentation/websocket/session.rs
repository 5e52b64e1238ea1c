//! WebSocket Connection Handle

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::messages::ServerFrame;
use crate::domain::ConnectionId;

/// Instruction for a connection's writer task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Frame(ServerFrame),
    /// Send a Close frame and stop writing.
    Close,
}

/// One live client session as seen by the registry.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    connected_at: DateTime<Utc>,
    sender: mpsc::UnboundedSender<Outbound>,
}

impl Connection {
    pub fn new(id: ConnectionId, sender: mpsc::UnboundedSender<Outbound>) -> Self {
        Self {
            id,
            connected_at: Utc::now(),
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Queue a frame. Returns `false` if the connection is already closed.
    pub fn send(&self, frame: ServerFrame) -> bool {
        self.sender.send(Outbound::Frame(frame)).is_ok()
    }

    /// Ask the writer task to close the socket.
    pub fn close(&self) -> bool {
        self.sender.send(Outbound::Close).is_ok()
    }
}
