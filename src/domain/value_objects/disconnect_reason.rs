//! Why a session ended.

use serde::Serialize;

/// Reason reported to the server-side disconnect handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectReason {
    /// The client sent a Close frame.
    ClientDisconnect,
    /// The stream ended without a closing handshake.
    TransportClose,
    /// The transport failed while reading.
    TransportError,
    /// The server is shutting down and closed the session itself.
    ServerShutdown,
}

impl DisconnectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientDisconnect => "client disconnect",
            Self::TransportClose => "transport close",
            Self::TransportError => "transport error",
            Self::ServerShutdown => "server shutdown",
        }
    }

    /// Whether the client chose to leave.
    pub fn is_voluntary(&self) -> bool {
        matches!(self, Self::ClientDisconnect)
    }
}

impl std::fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
