//! Recognized event names.

use serde::Serialize;

/// The fixed set of event names the gateway routes.
///
/// Anything outside this set is not an error; the router simply has no
/// handler for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventName {
    /// Reply through the acknowledgement of the same call.
    Echo,
    /// Relay the payload back to the sender as a `message` event.
    Message,
    /// Relay the payload back to the sender after a fixed delay.
    AsyncMessage,
    /// Send the payload to every connected client.
    Broadcast,
}

impl EventName {
    /// All recognized names, in registration order.
    pub const ALL: [EventName; 4] = [
        EventName::Echo,
        EventName::Message,
        EventName::AsyncMessage,
        EventName::Broadcast,
    ];

    /// Parse a wire name. Returns `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "echo" => Some(Self::Echo),
            "message" => Some(Self::Message),
            "async-message" => Some(Self::AsyncMessage),
            "broadcast" => Some(Self::Broadcast),
            _ => None,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Echo => "echo",
            Self::Message => "message",
            Self::AsyncMessage => "async-message",
            Self::Broadcast => "broadcast",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
