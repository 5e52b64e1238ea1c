//! WebSocket Message Types
//!
//! JSON envelopes carried in text frames.
//!
//! ```text
//! client -> server   {"event": "echo", "data": "Test", "ack": 1}
//! server -> client   {"ack": 1, "data": "Test"}
//! server -> client   {"event": "message", "data": "Test"}
//! ```

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{AckId, InboundEvent, OutboundEvent};
use crate::shared::error::AppError;

/// Incoming envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub ack: Option<AckId>,
}

impl ClientFrame {
    /// Decode a text frame.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::InvalidFrame(e.to_string()))
    }

    pub fn into_event(self) -> InboundEvent {
        InboundEvent {
            name: self.event,
            payload: self.data,
            ack: self.ack,
        }
    }
}

/// Outgoing envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerFrame {
    /// Named event
    Event { event: String, data: Value },
    /// Reply to an acknowledged call
    Ack { ack: AckId, data: Value },
}

/// Both variants flattened into one struct. Untagged decoding buffers
/// numbers as maps under `arbitrary_precision`, so it is avoided here.
#[derive(Deserialize)]
struct RawServerFrame {
    event: Option<String>,
    ack: Option<AckId>,
    #[serde(default)]
    data: Value,
}

impl<'de> Deserialize<'de> for ServerFrame {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawServerFrame { event, ack, data } = RawServerFrame::deserialize(deserializer)?;
        match (event, ack) {
            (Some(event), None) => Ok(ServerFrame::Event { event, data }),
            (None, Some(ack)) => Ok(ServerFrame::Ack { ack, data }),
            _ => Err(de::Error::custom("expected exactly one of `event` or `ack`")),
        }
    }
}

impl From<OutboundEvent> for ServerFrame {
    fn from(event: OutboundEvent) -> Self {
        ServerFrame::Event {
            event: event.event,
            data: event.data,
        }
    }
}

impl ServerFrame {
    pub fn ack(ack: AckId, data: Value) -> Self {
        ServerFrame::Ack { ack, data }
    }

    /// Event name, for logging and metrics. Acks report `"ack"`.
    pub fn name(&self) -> &str {
        match self {
            ServerFrame::Event { event, .. } => event,
            ServerFrame::Ack { .. } => "ack",
        }
    }
}
