//! Event messages and the outbound delivery contract.
//!
//! Payloads are carried as untyped [`serde_json::Value`]s and are never
//! inspected or mutated on their way through the gateway.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::{ConnectionId, EventName};

/// Correlation id of an acknowledgement callback attached by the client.
pub type AckId = u64;

/// An inbound unit of communication from one client.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Event name as sent on the wire. May be unrecognized.
    pub name: String,

    /// Arbitrary payload, `Null` when the client sent none.
    pub payload: Value,

    /// Present only when the client expects a reply on the acknowledgement channel.
    pub ack: Option<AckId>,
}

impl InboundEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
            ack: None,
        }
    }

    /// Attach an acknowledgement id.
    pub fn with_ack(mut self, ack: AckId) -> Self {
        self.ack = Some(ack);
        self
    }

    /// The recognized event name, if any.
    pub fn event_name(&self) -> Option<EventName> {
        EventName::from_name(&self.name)
    }
}

/// A named event with payload sent to one or many connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub event: String,
    pub data: Value,
}

impl OutboundEvent {
    pub fn new(event: EventName, data: Value) -> Self {
        Self {
            event: event.as_str().to_string(),
            data,
        }
    }
}

/// What a handler wants delivered after it ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Answer through the acknowledgement channel of the same call.
    Ack(Value),

    /// Emit an event back to the sender right away.
    Emit(OutboundEvent),

    /// Emit an event back to the sender once `after` has elapsed.
    Deferred { after: Duration, event: OutboundEvent },

    /// Nothing to deliver to the sender.
    Nothing,
}

/// Outbound delivery to registered connections.
///
/// Delivery to a connection that is closed or no longer registered is a
/// silent no-op reported through the return value, never an error.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    /// Send an event to one connection. Returns `false` if it was not delivered.
    fn emit_to(&self, connection_id: ConnectionId, event: OutboundEvent) -> bool;

    /// Send an acknowledgement reply to one connection.
    fn acknowledge(&self, connection_id: ConnectionId, ack: AckId, data: Value) -> bool;

    /// Send an event to every registered connection. Returns the number of
    /// connections that accepted it.
    fn broadcast(&self, event: OutboundEvent) -> usize;
}
