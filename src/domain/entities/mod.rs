//! # Domain Entities
//!
//! - **InboundEvent**: a named event with payload received from a client
//! - **OutboundEvent**: a named event with payload delivered to clients
//! - **Reply**: what a handler asks the router to deliver
//!
//! The [`EventSink`] trait is the delivery contract handlers depend on. It is
//! implemented by the connection registry in the presentation layer.

mod event;

pub use event::{AckId, EventSink, InboundEvent, OutboundEvent, Reply};

#[cfg(test)]
pub use event::MockEventSink;
