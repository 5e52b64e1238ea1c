//! Event Handlers
//!
//! The four stateless handlers bound to the recognized event names. None of
//! them inspects its payload.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::router::{EventHandler, HandlerContext};
use crate::domain::{EventName, OutboundEvent, Reply};

/// Fixed delay before an `async-message` is relayed back.
pub const ASYNC_MESSAGE_DELAY: Duration = Duration::from_millis(2000);

/// `echo`: answers with the payload through the acknowledgement channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

#[async_trait]
impl EventHandler for EchoHandler {
    async fn handle(&self, _ctx: &HandlerContext, payload: Value) -> Reply {
        Reply::Ack(payload)
    }
}

/// `message`: emits `message` back to the sender immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageHandler;

#[async_trait]
impl EventHandler for MessageHandler {
    async fn handle(&self, _ctx: &HandlerContext, payload: Value) -> Reply {
        Reply::Emit(OutboundEvent::new(EventName::Message, payload))
    }
}

/// `async-message`: emits `message` back to the sender after [`ASYNC_MESSAGE_DELAY`].
#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncMessageHandler;

#[async_trait]
impl EventHandler for AsyncMessageHandler {
    async fn handle(&self, _ctx: &HandlerContext, payload: Value) -> Reply {
        Reply::Deferred {
            after: ASYNC_MESSAGE_DELAY,
            event: OutboundEvent::new(EventName::Message, payload),
        }
    }
}

/// `broadcast`: emits `broadcast` to every connected client, sender included.
#[derive(Debug, Default, Clone, Copy)]
pub struct BroadcastHandler;

#[async_trait]
impl EventHandler for BroadcastHandler {
    async fn handle(&self, ctx: &HandlerContext, payload: Value) -> Reply {
        let recipients = ctx
            .sink
            .broadcast(OutboundEvent::new(EventName::Broadcast, payload));
        tracing::debug!(
            connection_id = %ctx.connection_id,
            recipients,
            "Broadcast delivered"
        );
        Reply::Nothing
    }
}
