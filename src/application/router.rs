//! Event Router
//!
//! Maps event names to handlers and applies the handler's [`Reply`].
//!
//! The table is built once at startup and only read afterwards. Unknown
//! event names are ignored; there is no routing error.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::handlers::{AsyncMessageHandler, BroadcastHandler, EchoHandler, MessageHandler};
use crate::domain::{ConnectionId, EventName, EventSink, InboundEvent, Reply};
use crate::infrastructure::metrics;

/// Per-call context handed to handlers.
#[derive(Clone)]
pub struct HandlerContext {
    /// The connection the event arrived on
    pub connection_id: ConnectionId,

    /// Outbound delivery to registered connections
    pub sink: Arc<dyn EventSink>,
}

impl HandlerContext {
    pub fn new(connection_id: ConnectionId, sink: Arc<dyn EventSink>) -> Self {
        Self {
            connection_id,
            sink,
        }
    }
}

/// Trait implemented by every event handler.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one inbound payload.
    async fn handle(&self, ctx: &HandlerContext, payload: Value) -> Reply;
}

/// What happened to one inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No handler is bound to the event name.
    Ignored,
    /// The reply went out through the acknowledgement channel.
    Acknowledged,
    /// The handler replied for the ack channel but the call carried no ack id.
    AckDropped,
    /// An event was emitted back to the sender.
    Emitted,
    /// An event was scheduled for later delivery to the sender.
    Scheduled,
    /// The handler ran and had nothing to deliver to the sender.
    Completed,
}

/// Dispatch table from event name to handler.
pub struct EventRouter {
    handlers: HashMap<EventName, Arc<dyn EventHandler>>,
}

impl EventRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Router with the echo, message, async-message and broadcast handlers bound.
    pub fn with_default_handlers() -> Self {
        let mut router = Self::new();
        router.register(EventName::Echo, EchoHandler);
        router.register(EventName::Message, MessageHandler);
        router.register(EventName::AsyncMessage, AsyncMessageHandler);
        router.register(EventName::Broadcast, BroadcastHandler);
        router
    }

    /// Bind a handler to an event name, replacing any previous binding.
    pub fn register(&mut self, name: EventName, handler: impl EventHandler + 'static) {
        let _ = self.handlers.insert(name, Arc::new(handler));
    }

    /// Check whether an event name has a handler.
    pub fn has_handler(&self, name: EventName) -> bool {
        self.handlers.contains_key(&name)
    }

    /// Run the handler bound to the event and deliver its reply.
    ///
    /// Deferred replies are handed to a timer task; this call never waits
    /// for them.
    pub async fn dispatch(&self, ctx: &HandlerContext, event: InboundEvent) -> DispatchOutcome {
        let handler = event
            .event_name()
            .and_then(|name| self.handlers.get(&name).map(|h| (name, Arc::clone(h))));

        let Some((name, handler)) = handler else {
            metrics::record_event_received("unknown");
            tracing::debug!(
                connection_id = %ctx.connection_id,
                event = %event.name,
                "Ignoring unrecognized event"
            );
            return DispatchOutcome::Ignored;
        };

        metrics::record_event_received(name.as_str());
        tracing::trace!(connection_id = %ctx.connection_id, event = %name, "Dispatching event");

        match handler.handle(ctx, event.payload).await {
            Reply::Ack(data) => match event.ack {
                Some(ack) => {
                    ctx.sink.acknowledge(ctx.connection_id, ack, data);
                    DispatchOutcome::Acknowledged
                }
                None => {
                    tracing::debug!(
                        connection_id = %ctx.connection_id,
                        event = %name,
                        "No acknowledgement requested, dropping reply"
                    );
                    DispatchOutcome::AckDropped
                }
            },
            Reply::Emit(outbound) => {
                ctx.sink.emit_to(ctx.connection_id, outbound);
                DispatchOutcome::Emitted
            }
            Reply::Deferred { after, event: outbound } => {
                let sink = Arc::clone(&ctx.sink);
                let connection_id = ctx.connection_id;
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    if !sink.emit_to(connection_id, outbound) {
                        tracing::debug!(
                            connection_id = %connection_id,
                            "Connection gone before deferred emit, discarding"
                        );
                    }
                });
                DispatchOutcome::Scheduled
            }
            Reply::Nothing => DispatchOutcome::Completed,
        }
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::with_default_handlers()
    }
}
