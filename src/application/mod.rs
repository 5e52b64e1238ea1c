//! Application Layer
//!
//! Event routing and the handlers bound to each event name.
//!
//! ## Handlers
//!
//! - **echo**: reply through the acknowledgement channel
//! - **message**: emit `message` back to the sender
//! - **async-message**: emit `message` back to the sender after two seconds
//! - **broadcast**: emit `broadcast` to every connected client

pub mod handlers;
pub mod router;

pub use handlers::{
    AsyncMessageHandler, BroadcastHandler, EchoHandler, MessageHandler, ASYNC_MESSAGE_DELAY,
};
pub use router::{DispatchOutcome, EventHandler, EventRouter, HandlerContext};
