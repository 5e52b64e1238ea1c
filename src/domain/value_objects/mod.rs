//! # Value Objects
//!
//! Small immutable types shared by every layer.
//!
//! - **ConnectionId**: identity of one live client session
//! - **EventName**: the enumerated set of routable event names
//! - **DisconnectReason**: why a session ended

mod connection_id;
mod disconnect_reason;
mod event_name;

pub use connection_id::ConnectionId;
pub use disconnect_reason::DisconnectReason;
pub use event_name::EventName;
