//! WebSocket Gateway
//!
//! Real-time communication via WebSocket connections.

pub mod handler;
pub mod messages;
pub mod registry;
pub mod session;

pub use handler::ws_handler;
pub use messages::{ClientFrame, ServerFrame};
pub use registry::{ConnectionRegistry, LifecycleEvent};
pub use session::{Connection, Outbound};
