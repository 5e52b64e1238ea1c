//! Presentation Layer
//!
//! The WebSocket session loop and connection registry, plus the HTTP
//! routes for health and metrics.

pub mod http;
pub mod middleware;
pub mod websocket;
