//! Infrastructure Layer
//!
//! Process-wide collaborators that are not part of the message flow itself:
//! - Prometheus metrics registry and recording helpers

pub mod metrics;
