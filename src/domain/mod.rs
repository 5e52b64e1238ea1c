//! # Domain Layer
//!
//! Core types of the gateway, independent of the transport.
//!
//! ## Structure
//!
//! - **entities**: inbound/outbound events, handler replies, the delivery trait
//! - **value_objects**: connection ids, event names, disconnect reasons
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Payloads are opaque JSON values, passed through unmodified
//! - Delivery is expressed as a trait so handlers can be tested in isolation

pub mod entities;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
