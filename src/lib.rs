//! # Realtime Gateway Library
//!
//! A minimal real-time messaging endpoint over WebSocket. Clients send named
//! events with arbitrary JSON payloads and the gateway answers in one of four
//! ways:
//!
//! - `echo`: the payload comes back through the acknowledgement of the same call
//! - `message`: the payload comes back as a `message` event
//! - `async-message`: the payload comes back as a `message` event two seconds later
//! - `broadcast`: every connected client receives a `broadcast` event
//!
//! ## Module Structure
//!
//! ```text
//! realtime_gateway/
//! +-- config/         Configuration management
//! +-- domain/         Events, replies, connection ids, delivery trait
//! +-- application/    Event router and handlers
//! +-- infrastructure/ Prometheus metrics
//! +-- presentation/   WebSocket session loop, registry, HTTP routes
//! +-- shared/         Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core types
pub mod domain;

// Application layer - Routing and handlers
pub mod application;

// Infrastructure layer - Metrics
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
