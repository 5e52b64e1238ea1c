//! Prometheus Metrics Module
//!
//! Provides gateway-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Active WebSocket connection gauge
//! - Inbound events by name (unrecognized names are counted as "unknown")
//! - Outbound events by name
//! - Disconnects by reason

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::shared::error::AppError;

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active WebSocket connections gauge
pub static WEBSOCKET_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "websocket_connections_active",
            "Number of active WebSocket connections",
        )
        .namespace("realtime_gateway"),
    )
    .expect("Failed to create WEBSOCKET_CONNECTIONS_ACTIVE metric")
});

/// Inbound event counter by event name
pub static EVENTS_RECEIVED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("events_received_total", "Total number of inbound events")
            .namespace("realtime_gateway"),
        &["event"],
    )
    .expect("Failed to create EVENTS_RECEIVED_TOTAL metric")
});

/// Outbound event counter by event name, one per delivered copy
pub static EVENTS_EMITTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("events_emitted_total", "Total number of outbound events delivered")
            .namespace("realtime_gateway"),
        &["event"],
    )
    .expect("Failed to create EVENTS_EMITTED_TOTAL metric")
});

/// Disconnect counter by reason
pub static DISCONNECTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("disconnects_total", "Total number of closed sessions")
            .namespace("realtime_gateway"),
        &["reason"],
    )
    .expect("Failed to create DISCONNECTS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(WEBSOCKET_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register WEBSOCKET_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(EVENTS_RECEIVED_TOTAL.clone()))
        .expect("Failed to register EVENTS_RECEIVED_TOTAL");
    registry
        .register(Box::new(EVENTS_EMITTED_TOTAL.clone()))
        .expect("Failed to register EVENTS_EMITTED_TOTAL");
    registry
        .register(Box::new(DISCONNECTS_TOTAL.clone()))
        .expect("Failed to register DISCONNECTS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> Result<String, AppError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Internal(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer).map_err(|e| AppError::Internal(format!("Metrics not UTF-8: {}", e)))
}

/// Helper to update the WebSocket connection gauge
pub fn set_websocket_connections(connected: usize) {
    WEBSOCKET_CONNECTIONS_ACTIVE.set(connected as i64);
}

/// Helper to record an inbound event
pub fn record_event_received(event: &str) {
    EVENTS_RECEIVED_TOTAL.with_label_values(&[event]).inc();
}

/// Helper to record delivered outbound events
pub fn record_events_emitted(event: &str, count: usize) {
    EVENTS_EMITTED_TOTAL
        .with_label_values(&[event])
        .inc_by(count as u64);
}

/// Helper to record a closed session
pub fn record_disconnect(reason: &str) {
    DISCONNECTS_TOTAL.with_label_values(&[reason]).inc();
}
