//! WebSocket Gateway Tests
//!
//! End-to-end tests over a real socket for the four event patterns and the
//! connection lifecycle.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use realtime_gateway::domain::DisconnectReason;
use realtime_gateway::presentation::websocket::{LifecycleEvent, ServerFrame};

use crate::common::{next_lifecycle, test_settings, TestApp};

/// Wait for the disconnect notification of one session and return its reason
async fn next_disconnect(
    rx: &mut tokio::sync::broadcast::Receiver<LifecycleEvent>,
) -> DisconnectReason {
    loop {
        if let LifecycleEvent::Disconnected(_, reason) = next_lifecycle(rx).await {
            return reason;
        }
    }
}

#[tokio::test]
async fn test_connect_and_disconnect() {
    let app = TestApp::spawn().await;
    let mut lifecycle = app.lifecycle();

    let client = app.connect().await;
    let connected = next_lifecycle(&mut lifecycle).await;
    let LifecycleEvent::Connected(id) = connected else {
        panic!("expected a connect notification, got {:?}", connected);
    };

    let unread = client.disconnect().await;
    assert!(unread.is_empty(), "unexpected frames: {:?}", unread);

    assert_eq!(
        next_lifecycle(&mut lifecycle).await,
        LifecycleEvent::Disconnected(id, DisconnectReason::ClientDisconnect)
    );
    app.wait_for_connections(0).await;
    app.shutdown().await;
}

#[tokio::test]
async fn test_echo_in_acknowledgement() {
    let app = TestApp::spawn().await;
    let mut lifecycle = app.lifecycle();
    let mut client = app.connect().await;

    let payloads = [
        json!("Test"),
        json!(""),
        Value::Null,
        json!(42),
        json!([1, "two", {"three": 3}]),
        json!({"nested": {"deep": [null, true]}}),
    ];
    for payload in payloads {
        let ack = client.emit_with_ack("echo", payload.clone()).await;
        assert_eq!(ack, payload);
    }

    client.disconnect().await;
    assert_eq!(next_disconnect(&mut lifecycle).await, DisconnectReason::ClientDisconnect);
    app.shutdown().await;
}

#[tokio::test]
async fn test_echo_with_absent_payload_acknowledges_null() {
    let app = TestApp::spawn().await;
    let mut client = app.connect().await;

    client.send_text(r#"{"event":"echo","ack":500}"#).await;
    assert_eq!(client.wait_for_ack(500).await, Value::Null);

    client.disconnect().await;
    app.shutdown().await;
}

#[tokio::test]
async fn test_emit_message_on_message() {
    let app = TestApp::spawn().await;
    let mut lifecycle = app.lifecycle();
    let mut client = app.connect().await;

    let started = Instant::now();
    client.emit("message", json!("Test")).await;
    let data = client.next_event("message").await;

    assert_eq!(data, json!("Test"));
    assert!(
        started.elapsed() < Duration::from_millis(1000),
        "message took {:?}",
        started.elapsed()
    );

    // Exactly one copy
    assert_eq!(client.try_next_event("message", Duration::from_millis(200)).await, None);

    client.disconnect().await;
    assert_eq!(next_disconnect(&mut lifecycle).await, DisconnectReason::ClientDisconnect);
    app.shutdown().await;
}

#[tokio::test]
async fn test_emit_message_on_async_message() {
    let app = TestApp::spawn().await;
    let mut lifecycle = app.lifecycle();
    let mut client = app.connect().await;

    let started = Instant::now();
    client.emit("async-message", json!({"text": "Test"})).await;
    let data = client.next_event("message").await;
    let elapsed = started.elapsed();

    assert_eq!(data, json!({"text": "Test"}));
    assert!(elapsed >= Duration::from_millis(2000), "arrived early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(4000), "arrived late: {:?}", elapsed);

    client.disconnect().await;
    assert_eq!(next_disconnect(&mut lifecycle).await, DisconnectReason::ClientDisconnect);
    app.shutdown().await;
}

#[tokio::test]
async fn test_pending_async_message_does_not_block_connection() {
    let app = TestApp::spawn().await;
    let mut client = app.connect().await;

    client.emit("async-message", json!("slow")).await;
    client.emit("message", json!("fast")).await;

    assert_eq!(client.next_event("message").await, json!("fast"));
    assert_eq!(client.emit_with_ack("echo", json!("still here")).await, json!("still here"));
    assert_eq!(client.next_event("message").await, json!("slow"));

    client.disconnect().await;
    app.shutdown().await;
}

#[tokio::test]
async fn test_broadcast_with_two_clients() {
    let app = TestApp::spawn().await;
    let mut lifecycle = app.lifecycle();

    let mut first = app.connect().await;
    let mut second = app.connect().await;
    app.wait_for_connections(2).await;

    first.emit("broadcast", json!("Test")).await;

    assert_eq!(first.next_event("broadcast").await, json!("Test"));
    assert_eq!(second.next_event("broadcast").await, json!("Test"));

    first.disconnect().await;
    second.disconnect().await;

    let mut reasons = Vec::new();
    while reasons.len() < 2 {
        reasons.push(next_disconnect(&mut lifecycle).await);
    }
    assert_eq!(
        reasons,
        vec![DisconnectReason::ClientDisconnect, DisconnectReason::ClientDisconnect]
    );
    app.shutdown().await;
}

#[tokio::test]
async fn test_broadcast_reaches_every_client_exactly_once() {
    let app = TestApp::spawn().await;

    let mut clients = Vec::new();
    for _ in 0..5 {
        clients.push(app.connect().await);
    }
    app.wait_for_connections(5).await;

    let payload = json!({"room": "all", "n": [1, 2, 3]});
    clients[2].emit("broadcast", payload.clone()).await;

    for client in clients.iter_mut() {
        assert_eq!(client.next_event("broadcast").await, payload);
    }
    for client in clients.iter_mut() {
        assert_eq!(client.try_next_event("broadcast", Duration::from_millis(100)).await, None);
    }

    for client in clients {
        client.disconnect().await;
    }
    app.wait_for_connections(0).await;
    app.shutdown().await;
}

#[tokio::test]
async fn test_disconnect_with_pending_async_message() {
    let app = TestApp::spawn().await;
    let mut lifecycle = app.lifecycle();

    let mut leaving = app.connect().await;
    let mut staying = app.connect().await;
    app.wait_for_connections(2).await;

    leaving.emit("async-message", json!("orphan")).await;
    // Make sure the event was dispatched before leaving
    assert_eq!(leaving.emit_with_ack("echo", json!(1)).await, json!(1));
    leaving.disconnect().await;
    app.wait_for_connections(1).await;

    tokio::time::sleep(Duration::from_millis(2300)).await;

    // The timer fired into a closed connection; the other client is unaffected
    assert_eq!(staying.try_next_event("message", Duration::from_millis(100)).await, None);
    assert_eq!(staying.emit_with_ack("echo", json!("ok")).await, json!("ok"));
    staying.emit("broadcast", json!("still up")).await;
    assert_eq!(staying.next_event("broadcast").await, json!("still up"));
    assert_eq!(app.registry.connection_count(), 1);

    staying.disconnect().await;
    let mut reasons = Vec::new();
    while reasons.len() < 2 {
        reasons.push(next_disconnect(&mut lifecycle).await);
    }
    assert!(reasons.iter().all(|r| *r == DisconnectReason::ClientDisconnect));
    app.shutdown().await;
}

#[tokio::test]
async fn test_unknown_and_malformed_frames_are_ignored() {
    let app = TestApp::spawn().await;
    let mut client = app.connect().await;

    client.send_text(r#"{"event":"join-room","data":"lobby","ack":99}"#).await;
    client.send_text("this is not json").await;
    client.send_text(r#"{"data":"no event name"}"#).await;

    let ack = client.emit_with_ack("echo", json!("alive")).await;
    assert_eq!(ack, json!("alive"));

    let unread = client.disconnect().await;
    assert!(unread.is_empty(), "unexpected frames: {:?}", unread);
    app.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_closes_sessions() {
    let app = TestApp::spawn().await;
    let mut lifecycle = app.lifecycle();
    let mut client = app.connect().await;
    app.wait_for_connections(1).await;

    let registry = app.registry.clone();
    app.shutdown().await;

    client.wait_for_close().await;
    assert!(client.closed_by_server());
    assert_eq!(next_disconnect(&mut lifecycle).await, DisconnectReason::ServerShutdown);
    assert_eq!(registry.connection_count(), 0);
}

#[tokio::test]
async fn test_echo_preserves_key_order_and_precision() {
    let app = TestApp::spawn().await;
    let mut client = app.connect().await;

    let payload = r#"{"zeta":1,"alpha":{"y":true,"x":null},"big":123456789012345678901234567890,"f":1.50}"#;
    client
        .send_text(format!(r#"{{"event":"echo","data":{},"ack":7}}"#, payload))
        .await;

    let ack = client.wait_for_ack(7).await;
    assert_eq!(ack.to_string(), payload);

    client.disconnect().await;
    app.shutdown().await;
}

#[tokio::test]
async fn test_message_just_under_size_limit_is_echoed() {
    let limit = test_settings().websocket.max_message_size;
    let app = TestApp::spawn().await;
    let mut client = app.connect().await;

    // Leave room for the envelope around the payload
    let payload = Value::String("x".repeat(limit - 64));
    let ack = client.emit_with_ack("echo", payload.clone()).await;
    assert_eq!(ack, payload);

    client.disconnect().await;
    app.shutdown().await;
}

#[tokio::test]
async fn test_message_over_size_limit_is_rejected_by_transport() {
    let limit = test_settings().websocket.max_message_size;
    let app = TestApp::spawn().await;
    let mut lifecycle = app.lifecycle();
    let mut oversized = app.connect().await;

    oversized
        .send_text(json!({"event": "echo", "data": "x".repeat(limit), "ack": 1}).to_string())
        .await;

    assert_eq!(next_disconnect(&mut lifecycle).await, DisconnectReason::TransportError);
    let unread = oversized.wait_for_close().await;
    assert!(
        !unread.iter().any(|f| matches!(f, ServerFrame::Ack { .. })),
        "oversized call was answered: {:?}",
        unread
    );

    // Other sessions are unaffected
    let mut client = app.connect().await;
    assert_eq!(client.emit_with_ack("echo", json!("ok")).await, json!("ok"));
    client.disconnect().await;
    app.shutdown().await;
}
