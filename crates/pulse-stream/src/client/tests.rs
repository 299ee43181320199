//! Integration tests driving the client against a local WebSocket server.

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use super::*;

fn test_config(port: u16) -> StreamConfig {
    StreamConfig {
        url: format!("ws://127.0.0.1:{port}/ws/notifications/"),
        reconnect_delay: Duration::from_millis(300),
        connect_timeout: Duration::from_secs(5),
        max_buffer_len: Some(512),
    }
}

async fn bind() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

async fn accept_ws(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = listener.accept().await.unwrap();
    tokio_tungstenite::accept_async(stream).await.unwrap()
}

async fn wait_for_state(rx: &mut watch::Receiver<ConnectionState>, want: ConnectionState) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while *rx.borrow_and_update() != want {
            rx.changed().await.unwrap();
        }
    })
    .await
    .unwrap_or_else(|_| panic!("state never reached {want}"));
}

async fn wait_for_count(rx: &mut watch::Receiver<usize>, want: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while *rx.borrow_and_update() != want {
            rx.changed().await.unwrap();
        }
    })
    .await
    .unwrap_or_else(|_| panic!("count never reached {want}"));
}

fn text_frame(value: serde_json::Value) -> Message {
    Message::Text(value.to_string().into())
}

#[tokio::test]
async fn delivers_frames_newest_first_with_dedup() {
    let (listener, port) = bind().await;
    let client = NotificationClient::connect(test_config(port));
    let mut ws = accept_ws(&listener).await;

    ws.send(text_frame(json!({"id": "a"}))).await.unwrap();
    ws.send(text_frame(json!({"id": "a"}))).await.unwrap();
    ws.send(text_frame(json!({"id": "b"}))).await.unwrap();

    let mut count_rx = client.subscribe_count();
    wait_for_count(&mut count_rx, 2).await;

    let buffer = client.subscribe_buffer().borrow().clone();
    assert_eq!(buffer.len(), 2);
    assert_eq!(buffer[0].payload()["id"], "b");
    assert_eq!(buffer[1].payload()["id"], "a");

    client.shutdown().await;
}

#[tokio::test]
async fn malformed_frame_is_dropped_and_stream_continues() {
    let (listener, port) = bind().await;
    let client = NotificationClient::connect(test_config(port));
    let mut ws = accept_ws(&listener).await;

    ws.send(Message::Text("{not json".to_string().into()))
        .await
        .unwrap();
    ws.send(text_frame(json!({"id": "x"}))).await.unwrap();

    let mut count_rx = client.subscribe_count();
    wait_for_count(&mut count_rx, 1).await;

    let buffer = client.subscribe_buffer().borrow().clone();
    assert_eq!(buffer[0].payload()["id"], "x");

    client.shutdown().await;
}

#[tokio::test]
async fn consume_newest_is_observable_over_the_wire() {
    let (listener, port) = bind().await;
    let client = NotificationClient::connect(test_config(port));
    let mut ws = accept_ws(&listener).await;

    ws.send(text_frame(json!({"id": "a"}))).await.unwrap();
    ws.send(text_frame(json!({"id": "b"}))).await.unwrap();

    let mut count_rx = client.subscribe_count();
    wait_for_count(&mut count_rx, 2).await;

    client.consume_newest();
    wait_for_count(&mut count_rx, 1).await;
    assert_eq!(
        client.subscribe_buffer().borrow()[0].payload()["id"],
        "a"
    );

    // Dismissing past empty never errors.
    client.consume_newest();
    client.consume_newest();
    wait_for_count(&mut count_rx, 0).await;

    client.shutdown().await;
}

#[tokio::test]
async fn reconnects_no_earlier_than_the_configured_delay() {
    let (listener, port) = bind().await;
    let client = NotificationClient::connect(test_config(port));
    let mut state_rx = client.subscribe_state();

    let ws = accept_ws(&listener).await;
    wait_for_state(&mut state_rx, ConnectionState::Open).await;

    let closed_at = Instant::now();
    drop(ws);

    // The next accept is the single scheduled reconnect attempt.
    let ws2 = tokio::time::timeout(Duration::from_secs(5), accept_ws(&listener))
        .await
        .expect("client never reconnected");
    let elapsed = closed_at.elapsed();
    assert!(
        elapsed >= Duration::from_millis(300),
        "reconnected after {elapsed:?}, earlier than the configured delay"
    );

    wait_for_state(&mut state_rx, ConnectionState::Open).await;
    drop(ws2);
    client.shutdown().await;
}

#[tokio::test]
async fn shutdown_cancels_a_pending_reconnect() {
    let (listener, port) = bind().await;
    let mut config = test_config(port);
    config.reconnect_delay = Duration::from_millis(500);
    let client = NotificationClient::connect(config);
    let mut state_rx = client.subscribe_state();

    let ws = accept_ws(&listener).await;
    wait_for_state(&mut state_rx, ConnectionState::Open).await;
    drop(ws);

    // Shut down while the reconnect timer is pending.
    wait_for_state(&mut state_rx, ConnectionState::Closed).await;
    client.shutdown().await;

    let attempt = tokio::time::timeout(Duration::from_millis(1500), listener.accept()).await;
    assert!(attempt.is_err(), "connection attempt fired after shutdown");
}

#[tokio::test]
async fn send_transmits_when_open_and_drops_when_closed() {
    let (listener, port) = bind().await;
    let client = NotificationClient::connect(test_config(port));
    let mut ws = accept_ws(&listener).await;
    let mut state_rx = client.subscribe_state();
    wait_for_state(&mut state_rx, ConnectionState::Open).await;

    client.send(json!({"ack": true})).await;

    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = frame.into_text().unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&text).unwrap(),
        json!({"ack": true})
    );

    client.shutdown().await;
    wait_for_state(&mut state_rx, ConnectionState::Closed).await;

    // Silently dropped; no error surfaces to the caller.
    client.send(json!({"ack": false})).await;
}

#[tokio::test]
async fn state_starts_connecting_then_opens() {
    let (listener, port) = bind().await;
    let client = NotificationClient::connect(test_config(port));
    let mut state_rx = client.subscribe_state();

    assert_ne!(*state_rx.borrow(), ConnectionState::Closed);

    let _ws = accept_ws(&listener).await;
    wait_for_state(&mut state_rx, ConnectionState::Open).await;
    assert_eq!(client.state(), ConnectionState::Open);

    client.shutdown().await;
    wait_for_state(&mut state_rx, ConnectionState::Closed).await;
}
