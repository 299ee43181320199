//! Configuration and connection state for the stream client.

use std::time::Duration;

use pulse_common::DEFAULT_BUFFER_BOUND;

/// Configuration for the notification stream connection.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// WebSocket endpoint (`ws://` or `wss://`).
    pub url: String,
    /// Fixed delay between reconnection attempts.
    pub reconnect_delay: Duration,
    /// Handshake timeout.
    pub connect_timeout: Duration,
    /// Buffer bound; `None` leaves growth unbounded.
    pub max_buffer_len: Option<usize>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8000/ws/notifications/".to_string(),
            reconnect_delay: Duration::from_millis(5000),
            connect_timeout: Duration::from_secs(15),
            max_buffer_len: Some(DEFAULT_BUFFER_BOUND),
        }
    }
}

/// Lifecycle state of the WebSocket connection.
///
/// Owned by the connection task; consumers observe it read-only through
/// [`NotificationClient::subscribe_state`](crate::NotificationClient::subscribe_state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
