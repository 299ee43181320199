//! Public handle for the notification stream client.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::warn;

use pulse_common::Notification;

use crate::connection::connection_loop;
use crate::feed::NotificationFeed;
use crate::types::{ConnectionState, StreamConfig};

/// Handle for the notification stream.
///
/// One instance per application: construct it once at startup and hand the
/// subscriptions to consumers. All methods are non-blocking; the connection
/// itself lives in a background task that keeps reconnecting on its own
/// until [`shutdown`](Self::shutdown) is called or the handle is dropped.
pub struct NotificationClient {
    feed: Arc<NotificationFeed>,
    outbound_tx: mpsc::Sender<serde_json::Value>,
    shutdown_tx: mpsc::Sender<()>,
    state_rx: watch::Receiver<ConnectionState>,
}

impl NotificationClient {
    /// Start the background connection and return the handle.
    pub fn connect(config: StreamConfig) -> Self {
        let feed = Arc::new(NotificationFeed::new(config.max_buffer_len));
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (outbound_tx, outbound_rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(connection_loop(
            config,
            Arc::clone(&feed),
            state_tx,
            outbound_rx,
            shutdown_rx,
        ));

        Self {
            feed,
            outbound_tx,
            shutdown_tx,
            state_rx,
        }
    }

    /// Observe the ordered notification buffer, newest first.
    ///
    /// Replays the latest snapshot to new subscribers immediately; every
    /// buffer mutation publishes a fresh immutable snapshot.
    pub fn subscribe_buffer(&self) -> watch::Receiver<Vec<Notification>> {
        self.feed.subscribe_buffer()
    }

    /// Observe the buffer length. Replays the latest count immediately.
    pub fn subscribe_count(&self) -> watch::Receiver<usize> {
        self.feed.subscribe_count()
    }

    /// Observe connection lifecycle transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Dismiss the newest notification. No-op when the buffer is empty.
    pub fn consume_newest(&self) {
        self.feed.consume_newest();
    }

    /// Serialize and transmit a message if the connection is open.
    ///
    /// Never returns an error to the caller; a send while disconnected is
    /// logged and dropped.
    pub async fn send(&self, payload: serde_json::Value) {
        if self.state() != ConnectionState::Open {
            warn!("Notification stream is not open, dropping outbound message");
            return;
        }
        let _ = self.outbound_tx.send(payload).await;
    }

    /// Tear down the connection and suppress any pending reconnect.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

#[cfg(test)]
mod tests;
