//! Ingestion pipeline and observer fan-out for the notification buffer.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, warn};

use pulse_common::{Notification, NotificationBuffer};

/// Shared notification feed.
///
/// Parses incoming frames, enforces the dedup and newest-first invariants,
/// and republishes the buffer and its length to observers on every mutation.
/// Both channels replay the latest value to new subscribers. Mutations are
/// serialized under the buffer lock, and publication happens while the lock
/// is held, so observers always see mutation N before mutation N+1.
pub struct NotificationFeed {
    buffer: Mutex<NotificationBuffer>,
    buffer_tx: watch::Sender<Vec<Notification>>,
    buffer_rx: watch::Receiver<Vec<Notification>>,
    count_tx: watch::Sender<usize>,
    count_rx: watch::Receiver<usize>,
}

impl NotificationFeed {
    pub fn new(max_buffer_len: Option<usize>) -> Self {
        let (buffer_tx, buffer_rx) = watch::channel(Vec::new());
        let (count_tx, count_rx) = watch::channel(0);
        Self {
            buffer: Mutex::new(NotificationBuffer::new(max_buffer_len)),
            buffer_tx,
            buffer_rx,
            count_tx,
            count_rx,
        }
    }

    /// Ingest one raw text frame.
    ///
    /// Malformed payloads and structural duplicates are dropped without
    /// touching the buffer; a parse failure is never fatal to the
    /// connection.
    pub(crate) fn ingest(&self, text: &str) {
        let notification = match Notification::parse(text) {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, frame = %text, "Dropping unparseable frame");
                return;
            }
        };

        log_latency(&notification);

        let mut buffer = self.lock_buffer();
        if buffer.push(notification) {
            self.publish(&buffer);
        } else {
            debug!("Duplicate notification ignored");
        }
    }

    /// Dismiss the newest buffered notification. No-op on an empty buffer.
    pub fn consume_newest(&self) {
        let mut buffer = self.lock_buffer();
        if buffer.pop_newest().is_some() {
            self.publish(&buffer);
        }
    }

    /// Observe the ordered buffer. Replays the latest snapshot immediately.
    pub fn subscribe_buffer(&self) -> watch::Receiver<Vec<Notification>> {
        self.buffer_rx.clone()
    }

    /// Observe the buffer length. Replays the latest count immediately.
    pub fn subscribe_count(&self) -> watch::Receiver<usize> {
        self.count_rx.clone()
    }

    pub fn len(&self) -> usize {
        *self.count_rx.borrow()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_buffer(&self) -> std::sync::MutexGuard<'_, NotificationBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, buffer: &NotificationBuffer) {
        let _ = self.buffer_tx.send(buffer.snapshot());
        let _ = self.count_tx.send(buffer.len());
    }
}

/// Log receive latency when the payload carries a numeric epoch-ms
/// timestamp. Observability only; buffer state is unaffected.
fn log_latency(notification: &Notification) {
    match notification.timestamp_ms() {
        Some(sent_ms) => {
            let received_ms = chrono::Utc::now().timestamp_millis();
            debug!(latency_ms = received_ms - sent_ms, "Notification latency");
        }
        None => {
            if notification.payload().get("timestamp").is_some() {
                warn!("Invalid timestamp format on notification");
            }
        }
    }
}
