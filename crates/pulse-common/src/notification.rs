use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default bound applied to [`NotificationBuffer`] when none is configured.
pub const DEFAULT_BUFFER_BOUND: usize = 512;

/// A single server-pushed notification.
///
/// The payload is an opaque, server-defined JSON value; no unique identifier
/// is assumed. Equality is deep structural equality on the payload, with
/// object key order ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notification {
    payload: Value,
}

impl Notification {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Parse one raw text frame as a notification payload.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(|payload| Self { payload })
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The human-readable `message` field, if the server sent one.
    pub fn message(&self) -> Option<&str> {
        self.payload.get("message").and_then(Value::as_str)
    }

    /// The `timestamp` field as epoch milliseconds.
    ///
    /// The server sends either a JSON number or a numeric string; anything
    /// else yields `None`.
    pub fn timestamp_ms(&self) -> Option<i64> {
        match self.payload.get("timestamp")? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            _ => None,
        }
    }
}

/// Ordered buffer of notifications, newest first.
///
/// Invariant: no two entries are structurally equal. An optional bound
/// evicts the oldest entry on overflow; `None` leaves growth unbounded.
#[derive(Debug)]
pub struct NotificationBuffer {
    items: VecDeque<Notification>,
    max_len: Option<usize>,
}

impl NotificationBuffer {
    pub fn new(max_len: Option<usize>) -> Self {
        Self {
            items: VecDeque::new(),
            max_len,
        }
    }

    /// Insert at the front unless a structurally equal entry is already
    /// buffered. Returns `true` if the buffer changed.
    pub fn push(&mut self, notification: Notification) -> bool {
        if self.items.iter().any(|existing| existing == &notification) {
            return false;
        }
        self.items.push_front(notification);
        if let Some(max) = self.max_len {
            while self.items.len() > max {
                self.items.pop_back();
            }
        }
        true
    }

    /// Remove and return the newest entry, or `None` on an empty buffer.
    pub fn pop_newest(&mut self) -> Option<Notification> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clone the current contents, newest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.items.iter().cloned().collect()
    }
}

impl Default for NotificationBuffer {
    fn default() -> Self {
        Self::new(Some(DEFAULT_BUFFER_BOUND))
    }
}
