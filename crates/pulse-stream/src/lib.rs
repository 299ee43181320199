//! Real-time notification stream client.
//!
//! Maintains a persistent WebSocket connection to the notification endpoint
//! using `tokio-tungstenite`, deduplicates and buffers incoming payloads
//! newest-first, and republishes the buffer and its length to any number of
//! observers with replay-latest semantics. Connection loss is recovered
//! with a fixed-delay retry loop that runs until explicit shutdown.

mod client;
mod connection;
mod feed;
mod types;

pub use client::NotificationClient;
pub use pulse_common::Notification;
pub use types::{ConnectionState, StreamConfig};
