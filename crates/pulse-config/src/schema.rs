//! Configuration schema types for Pulse.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with sensible defaults.

use serde::{Deserialize, Serialize};

use pulse_common::DEFAULT_BUFFER_BOUND;

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

// =============================================================================
// Stream Config
// =============================================================================

/// Notification stream connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSection {
    /// WebSocket endpoint of the notification stream (`ws://` or `wss://`).
    pub url: String,
    /// Fixed delay between reconnection attempts, in milliseconds.
    pub reconnect_delay_ms: u64,
    /// Handshake timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum number of buffered notifications; 0 disables the bound.
    pub max_buffer_len: usize,
}

impl Default for StreamSection {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8000/ws/notifications/".into(),
            reconnect_delay_ms: 5000,
            connect_timeout_secs: 15,
            max_buffer_len: DEFAULT_BUFFER_BOUND,
        }
    }
}

// =============================================================================
// Log Config
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default `tracing` filter directive.
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "pulse=info".into(),
        }
    }
}

// =============================================================================
// Top-level Config
// =============================================================================

/// Top-level Pulse configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub stream: StreamSection,
    pub log: LogSection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_endpoint() {
        let config = PulseConfig::default();
        assert_eq!(config.stream.url, "ws://127.0.0.1:8000/ws/notifications/");
        assert_eq!(config.stream.reconnect_delay_ms, 5000);
        assert_eq!(config.log.filter, "pulse=info");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: PulseConfig = toml::from_str(
            r#"
            [stream]
            url = "wss://example.com/ws/"
            "#,
        )
        .unwrap();
        assert_eq!(config.stream.url, "wss://example.com/ws/");
        assert_eq!(config.stream.reconnect_delay_ms, 5000);
        assert_eq!(config.stream.max_buffer_len, 512);
    }
}
