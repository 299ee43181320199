//! Full configuration validation.
//!
//! Validates the stream endpoint scheme and all numeric ranges.

use crate::schema::PulseConfig;
use pulse_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &PulseConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    // Endpoint scheme
    if !config.stream.url.starts_with("ws://") && !config.stream.url.starts_with("wss://") {
        errors.push(format!(
            "stream.url must start with ws:// or wss:// (got '{}')",
            config.stream.url
        ));
    }

    // Timing constraints
    validate_range(
        &mut errors,
        "stream.reconnect_delay_ms",
        config.stream.reconnect_delay_ms,
        100,
        600_000,
    );
    validate_range(
        &mut errors,
        "stream.connect_timeout_secs",
        config.stream.connect_timeout_secs,
        1,
        300,
    );

    // Buffer bound (0 = unbounded is allowed)
    if config.stream.max_buffer_len > 100_000 {
        errors.push(format!(
            "stream.max_buffer_len must be at most 100000 (got {})",
            config.stream.max_buffer_len
        ));
    }

    // Log filter directive must be non-empty
    if config.log.filter.trim().is_empty() {
        errors.push("log.filter must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, field: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{field} must be between {min} and {max} (got {value})"));
    }
}
