//! Pulse configuration system.
//!
//! Provides TOML-based configuration for the notification stream client and
//! its host application. All config sections use serde defaults so partial
//! configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! let config = pulse_config::load_config().expect("failed to load config");
//! println!("stream endpoint: {}", config.stream.url);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

// Re-export core types for convenience
pub use schema::{LogSection, PulseConfig, StreamSection, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{default_config_path, load_from_path};

use pulse_common::ConfigError;

/// Convenience function to load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creating a commented
/// default file if none exists, and validates the result.
pub fn load_config() -> Result<PulseConfig, ConfigError> {
    toml_loader::load_default()
}
