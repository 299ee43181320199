pub mod errors;
pub mod notification;

pub use errors::{ConfigError, PulseError};
pub use notification::{Notification, NotificationBuffer, DEFAULT_BUFFER_BOUND};

pub type Result<T> = std::result::Result<T, PulseError>;
