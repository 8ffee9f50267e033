use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Send buffer size constraints
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 256;

// Heartbeat interval constraints (seconds)
pub const MIN_HEARTBEAT_INTERVAL_SECS: u64 = 5;
pub const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

// Long-polling wait constraints (seconds)
pub const MIN_LONGPOLLING_TIMEOUT_SECS: u64 = 1;
pub const MAX_LONGPOLLING_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_LONGPOLLING_TIMEOUT_SECS: u64 = 30;

/// Subscriber connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubscriberConfig {
    /// Per-subscriber queue size; a full queue drops messages for that subscriber only
    pub send_buffer_size: usize,
    /// WebSocket ping interval in seconds
    pub heartbeat_interval_secs: u64,
    /// How long a long-polling request waits for a message
    pub longpolling_timeout_secs: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            longpolling_timeout_secs: DEFAULT_LONGPOLLING_TIMEOUT_SECS,
        }
    }
}

impl SubscriberConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.send_buffer_size < MIN_SEND_BUFFER_SIZE
            || self.send_buffer_size > MAX_SEND_BUFFER_SIZE
        {
            return Err(ConfigError::subscriber(format!(
                "subscriber.send_buffer_size must be {}-{}, got {}",
                MIN_SEND_BUFFER_SIZE, MAX_SEND_BUFFER_SIZE, self.send_buffer_size
            )));
        }

        if self.heartbeat_interval_secs < MIN_HEARTBEAT_INTERVAL_SECS
            || self.heartbeat_interval_secs > MAX_HEARTBEAT_INTERVAL_SECS
        {
            return Err(ConfigError::subscriber(format!(
                "subscriber.heartbeat_interval_secs must be {}-{}, got {}",
                MIN_HEARTBEAT_INTERVAL_SECS,
                MAX_HEARTBEAT_INTERVAL_SECS,
                self.heartbeat_interval_secs
            )));
        }

        if self.longpolling_timeout_secs < MIN_LONGPOLLING_TIMEOUT_SECS
            || self.longpolling_timeout_secs > MAX_LONGPOLLING_TIMEOUT_SECS
        {
            return Err(ConfigError::subscriber(format!(
                "subscriber.longpolling_timeout_secs must be {}-{}, got {}",
                MIN_LONGPOLLING_TIMEOUT_SECS,
                MAX_LONGPOLLING_TIMEOUT_SECS,
                self.longpolling_timeout_secs
            )));
        }

        Ok(())
    }
}
