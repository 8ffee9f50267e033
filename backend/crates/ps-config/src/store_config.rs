use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Channel id length constraints
pub const MIN_MAX_CHANNEL_ID_LENGTH: usize = 1;
pub const MAX_MAX_CHANNEL_ID_LENGTH: usize = 4096;
pub const DEFAULT_MAX_CHANNEL_ID_LENGTH: usize = 1024;

// Cleanup interval constraints (seconds)
pub const MIN_BUFFER_CLEANUP_INTERVAL_SECS: u64 = 1;
pub const MAX_BUFFER_CLEANUP_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_BUFFER_CLEANUP_INTERVAL_SECS: u64 = 5;

pub const DEFAULT_SHARED_MEMORY_SIZE: usize = 32 * 1024 * 1024;

/// Channel store limits. A zero limit means "unbounded" / "disabled".
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of channels (0 = unbounded)
    pub max_channels: usize,
    /// Maximum messages kept in a channel backlog (0 = unbounded)
    pub max_messages_stored_per_channel: usize,
    /// Message time-to-live in seconds (0 = never expires)
    pub message_ttl_secs: u64,
    /// Keep a backlog at all
    pub store_messages: bool,
    /// Longest accepted channel id
    pub max_channel_id_length: usize,
    /// Maximum subscribers attached to one channel (0 = unbounded)
    pub max_subscribers_per_channel: usize,
    /// Byte budget for channels and stored messages (0 = unbounded)
    pub shared_memory_size: usize,
    /// How often the cleanup task runs
    pub buffer_cleanup_interval_secs: u64,
    /// Remove empty channels idle this long (0 = never)
    pub channel_inactivity_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_channels: 0,
            max_messages_stored_per_channel: 0,
            message_ttl_secs: 0,
            store_messages: true,
            max_channel_id_length: DEFAULT_MAX_CHANNEL_ID_LENGTH,
            max_subscribers_per_channel: 0,
            shared_memory_size: DEFAULT_SHARED_MEMORY_SIZE,
            buffer_cleanup_interval_secs: DEFAULT_BUFFER_CLEANUP_INTERVAL_SECS,
            channel_inactivity_secs: 0,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_channel_id_length < MIN_MAX_CHANNEL_ID_LENGTH
            || self.max_channel_id_length > MAX_MAX_CHANNEL_ID_LENGTH
        {
            return Err(ConfigError::store(format!(
                "store.max_channel_id_length must be {}-{}, got {}",
                MIN_MAX_CHANNEL_ID_LENGTH, MAX_MAX_CHANNEL_ID_LENGTH, self.max_channel_id_length
            )));
        }

        if self.buffer_cleanup_interval_secs < MIN_BUFFER_CLEANUP_INTERVAL_SECS
            || self.buffer_cleanup_interval_secs > MAX_BUFFER_CLEANUP_INTERVAL_SECS
        {
            return Err(ConfigError::store(format!(
                "store.buffer_cleanup_interval_secs must be {}-{}, got {}",
                MIN_BUFFER_CLEANUP_INTERVAL_SECS,
                MAX_BUFFER_CLEANUP_INTERVAL_SECS,
                self.buffer_cleanup_interval_secs
            )));
        }

        if !self.store_messages
            && (self.max_messages_stored_per_channel > 0 || self.message_ttl_secs > 0)
        {
            log::warn!(
                "store.store_messages is disabled; max_messages_stored_per_channel and message_ttl_secs have no effect"
            );
        }

        Ok(())
    }
}
