/// Capacity limits enforced by the channel store. Zero means unbounded.
#[derive(Debug, Clone)]
pub struct StoreLimits {
    pub max_channels: usize,
    pub max_messages_stored_per_channel: usize,
    /// 0 = messages never expire
    pub message_ttl_secs: u64,
    /// When false no backlog is kept; messages are only broadcast live
    pub store_messages: bool,
    pub max_subscribers_per_channel: usize,
    /// Byte budget for channels and stored messages
    pub shared_memory_size: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_channels: 0,
            max_messages_stored_per_channel: 0,
            message_ttl_secs: 0,
            store_messages: true,
            max_subscribers_per_channel: 0,
            shared_memory_size: 0,
        }
    }
}
