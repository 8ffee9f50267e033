use serde::Serialize;

/// Store-wide counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    /// Snapshot time, unix seconds
    pub time: i64,
    pub channels: usize,
    pub stored_messages: usize,
    pub published_messages: u64,
    pub subscribers: usize,
    pub uptime_secs: i64,
}

/// Per-channel counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub channel: String,
    pub published_messages: u64,
    pub stored_messages: usize,
    pub subscribers: usize,
    pub created_at: i64,
    pub last_activity_at: i64,
}
