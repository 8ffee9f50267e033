use ps_core::{ChannelStats, StatsSummary};

use serde::Serialize;

/// Channel counters returned by the publisher endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelInfo {
    pub channel: String,
    pub published_messages: u64,
    pub stored_messages: usize,
    pub subscribers: usize,
}

impl From<ChannelStats> for ChannelInfo {
    fn from(stats: ChannelStats) -> Self {
        Self {
            channel: stats.channel,
            published_messages: stats.published_messages,
            stored_messages: stats.stored_messages,
            subscribers: stats.subscribers,
        }
    }
}

/// Detailed statistics for a set of channels
#[derive(Debug, Clone, Serialize)]
pub struct DetailedStatsResponse {
    pub time: i64,
    pub channels: usize,
    pub infos: Vec<ChannelStats>,
}

/// Summarized statistics for the whole store
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStatsResponse {
    #[serde(flatten)]
    pub summary: StatsSummary,
    pub memory_used: usize,
}
