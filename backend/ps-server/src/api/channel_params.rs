use ps_core::ReplayCursor;

use serde::Deserialize;

/// Query parameters shared by the channel endpoints
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ChannelParams {
    pub id: Option<String>,
    /// Replay messages with a greater id
    pub last_event_id: Option<u64>,
    /// Replay the newest `n` messages
    pub backtrack: Option<usize>,
    /// Replay messages after this unix second (and `tag`, when given)
    pub since: Option<i64>,
    pub tag: Option<u32>,
}

impl ChannelParams {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Replay cursor requested in the query string, if any.
    ///
    /// `last_event_id` wins over `since`, which wins over `backtrack`.
    pub fn cursor(&self) -> Option<ReplayCursor> {
        if let Some(id) = self.last_event_id {
            return Some(ReplayCursor::AfterId(id));
        }
        if let Some(time) = self.since {
            return Some(ReplayCursor::Since {
                time,
                // Without a tag every message of that second counts as seen
                tag: self.tag.unwrap_or(u32::MAX),
            });
        }
        self.backtrack.map(ReplayCursor::Backtrack)
    }
}
