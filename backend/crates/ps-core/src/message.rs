use bytes::Bytes;
use serde::Serialize;

/// Fixed bookkeeping cost charged per stored message, on top of payload and event bytes
pub const MESSAGE_OVERHEAD: usize = std::mem::size_of::<Message>();

/// A published message. Immutable once admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Per-channel sequence number, starting at 1
    pub id: u64,
    /// Disambiguates messages published within the same second
    pub tag: u32,
    /// Event name from the publish request
    pub event: Option<String>,
    #[serde(skip)]
    pub payload: Bytes,
    /// Creation time, unix seconds
    pub time: i64,
    /// Expiration time, unix seconds; None = never
    pub expires: Option<i64>,
}

impl Message {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Bytes charged against the store's memory budget
    pub fn footprint(&self) -> usize {
        Self::footprint_for(&self.payload, self.event.as_deref())
    }

    pub fn footprint_for(payload: &Bytes, event: Option<&str>) -> usize {
        MESSAGE_OVERHEAD + payload.len() + event.map_or(0, str::len)
    }

    /// True when this message was published strictly after the `(time, tag)` cursor
    pub fn is_after(&self, time: i64, tag: u32) -> bool {
        self.time > time || (self.time == time && self.tag > tag)
    }

    /// Payload as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}
