use metrics::{counter, gauge};

/// Metrics collector for store operations
#[derive(Debug, Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            prefix: "push_stream",
        }
    }

    pub fn channel_created(&self) {
        counter!(format!("{}.channels.created", self.prefix)).increment(1);
        gauge!(format!("{}.channels.active", self.prefix)).increment(1.0);
    }

    pub fn channel_deleted(&self, reason: &str) {
        counter!(format!("{}.channels.deleted", self.prefix)).increment(1);
        counter!(format!("{}.channels.deleted.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.channels.active", self.prefix)).decrement(1.0);
    }

    pub fn message_published(&self, payload_len: usize) {
        counter!(format!("{}.messages.published", self.prefix)).increment(1);
        counter!(format!("{}.messages.published_bytes", self.prefix))
            .increment(payload_len as u64);
    }

    /// Record backlog evictions by reason ("count" or "expired")
    pub fn messages_evicted(&self, reason: &str, count: usize) {
        if count == 0 {
            return;
        }
        counter!(format!("{}.messages.evicted.{}", self.prefix, reason)).increment(count as u64);
    }

    pub fn broadcast_published(&self, delivered: usize) {
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.delivered", self.prefix)).increment(delivered as u64);
    }

    pub fn sink_dropped(&self, reason: &str) {
        counter!(format!("{}.broadcast.dropped.{}", self.prefix, reason)).increment(1);
    }

    pub fn subscriber_changed(&self, action: &str) {
        counter!(format!("{}.subscribers.{}", self.prefix, action)).increment(1);
        match action {
            "attached" => gauge!(format!("{}.subscribers.active", self.prefix)).increment(1.0),
            "detached" => gauge!(format!("{}.subscribers.active", self.prefix)).decrement(1.0),
            _ => {}
        }
    }

    pub fn error_occurred(&self, error_code: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_code)).increment(1);
    }

    pub fn memory_used(&self, bytes: usize) {
        gauge!(format!("{}.memory.used_bytes", self.prefix)).set(bytes as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
