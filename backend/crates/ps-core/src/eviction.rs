use crate::Backlog;

/// What an eviction pass removed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EvictionReport {
    pub by_count: usize,
    pub expired: usize,
    pub bytes_freed: usize,
}

impl EvictionReport {
    pub fn total(&self) -> usize {
        self.by_count + self.expired
    }
}

/// Bounds a backlog by message count and message age
#[derive(Debug, Clone, Copy)]
pub struct EvictionPolicy {
    /// 0 disables count eviction
    pub max_messages: usize,
}

impl EvictionPolicy {
    pub fn new(max_messages: usize) -> Self {
        Self { max_messages }
    }

    /// Apply both checks. Only ever removes from the oldest end.
    pub fn apply(&self, backlog: &mut Backlog, now: i64) -> EvictionReport {
        let mut report = self.evict_by_count(backlog);
        let expired = Self::evict_expired(backlog, now);
        report.expired = expired.expired;
        report.bytes_freed += expired.bytes_freed;
        report
    }

    pub fn evict_by_count(&self, backlog: &mut Backlog) -> EvictionReport {
        let mut report = EvictionReport::default();
        if self.max_messages == 0 {
            return report;
        }

        while backlog.len() > self.max_messages {
            match backlog.pop_oldest() {
                Some(message) => {
                    report.by_count += 1;
                    report.bytes_freed += message.footprint();
                }
                None => break,
            }
        }
        report
    }

    /// Pop expired messages from the front, stopping at the first live one
    pub fn evict_expired(backlog: &mut Backlog, now: i64) -> EvictionReport {
        let mut report = EvictionReport::default();

        while backlog.oldest().is_some_and(|m| m.is_expired(now)) {
            if let Some(message) = backlog.pop_oldest() {
                report.expired += 1;
                report.bytes_freed += message.footprint();
            }
        }
        report
    }
}
