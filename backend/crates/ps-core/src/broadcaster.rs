use crate::{Delivery, Message, Metrics, SinkEvent, SubscriberId, SubscriberSink};

use std::collections::HashMap;
use std::sync::Arc;

/// Sinks attached to one channel
#[derive(Debug, Default)]
pub struct SubscriberSet {
    sinks: HashMap<SubscriberId, SubscriberSink>,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sink: SubscriberSink) {
        self.sinks.insert(sink.id(), sink);
    }

    /// Returns false if the sink was not attached
    pub fn remove(&mut self, id: SubscriberId) -> bool {
        self.sinks.remove(&id).is_some()
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.sinks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub(crate) fn drain(&mut self) -> Vec<SubscriberSink> {
        self.sinks.drain().map(|(_, sink)| sink).collect()
    }

    fn sinks(&self) -> impl Iterator<Item = &SubscriberSink> {
        self.sinks.values()
    }
}

/// Counts from one fanout call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanoutReport {
    pub delivered: usize,
    pub dropped: usize,
    pub closed: usize,
}

/// Fire-and-forget delivery of one message to every attached sink
#[derive(Debug, Clone, Default)]
pub struct Broadcaster {
    metrics: Metrics,
}

impl Broadcaster {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }

    /// One delivery attempt per sink; never blocks, never retries.
    pub fn fanout(
        &self,
        channel: &str,
        subscribers: &SubscriberSet,
        message: &Arc<Message>,
    ) -> FanoutReport {
        let mut report = FanoutReport::default();

        for sink in subscribers.sinks() {
            match sink.deliver(SinkEvent::Message(Arc::clone(message))) {
                Delivery::Delivered => report.delivered += 1,
                Delivery::Full => {
                    log::warn!(
                        "Subscriber {} on channel {} dropped message {}: queue full",
                        sink.id(),
                        channel,
                        message.id
                    );
                    self.metrics.sink_dropped("full");
                    report.dropped += 1;
                }
                Delivery::Closed => {
                    log::debug!(
                        "Subscriber {} on channel {} is gone, skipping message {}",
                        sink.id(),
                        channel,
                        message.id
                    );
                    self.metrics.sink_dropped("closed");
                    report.closed += 1;
                }
            }
        }

        log::debug!(
            "Broadcast message {} to channel {} ({} delivered)",
            message.id,
            channel,
            report.delivered
        );
        self.metrics.broadcast_published(report.delivered);

        report
    }

    /// Tell every sink its channel is gone. Consumes the set.
    pub fn notify_deleted(&self, channel: &str, subscribers: &mut SubscriberSet) -> usize {
        let sinks = subscribers.drain();
        let count = sinks.len();

        for sink in sinks {
            if sink.deliver(SinkEvent::ChannelDeleted) != Delivery::Delivered {
                log::debug!(
                    "Subscriber {} on channel {} missed the deletion notice",
                    sink.id(),
                    channel
                );
            }
        }

        count
    }
}
