use crate::channel::{Admission, AdmissionContext};
use crate::channel_id::ensure_publishable;
use crate::{
    Broadcaster, Channel, ChannelQuery, ChannelStats, Clock, MemoryBudget, Message, Metrics,
    ReplayCursor, Result as StoreErrorResult, StatsSummary, StoreError, StoreLimits, SubscriberId,
    SubscriberSink, SystemClock,
};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use bytes::Bytes;
use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::RwLock;

/// Process-wide channel store: the channel map plus global counters.
///
/// Cloning is cheap and every clone sees the same channels.
pub struct ChannelStore {
    inner: Arc<RwLock<StoreInner>>,
    shared: Arc<StoreShared>,
}

struct StoreInner {
    channels: HashMap<String, Arc<Channel>>,
}

struct StoreShared {
    limits: StoreLimits,
    clock: Arc<dyn Clock>,
    budget: MemoryBudget,
    published_messages_total: AtomicU64,
    subscribers: AtomicUsize,
    started_at: i64,
    broadcaster: Broadcaster,
    metrics: Metrics,
}

impl ChannelStore {
    pub fn new(limits: StoreLimits) -> Self {
        Self::with_clock(limits, Arc::new(SystemClock))
    }

    pub fn with_clock(limits: StoreLimits, clock: Arc<dyn Clock>) -> Self {
        let metrics = Metrics::new();
        let started_at = clock.now();

        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                channels: HashMap::new(),
            })),
            shared: Arc::new(StoreShared {
                budget: MemoryBudget::new(limits.shared_memory_size),
                limits,
                clock,
                published_messages_total: AtomicU64::new(0),
                subscribers: AtomicUsize::new(0),
                started_at,
                broadcaster: Broadcaster::new(metrics.clone()),
                metrics,
            }),
        }
    }

    pub fn limits(&self) -> &StoreLimits {
        &self.shared.limits
    }

    pub fn now(&self) -> i64 {
        self.shared.clock.now()
    }

    /// Look up a channel without creating it
    pub async fn find(&self, name: &str) -> Option<Arc<Channel>> {
        let inner = self.inner.read().await;
        inner.channels.get(name).cloned()
    }

    /// Return the named channel, creating it if the channel limit and memory budget allow.
    pub async fn get_or_create(&self, name: &str) -> StoreErrorResult<Arc<Channel>> {
        if let Some(channel) = self.find(name).await {
            return Ok(channel);
        }

        let mut inner = self.inner.write().await;

        // Another creator may have won the race
        if let Some(channel) = inner.channels.get(name) {
            return Ok(Arc::clone(channel));
        }

        let max_channels = self.shared.limits.max_channels;
        if max_channels > 0 && inner.channels.len() >= max_channels {
            warn!(
                "Channel limit reached: {}/{}, refusing {}",
                inner.channels.len(),
                max_channels,
                name
            );
            self.shared.metrics.error_occurred("CHANNEL_LIMIT");
            return Err(StoreError::ChannelCapacityExceeded {
                current: inner.channels.len(),
                max: max_channels,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.shared
            .budget
            .try_reserve(Channel::footprint_for(name))
            .inspect_err(|e| {
                warn!("Unable to allocate channel {}: {}", name, e);
                self.shared.metrics.error_occurred(e.error_code());
            })?;

        let channel = Arc::new(Channel::new(name.to_string(), self.now()));
        inner
            .channels
            .insert(name.to_string(), Arc::clone(&channel));

        info!(
            "Created channel {} ({} total)",
            name,
            inner.channels.len()
        );
        self.shared.metrics.channel_created();
        self.shared.metrics.memory_used(self.shared.budget.used());

        Ok(channel)
    }

    /// Remove a channel, notifying and detaching its subscribers.
    /// Returns false if no such channel existed.
    pub async fn delete(&self, name: &str) -> bool {
        let mut inner = self.inner.write().await;

        let Some(channel) = inner.channels.remove(name) else {
            debug!("Delete of unknown channel {}", name);
            return false;
        };

        self.retire(&channel, "deleted").await;
        info!(
            "Deleted channel {} ({} remaining)",
            name,
            inner.channels.len()
        );

        true
    }

    /// Publish a message to `name`, creating the channel on first publish.
    pub async fn publish(
        &self,
        name: &str,
        payload: Bytes,
        event: Option<String>,
    ) -> StoreErrorResult<Arc<Message>> {
        ensure_publishable(name)?;

        loop {
            let channel = self.get_or_create(name).await?;

            let ctx = AdmissionContext {
                clock: &*self.shared.clock,
                limits: &self.shared.limits,
                budget: &self.shared.budget,
                broadcaster: &self.shared.broadcaster,
                metrics: &self.shared.metrics,
                published_total: &self.shared.published_messages_total,
            };

            let admission = channel
                .admit(&ctx, payload.clone(), event.clone())
                .await
                .inspect_err(|e| {
                    warn!("Unable to admit message on channel {}: {}", name, e);
                    self.shared.metrics.error_occurred(e.error_code());
                })?;

            match admission {
                Admission::Published { message, fanout } => {
                    self.shared.metrics.memory_used(self.shared.budget.used());
                    debug!(
                        "Published message {} on channel {} ({} subscribers reached)",
                        message.id, name, fanout.delivered
                    );
                    return Ok(message);
                }
                Admission::ChannelRemoved => {
                    debug!("Channel {} was deleted during publish, recreating", name);
                }
            }
        }
    }

    /// Attach a sink to a channel, returning history selected by `cursor`.
    pub async fn attach_subscriber(
        &self,
        channel: &Channel,
        sink: SubscriberSink,
        cursor: Option<ReplayCursor>,
    ) -> StoreErrorResult<Vec<Arc<Message>>> {
        let id = sink.id();
        let replay = channel
            .attach(
                sink,
                cursor,
                self.now(),
                self.shared.limits.max_subscribers_per_channel,
            )
            .await?;

        self.shared.subscribers.fetch_add(1, Ordering::Relaxed);
        self.shared.metrics.subscriber_changed("attached");
        debug!(
            "Subscriber {} attached to channel {} ({} replayed)",
            id,
            channel.name(),
            replay.len()
        );

        Ok(replay)
    }

    /// Detach a sink. Detaching a sink that is not attached is a no-op.
    pub async fn detach_subscriber(&self, channel: &Channel, id: SubscriberId) -> bool {
        let removed = channel.detach(id, self.now()).await;
        if removed {
            self.release_subscribers(1);
            self.shared.metrics.subscriber_changed("detached");
            debug!("Subscriber {} detached from channel {}", id, channel.name());
        }
        removed
    }

    /// Expire old messages across every channel. Returns the number evicted.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.now();
        let mut evicted = 0;

        for channel in self.snapshot_channels().await {
            let (count, freed) = channel.evict_expired(now).await;
            self.shared.budget.release(freed);
            evicted += count;
        }

        if evicted > 0 {
            self.shared.metrics.messages_evicted("expired", evicted);
            self.shared.metrics.memory_used(self.shared.budget.used());
            debug!("Expired {} messages", evicted);
        }
        evicted
    }

    /// Remove channels with no subscribers, no backlog and no activity for `max_idle_secs`.
    pub async fn sweep_idle(&self, max_idle_secs: u64) -> usize {
        let now = self.now();
        let mut inner = self.inner.write().await;

        let mut idle = Vec::new();
        for (name, channel) in inner.channels.iter() {
            if channel.is_idle(now, max_idle_secs).await {
                idle.push(name.clone());
            }
        }

        for name in &idle {
            if let Some(channel) = inner.channels.remove(name) {
                self.retire(&channel, "idle").await;
            }
        }

        if !idle.is_empty() {
            info!(
                "Removed {} idle channels ({} remaining)",
                idle.len(),
                inner.channels.len()
            );
        }
        idle.len()
    }

    /// Summarized statistics over the whole store
    pub async fn stats_summary(&self) -> StatsSummary {
        let channels = self.snapshot_channels().await;
        let mut stored_messages = 0;
        for channel in &channels {
            stored_messages += channel.stored_count().await;
        }

        let now = self.now();
        StatsSummary {
            time: now,
            channels: channels.len(),
            stored_messages,
            published_messages: self.published_messages_total(),
            subscribers: self.shared.subscribers.load(Ordering::Relaxed),
            uptime_secs: now - self.shared.started_at,
        }
    }

    /// Detailed statistics for the channels a query selects, sorted by name.
    /// An exact query for an unknown channel is a not-found error.
    pub async fn stats_detail(&self, query: &ChannelQuery) -> StoreErrorResult<Vec<ChannelStats>> {
        if let ChannelQuery::Exact(name) = query {
            let channel = self
                .find(name)
                .await
                .ok_or_else(|| StoreError::not_found(name.as_str()))?;
            return Ok(vec![channel.stats().await]);
        }

        let mut stats = Vec::new();
        for channel in self.snapshot_channels().await {
            if query.matches(channel.name()) {
                stats.push(channel.stats().await);
            }
        }
        stats.sort_by(|a, b| a.channel.cmp(&b.channel));

        Ok(stats)
    }

    pub async fn channel_count(&self) -> usize {
        self.inner.read().await.channels.len()
    }

    pub fn published_messages_total(&self) -> u64 {
        self.shared.published_messages_total.load(Ordering::Relaxed)
    }

    pub fn subscriber_total(&self) -> usize {
        self.shared.subscribers.load(Ordering::Relaxed)
    }

    pub fn memory_used(&self) -> usize {
        self.shared.budget.used()
    }

    /// Channel handles under a brief read lock
    async fn snapshot_channels(&self) -> Vec<Arc<Channel>> {
        let inner = self.inner.read().await;
        inner.channels.values().cloned().collect()
    }

    /// Close a channel that has already left the map
    async fn retire(&self, channel: &Channel, reason: &str) {
        let (freed, notified) = channel.close(&self.shared.broadcaster).await;
        self.shared.budget.release(freed + channel.footprint());
        self.release_subscribers(notified);

        self.shared.metrics.channel_deleted(reason);
        self.shared.metrics.memory_used(self.shared.budget.used());
        if notified > 0 {
            debug!(
                "Notified {} subscribers that channel {} is gone",
                notified,
                channel.name()
            );
        }
    }

    fn release_subscribers(&self, count: usize) {
        let _ = self
            .shared
            .subscribers
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |current| {
                Some(current.saturating_sub(count))
            });
    }
}

impl Clone for ChannelStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for ChannelStore {
    fn default() -> Self {
        Self::new(StoreLimits::default())
    }
}
