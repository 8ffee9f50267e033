use crate::{
    Backlog, Broadcaster, ChannelStats, Clock, EvictionPolicy, FanoutReport, MemoryBudget,
    Message, Metrics, ReplayCursor, Result as StoreErrorResult, StoreError, StoreLimits,
    SubscriberId, SubscriberSet, SubscriberSink,
};

use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use error_location::ErrorLocation;
use tokio::sync::Mutex;

/// Fixed bookkeeping cost charged per channel, on top of its name
pub const CHANNEL_OVERHEAD: usize = std::mem::size_of::<Channel>();

/// A named topic: ordered backlog, identity counters and attached subscribers.
///
/// Lock order is `state` then `subscribers`. Publishing acquires `subscribers`
/// before releasing `state`, so fanouts for one channel run in admission order
/// while delivery itself never holds the backlog lock.
#[derive(Debug)]
pub struct Channel {
    name: String,
    created_at: i64,
    state: Mutex<ChannelState>,
    subscribers: Mutex<SubscriberSet>,
}

#[derive(Debug)]
struct ChannelState {
    backlog: Backlog,
    last_message_id: u64,
    last_message_time: i64,
    last_message_tag: u32,
    published_count: u64,
    last_activity_at: i64,
    /// Set once the channel has left the store
    removed: bool,
}

/// Everything admission needs from the owning store
pub(crate) struct AdmissionContext<'a> {
    /// Read only while the channel state is locked
    pub clock: &'a dyn Clock,
    pub limits: &'a StoreLimits,
    pub budget: &'a MemoryBudget,
    pub broadcaster: &'a Broadcaster,
    pub metrics: &'a Metrics,
    pub published_total: &'a AtomicU64,
}

pub(crate) enum Admission {
    Published {
        message: Arc<Message>,
        fanout: FanoutReport,
    },
    /// Channel was deleted between lookup and admission
    ChannelRemoved,
}

impl Channel {
    pub(crate) fn new(name: String, now: i64) -> Self {
        Self {
            name,
            created_at: now,
            state: Mutex::new(ChannelState {
                backlog: Backlog::new(),
                last_message_id: 0,
                last_message_time: 0,
                last_message_tag: 0,
                published_count: 0,
                last_activity_at: now,
                removed: false,
            }),
            subscribers: Mutex::new(SubscriberSet::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Bytes charged for the channel itself
    pub fn footprint(&self) -> usize {
        Self::footprint_for(&self.name)
    }

    pub(crate) fn footprint_for(name: &str) -> usize {
        CHANNEL_OVERHEAD + name.len()
    }

    pub async fn stored_count(&self) -> usize {
        self.state.lock().await.backlog.len()
    }

    pub async fn published_count(&self) -> u64 {
        self.state.lock().await.published_count
    }

    pub async fn last_message_id(&self) -> u64 {
        self.state.lock().await.last_message_id
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Copy of the backlog, oldest first
    pub async fn messages(&self) -> Vec<Arc<Message>> {
        self.state.lock().await.backlog.iter().cloned().collect()
    }

    /// Counters snapshot for statistics
    pub async fn stats(&self) -> ChannelStats {
        let state = self.state.lock().await;
        let subscribers = self.subscribers.lock().await.len();

        ChannelStats {
            channel: self.name.clone(),
            published_messages: state.published_count,
            stored_messages: state.backlog.len(),
            subscribers,
            created_at: self.created_at,
            last_activity_at: state.last_activity_at,
        }
    }

    /// Assign identity, store, evict, then fan out.
    ///
    /// Id, time and tag are assigned under the state lock, so the backlog is
    /// ordered by id and by `(time, tag)` alike. The memory reservation happens
    /// before the id is taken, so a failed admission leaves the channel untouched.
    pub(crate) async fn admit(
        &self,
        ctx: &AdmissionContext<'_>,
        payload: Bytes,
        event: Option<String>,
    ) -> StoreErrorResult<Admission> {
        let mut state = self.state.lock().await;
        if state.removed {
            return Ok(Admission::ChannelRemoved);
        }

        let store_messages = ctx.limits.store_messages;
        if store_messages {
            ctx.budget
                .try_reserve(Message::footprint_for(&payload, event.as_deref()))?;
        }

        let id = state.last_message_id + 1;
        let time = ctx.clock.now();
        let (tag, expires) = if store_messages {
            let tag = if time == state.last_message_time {
                state.last_message_tag + 1
            } else {
                0
            };
            let expires = (ctx.limits.message_ttl_secs > 0)
                .then(|| time + ctx.limits.message_ttl_secs as i64);
            (tag, expires)
        } else {
            (0, None)
        };

        let payload_len = payload.len();
        let message = Arc::new(Message {
            id,
            tag,
            event,
            payload,
            time,
            expires,
        });

        state.last_message_id = id;
        state.published_count += 1;
        state.last_activity_at = time;
        ctx.published_total.fetch_add(1, Ordering::Relaxed);

        if store_messages {
            state.backlog.push(Arc::clone(&message));
            state.last_message_time = time;
            state.last_message_tag = tag;

            let policy = EvictionPolicy::new(ctx.limits.max_messages_stored_per_channel);
            let report = policy.apply(&mut state.backlog, time);
            ctx.budget.release(report.bytes_freed);
            ctx.metrics.messages_evicted("count", report.by_count);
            ctx.metrics.messages_evicted("expired", report.expired);
        }

        ctx.metrics.message_published(payload_len);

        // Hand over: take the subscriber set before letting the next admission in
        let subscribers = self.subscribers.lock().await;
        drop(state);

        let fanout = ctx.broadcaster.fanout(&self.name, &subscribers, &message);
        drop(subscribers);

        Ok(Admission::Published { message, fanout })
    }

    /// Attach a sink, returning the replay snapshot for `cursor`.
    ///
    /// Every message is either in the returned snapshot or delivered through
    /// the sink, never both.
    pub(crate) async fn attach(
        &self,
        sink: SubscriberSink,
        cursor: Option<ReplayCursor>,
        now: i64,
        max_subscribers: usize,
    ) -> StoreErrorResult<Vec<Arc<Message>>> {
        let mut state = self.state.lock().await;
        if state.removed {
            return Err(StoreError::not_found(&self.name));
        }

        let mut subscribers = self.subscribers.lock().await;
        if max_subscribers > 0 && subscribers.len() >= max_subscribers {
            return Err(StoreError::SubscriberCapacityExceeded {
                channel: self.name.clone(),
                max: max_subscribers,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let replay = cursor
            .map(|cursor| state.backlog.replay(cursor, now))
            .unwrap_or_default();

        subscribers.insert(sink);
        state.last_activity_at = now;

        Ok(replay)
    }

    /// Idempotent; returns whether the sink was attached
    pub(crate) async fn detach(&self, id: SubscriberId, now: i64) -> bool {
        let mut state = self.state.lock().await;
        let removed = self.subscribers.lock().await.remove(id);
        if removed {
            state.last_activity_at = now;
        }
        removed
    }

    pub async fn is_attached(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().await.contains(id)
    }

    /// Drop expired messages from the front, returning (evicted, bytes freed)
    pub(crate) async fn evict_expired(&self, now: i64) -> (usize, usize) {
        let mut state = self.state.lock().await;
        let report = EvictionPolicy::evict_expired(&mut state.backlog, now);
        (report.expired, report.bytes_freed)
    }

    /// True when the channel has no subscribers, no backlog and no recent activity
    pub(crate) async fn is_idle(&self, now: i64, max_idle_secs: u64) -> bool {
        let state = self.state.lock().await;
        let subscribers = self.subscribers.lock().await;

        subscribers.is_empty()
            && state.backlog.is_empty()
            && now - state.last_activity_at >= max_idle_secs as i64
    }

    /// Mark removed, free the backlog and notify every attached sink.
    /// Returns (bytes freed, sinks notified).
    pub(crate) async fn close(&self, broadcaster: &Broadcaster) -> (usize, usize) {
        let mut state = self.state.lock().await;
        state.removed = true;
        let freed = state.backlog.clear();

        let mut subscribers = self.subscribers.lock().await;
        drop(state);

        let notified = broadcaster.notify_deleted(&self.name, &mut subscribers);
        (freed, notified)
    }
}
