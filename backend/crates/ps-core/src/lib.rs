pub mod backlog;
pub mod broadcaster;
pub mod channel;
pub mod channel_id;
pub mod channel_store;
pub mod cleanup;
pub mod clock;
pub mod error;
pub mod eviction;
pub mod memory_budget;
pub mod message;
pub mod metrics;
pub mod replay_cursor;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod stats;
pub mod store_limits;
pub mod subscriber_id;
pub mod subscriber_sink;

pub use backlog::Backlog;
pub use broadcaster::{Broadcaster, FanoutReport, SubscriberSet};
pub use channel::{CHANNEL_OVERHEAD, Channel};
pub use channel_id::{ALL_CHANNELS_ID, ChannelId, ChannelQuery, WILDCARD};
pub use channel_store::ChannelStore;
pub use cleanup::{CleanupConfig, spawn_cleanup_task};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, StoreError};
pub use eviction::{EvictionPolicy, EvictionReport};
pub use memory_budget::MemoryBudget;
pub use message::{MESSAGE_OVERHEAD, Message};
pub use metrics::Metrics;
pub use replay_cursor::ReplayCursor;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use stats::{ChannelStats, StatsSummary};
pub use store_limits::StoreLimits;
pub use subscriber_id::SubscriberId;
pub use subscriber_sink::{Delivery, SinkEvent, SubscriberSink};

#[cfg(test)]
mod tests;
