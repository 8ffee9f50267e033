use ps_config::{Config, PublisherConfig, StoreConfig, SubscriberConfig};
use ps_core::{
    ChannelId, ChannelStore, CleanupConfig, Result as StoreErrorResult, ShutdownCoordinator,
    StoreLimits,
};

use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state for every HTTP and WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub store: ChannelStore,
    pub publisher: PublisherConfig,
    pub subscriber: SubscriberConfig,
    pub max_channel_id_length: usize,
    pub shutdown: ShutdownCoordinator,
    /// Set when the Prometheus recorder is installed
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: &Config, store: ChannelStore, shutdown: ShutdownCoordinator) -> Self {
        Self {
            store,
            publisher: config.publisher.clone(),
            subscriber: config.subscriber.clone(),
            max_channel_id_length: config.store.max_channel_id_length,
            shutdown,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Validate the `id` query parameter
    #[track_caller]
    pub fn channel_id(&self, raw: Option<&str>) -> StoreErrorResult<ChannelId> {
        ChannelId::parse(raw, self.max_channel_id_length)
    }
}

/// Store limits from the `[store]` config section
pub fn store_limits(store: &StoreConfig) -> StoreLimits {
    StoreLimits {
        max_channels: store.max_channels,
        max_messages_stored_per_channel: store.max_messages_stored_per_channel,
        message_ttl_secs: store.message_ttl_secs,
        store_messages: store.store_messages,
        max_subscribers_per_channel: store.max_subscribers_per_channel,
        shared_memory_size: store.shared_memory_size,
    }
}

/// Cleanup task settings from the `[store]` config section
pub fn cleanup_config(store: &StoreConfig) -> CleanupConfig {
    CleanupConfig {
        interval: Duration::from_secs(store.buffer_cleanup_interval_secs),
        channel_inactivity: (store.channel_inactivity_secs > 0)
            .then(|| Duration::from_secs(store.channel_inactivity_secs)),
    }
}
