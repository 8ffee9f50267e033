use crate::{ChannelStore, ShutdownGuard};

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Settings for the periodic store sweep
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    pub interval: Duration,
    /// Remove empty channels idle this long; None = keep them
    pub channel_inactivity: Option<Duration>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            channel_inactivity: None,
        }
    }
}

/// Spawn the task that expires old messages (and idle channels) until shutdown.
pub fn spawn_cleanup_task(
    store: ChannelStore,
    config: CleanupConfig,
    mut shutdown: ShutdownGuard,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Store cleanup running every {}s",
            config.interval.as_secs_f64()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    run_once(&store, &config).await;
                }
                _ = shutdown.wait() => {
                    log::info!("Store cleanup stopping");
                    break;
                }
            }
        }
    })
}

/// One sweep pass. Returns (messages expired, channels removed).
pub async fn run_once(store: &ChannelStore, config: &CleanupConfig) -> (usize, usize) {
    let expired = store.sweep_expired().await;
    let removed = match config.channel_inactivity {
        Some(inactivity) => store.sweep_idle(inactivity.as_secs()).await,
        None => 0,
    };

    if expired > 0 || removed > 0 {
        log::debug!(
            "Cleanup pass: {} messages expired, {} channels removed",
            expired,
            removed
        );
    }
    (expired, removed)
}
