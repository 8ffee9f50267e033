pub mod channel_info;
pub mod channel_params;
pub mod channels_stats;
pub mod error;
pub mod metrics;
pub mod publisher;
