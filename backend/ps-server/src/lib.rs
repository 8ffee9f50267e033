pub mod api;
pub mod app_state;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod subscriber;

#[cfg(test)]
mod tests;

pub use api::{
    channel_info::{ChannelInfo, DetailedStatsResponse, SummaryStatsResponse},
    channel_params::ChannelParams,
    error::{ApiError, Result as ApiResult},
};
pub use app_state::{AppState, cleanup_config, store_limits};
pub use error::{Result as ServerResult, ServerError};
pub use subscriber::message_envelope::MessageEnvelope;

pub use crate::routes::build_router;
