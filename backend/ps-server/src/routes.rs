use crate::api::{channels_stats, metrics, publisher};
use crate::app_state::AppState;
use crate::health;
use crate::subscriber::{long_polling, websocket};

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Publisher
        .route(
            "/pub",
            get(publisher::channel_info)
                .post(publisher::publish_message)
                .delete(publisher::delete_channel),
        )
        .route("/channels-stats", get(channels_stats::channels_stats))
        // Subscribers
        .route("/ws", get(websocket::websocket_handler))
        .route("/lp", get(long_polling::long_poll_handler))
        // Operational
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(metrics::metrics))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
