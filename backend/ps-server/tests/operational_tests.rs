//! Integration tests for health and metrics endpoints
mod common;

use crate::common::{
    body_json, body_text, create_admin_app_state, create_app, get_request, publish_request, send,
};

use axum::http::StatusCode;

#[tokio::test]
async fn given_store_activity_when_health_then_counters_reported() {
    let state = create_admin_app_state();
    send(create_app(&state), publish_request("news", "a")).await;

    let response = send(create_app(&state), get_request("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["store"]["channels"], 1);
    assert_eq!(json["store"]["published_messages"], 1);
}

#[tokio::test]
async fn given_running_server_when_probed_then_live_and_ready() {
    let state = create_admin_app_state();

    let live = send(create_app(&state), get_request("/live")).await;
    let ready = send(create_app(&state), get_request("/ready")).await;

    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(body_text(live).await, "OK");
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_no_recorder_when_metrics_then_not_found() {
    let state = create_admin_app_state();

    let response = send(create_app(&state), get_request("/metrics")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_shutdown_started_when_ready_probed_then_unavailable() {
    let state = create_admin_app_state();
    state.shutdown.shutdown();

    let response = send(create_app(&state), get_request("/ready")).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
