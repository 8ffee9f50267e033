#![allow(dead_code)]

//! Test infrastructure for ps-server HTTP and WebSocket tests

use ps_config::Config;
use ps_core::{ChannelStore, ShutdownCoordinator};
use ps_server::{AppState, build_router, store_limits};

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use axum_test::TestServer;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// AppState built from the given config
pub fn create_test_app_state(config: &Config) -> AppState {
    let store = ChannelStore::new(store_limits(&config.store));
    AppState::new(config, store, ShutdownCoordinator::new())
}

/// AppState with default config, publisher admin enabled
pub fn create_admin_app_state() -> AppState {
    let mut config = Config::default();
    config.publisher.admin = true;
    create_test_app_state(&config)
}

pub fn create_app(state: &AppState) -> Router {
    build_router(state.clone())
}

/// Server on a real port, needed for WebSocket upgrades
pub fn create_test_server(state: &AppState) -> TestServer {
    TestServer::builder()
        .http_transport()
        .build(build_router(state.clone()))
        .expect("Failed to create test server")
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub fn publish_request(channel: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/pub?id={channel}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}
