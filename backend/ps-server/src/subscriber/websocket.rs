use crate::api::channel_params::ChannelParams;
use crate::api::error::Result as ApiErrorResult;
use crate::app_state::AppState;
use crate::subscriber::subscriber_connection::SubscriberConnection;

use ps_core::{Channel, ReplayCursor, StoreError, SubscriberSink};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message as WsMessage, WebSocket, WebSocketUpgrade, close_code},
    },
    response::Response,
};
use log::{error, warn};

/// GET /ws?id=<channel> - WebSocket subscriber
///
/// Unknown channels are rejected with 404 before the upgrade.
pub async fn websocket_handler(
    State(state): State<AppState>,
    Query(params): Query<ChannelParams>,
    ws: WebSocketUpgrade,
) -> ApiErrorResult<Response> {
    let id = state.channel_id(params.id())?;
    let channel = state
        .store
        .find(id.as_str())
        .await
        .ok_or_else(|| StoreError::not_found(id.as_str()))?;

    let cursor = params.cursor();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, channel, cursor)))
}

async fn handle_socket(
    mut socket: WebSocket,
    state: AppState,
    channel: Arc<Channel>,
    cursor: Option<ReplayCursor>,
) {
    let shutdown_guard = state.shutdown.subscribe_guard();
    let (sink, events) = SubscriberSink::channel(state.subscriber.send_buffer_size);
    let subscriber_id = sink.id();

    let replay = match state.store.attach_subscriber(&channel, sink, cursor).await {
        Ok(replay) => replay,
        Err(e) => {
            warn!("Refusing subscriber on channel {}: {}", channel.name(), e);
            let frame = CloseFrame {
                code: close_code::POLICY,
                reason: e.error_code().into(),
            };
            let _ = socket.send(WsMessage::Close(Some(frame))).await;
            return;
        }
    };

    let connection = SubscriberConnection::new(
        subscriber_id,
        channel.name().to_string(),
        Duration::from_secs(state.subscriber.heartbeat_interval_secs),
    );

    let result = connection
        .handle(socket, replay, events, shutdown_guard)
        .await;

    state.store.detach_subscriber(&channel, subscriber_id).await;

    if let Err(e) = result {
        error!("Subscriber {} error: {}", subscriber_id, e);
    }
}
