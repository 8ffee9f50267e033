use crate::api::channel_params::ChannelParams;
use crate::api::error::Result as ApiErrorResult;
use crate::app_state::AppState;
use crate::subscriber::http_date;
use crate::subscriber::message_envelope::MessageEnvelope;

use ps_core::{Message, ReplayCursor, SinkEvent, StoreError, SubscriberSink};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use http::{HeaderMap, HeaderValue, StatusCode, header};
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Result of waiting on one long-polling request
enum PollOutcome {
    Messages(Vec<Arc<Message>>),
    TimedOut,
    ChannelDeleted,
}

/// GET /lp?id=<channel> - long-polling subscriber
///
/// Resumes from `If-Modified-Since`/`If-None-Match` (or the query cursor).
/// Returns pending messages at once, otherwise waits for the next one.
pub async fn long_poll_handler(
    State(state): State<AppState>,
    Query(params): Query<ChannelParams>,
    headers: HeaderMap,
) -> ApiErrorResult<Response> {
    let id = state.channel_id(params.id())?;
    let channel = state
        .store
        .find(id.as_str())
        .await
        .ok_or_else(|| StoreError::not_found(id.as_str()))?;

    let cursor = params.cursor().or_else(|| header_cursor(&headers));
    let mut shutdown_guard = state.shutdown.subscribe_guard();
    let (sink, mut events) = SubscriberSink::channel(state.subscriber.send_buffer_size);
    let subscriber_id = sink.id();

    let replay = state
        .store
        .attach_subscriber(&channel, sink, cursor)
        .await?;

    let outcome = if !replay.is_empty() {
        PollOutcome::Messages(replay)
    } else {
        let wait = Duration::from_secs(state.subscriber.longpolling_timeout_secs);
        tokio::select! {
            outcome = wait_for_messages(&mut events, wait) => outcome,
            _ = shutdown_guard.wait() => PollOutcome::TimedOut,
        }
    };

    state.store.detach_subscriber(&channel, subscriber_id).await;

    match outcome {
        PollOutcome::Messages(messages) => Ok(messages_response(channel.name(), &messages)),
        PollOutcome::TimedOut => Ok(StatusCode::NOT_MODIFIED.into_response()),
        PollOutcome::ChannelDeleted => {
            log::debug!("Channel {} deleted during long poll", channel.name());
            Ok((StatusCode::GONE, "Channel deleted").into_response())
        }
    }
}

/// Wait for the first message, then take whatever else is already queued
async fn wait_for_messages(
    events: &mut mpsc::Receiver<SinkEvent>,
    wait: Duration,
) -> PollOutcome {
    let first = match timeout(wait, events.recv()).await {
        Err(_) => return PollOutcome::TimedOut,
        Ok(Some(SinkEvent::Message(message))) => message,
        Ok(Some(SinkEvent::ChannelDeleted)) | Ok(None) => return PollOutcome::ChannelDeleted,
    };

    let mut messages = vec![first];
    while let Ok(SinkEvent::Message(message)) = events.try_recv() {
        messages.push(message);
    }
    PollOutcome::Messages(messages)
}

/// Cursor from conditional request headers
fn header_cursor(headers: &HeaderMap) -> Option<ReplayCursor> {
    let time = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|value| value.to_str().ok())
        .and_then(http_date::parse)?;

    let tag = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().trim_matches('"').parse().ok())
        .unwrap_or(u32::MAX);

    Some(ReplayCursor::Since { time, tag })
}

fn messages_response(channel: &str, messages: &[Arc<Message>]) -> Response {
    let envelopes: Vec<MessageEnvelope> = messages
        .iter()
        .map(|message| MessageEnvelope::new(channel, message))
        .collect();

    let mut response = Json(envelopes).into_response();

    if let Some(last) = messages.last() {
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&http_date::format(last.time)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
        headers.insert(header::ETAG, HeaderValue::from(last.tag));
    }

    response
}

