use crate::api::channel_info::ChannelInfo;
use crate::api::channel_params::ChannelParams;
use crate::api::error::{ApiError, PUBLISHER_ALLOWED_METHODS, Result as ApiErrorResult};
use crate::app_state::AppState;

use ps_core::StoreError;

use std::panic::Location;

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use bytes::Bytes;
use error_location::ErrorLocation;
use log::info;

/// Header naming the event a published message belongs to
pub const EVENT_ID_HEADER: &str = "event-id";

/// POST /pub?id=<channel> - publish the request body
pub async fn publish_message(
    State(state): State<AppState>,
    Query(params): Query<ChannelParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiErrorResult<Json<ChannelInfo>> {
    let id = state.channel_id(params.id())?;
    id.ensure_publishable()?;

    if body.is_empty() {
        return Err(StoreError::EmptyMessage {
            location: ErrorLocation::from(Location::caller()),
        }
        .into());
    }

    let event = headers
        .get(EVENT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(String::from);

    state.store.publish(id.as_str(), body, event).await?;

    // A concurrent delete may already have removed the channel again
    let channel = state
        .store
        .find(id.as_str())
        .await
        .ok_or_else(|| ApiError::not_found("Channel not found."))?;

    Ok(Json(channel.stats().await.into()))
}

/// GET /pub?id=<channel> - channel counters
pub async fn channel_info(
    State(state): State<AppState>,
    Query(params): Query<ChannelParams>,
) -> ApiErrorResult<Json<ChannelInfo>> {
    let id = state.channel_id(params.id())?;

    let channel = state
        .store
        .find(id.as_str())
        .await
        .ok_or_else(|| StoreError::not_found(id.as_str()))?;

    Ok(Json(channel.stats().await.into()))
}

/// DELETE /pub?id=<channel> - remove a channel, disconnecting its subscribers
pub async fn delete_channel(
    State(state): State<AppState>,
    Query(params): Query<ChannelParams>,
) -> ApiErrorResult<&'static str> {
    if !state.publisher.admin {
        return Err(ApiError::method_not_allowed(PUBLISHER_ALLOWED_METHODS));
    }

    let id = state.channel_id(params.id())?;

    if !state.store.delete(id.as_str()).await {
        return Err(StoreError::not_found(id.as_str()).into());
    }

    info!("Channel {} deleted by publisher", id);
    Ok("Channel deleted.")
}
