use crate::api::channel_info::{DetailedStatsResponse, SummaryStatsResponse};
use crate::api::channel_params::ChannelParams;
use crate::api::error::Result as ApiErrorResult;
use crate::app_state::AppState;

use ps_core::ChannelQuery;

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};

/// GET /channels-stats[?id=<channel | prefix* | ALL>]
///
/// No id gives the store summary; `ALL`, `*` and `prefix*` list matching
/// channels; any other id returns that channel or 404.
pub async fn channels_stats(
    State(state): State<AppState>,
    Query(params): Query<ChannelParams>,
) -> ApiErrorResult<Response> {
    let Some(raw) = params.id().filter(|id| !id.is_empty()) else {
        let summary = state.store.stats_summary().await;
        return Ok(Json(SummaryStatsResponse {
            summary,
            memory_used: state.store.memory_used(),
        })
        .into_response());
    };

    let query = state.channel_id(Some(raw))?.to_query();
    let mut infos = state.store.stats_detail(&query).await?;

    if matches!(query, ChannelQuery::Exact(_))
        && let Some(info) = infos.pop()
    {
        return Ok(Json(info).into_response());
    }

    Ok(Json(DetailedStatsResponse {
        time: state.store.now(),
        channels: infos.len(),
        infos,
    })
    .into_response())
}
