use crate::api::{query_rejection_response, storage_error_response, ApiError};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pulse_common::types::Channel;
use pulse_storage::ChannelSort;
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChannelQuery {
    /// One of name, spend, impressions, clicks, conversions, revenue, ctr,
    /// cpc, roas, cpa, cvr. Anything else sorts by roas.
    #[param(example = "roas")]
    pub sort_by: Option<String>,
    /// ASC or DESC (case-insensitive). Anything else is DESC.
    #[param(example = "DESC")]
    pub order: Option<String>,
}

/// Channel performance rows in the requested order.
#[utoipa::path(
    get,
    path = "/api/channels",
    tag = "Dashboard",
    params(ChannelQuery),
    responses(
        (status = 200, description = "Channel rows", body = [Channel]),
        (status = 400, description = "Malformed query string", body = ApiError),
        (status = 500, description = "Store error", body = ApiError)
    )
)]
async fn list_channels(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    query: Result<Query<ChannelQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(q) => q,
        Err(rejection) => return query_rejection_response(&trace_id, &rejection),
    };
    let sort = ChannelSort::from_params(params.sort_by.as_deref(), params.order.as_deref());
    tracing::debug!(trace_id = %trace_id.0, column = %sort.column, order = sort.order.as_sql(), "Listing channels");
    match state.store.list_channels(sort) {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

pub fn channel_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_channels))
}
