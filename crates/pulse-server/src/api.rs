pub mod campaigns;
pub mod channels;

use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pulse_common::types::{MonthlyPerformance, Summary};
use pulse_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Underlying error message
    pub error: String,
}

pub fn error_response(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

/// Store failures are reported as 500 with the underlying message.
pub fn storage_error_response(trace_id: &str, err: &StorageError) -> Response {
    tracing::error!(trace_id = %trace_id, error = %err, "Store query failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}

/// Malformed query strings (repeated keys included) keep the JSON error shape.
pub fn query_rejection_response(trace_id: &str, rejection: &QueryRejection) -> Response {
    tracing::warn!(trace_id = %trace_id, error = %rejection.body_text(), "Rejected query string");
    error_response(rejection.status(), &rejection.body_text())
}

/// Aggregate totals across all channels.
///
/// Returns JSON `null` when nothing has been loaded yet.
#[utoipa::path(
    get,
    path = "/api/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Summary totals, or null before the first load", body = Summary),
        (status = 500, description = "Store error", body = ApiError)
    )
)]
async fn get_summary(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> Response {
    match state.store.summary() {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

/// Monthly trend rows ordered by month label.
#[utoipa::path(
    get,
    path = "/api/monthly",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Monthly spend, revenue and conversions", body = [MonthlyPerformance]),
        (status = 500, description = "Store error", body = ApiError)
    )
)]
async fn list_monthly(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> Response {
    match state.store.list_monthly() {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

/// Strategic insights as a flat list of strings, in load order.
#[utoipa::path(
    get,
    path = "/api/insights",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Insight sentences", body = [String]),
        (status = 500, description = "Store error", body = ApiError)
    )
)]
async fn list_insights(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> Response {
    match state.store.list_insights() {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_summary))
        .routes(routes!(list_monthly))
        .routes(routes!(list_insights))
        .merge(channels::channel_routes())
        .merge(campaigns::campaign_routes())
}

pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}
