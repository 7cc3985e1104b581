use crate::api::{query_rejection_response, storage_error_response, ApiError};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pulse_common::types::Campaign;
use pulse_storage::CampaignFilter;
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CampaignQuery {
    /// Exact, case-sensitive channel label
    #[param(example = "Google")]
    pub channel: Option<String>,
    /// Inclusive ROAS lower bound. A value with no numeric prefix matches
    /// nothing.
    #[param(example = "3")]
    pub min_roas: Option<String>,
}

/// Campaign rollups, optionally filtered, highest ROAS first.
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "Dashboard",
    params(CampaignQuery),
    responses(
        (status = 200, description = "Campaign rows", body = [Campaign]),
        (status = 400, description = "Malformed query string", body = ApiError),
        (status = 500, description = "Store error", body = ApiError)
    )
)]
async fn list_campaigns(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    query: Result<Query<CampaignQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(q) => q,
        Err(rejection) => return query_rejection_response(&trace_id, &rejection),
    };
    let filter = CampaignFilter::from_params(params.channel.as_deref(), params.min_roas.as_deref());
    match state.store.list_campaigns(&filter) {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => storage_error_response(&trace_id, &e),
    }
}

pub fn campaign_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_campaigns))
}
