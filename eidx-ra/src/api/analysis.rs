//! Analysis view endpoints
//!
//! Each request builds a fresh snapshot from the (cached) raw tables.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use eidx_common::{
    AutomationPartition, DataSummary, MajorGroupSummary, OccupationSummary, RankedOccupation,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Default number of entries returned by the top-risk endpoint
pub const DEFAULT_TOP_LIMIT: usize = 20;

/// Query parameters for GET /api/occupations/top
#[derive(Debug, Deserialize)]
pub struct TopRiskQuery {
    pub limit: Option<usize>,
}

/// GET /api/summary
pub async fn get_summary(State(state): State<AppState>) -> ApiResult<Json<DataSummary>> {
    Ok(Json(state.service.summary().await?))
}

/// GET /api/occupations
pub async fn get_occupations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<OccupationSummary>>> {
    Ok(Json(state.service.occupation_summaries().await?))
}

/// GET /api/occupations/top?limit=N
pub async fn get_top_risk_occupations(
    State(state): State<AppState>,
    query: Result<Query<TopRiskQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<RankedOccupation>>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);

    Ok(Json(state.service.top_risk_occupations(limit).await?))
}

/// GET /api/tasks/automation-vs-augmentation
pub async fn get_automation_vs_augmentation(
    State(state): State<AppState>,
) -> ApiResult<Json<AutomationPartition>> {
    Ok(Json(state.service.automation_vs_augmentation().await?))
}

/// GET /api/major-groups
pub async fn get_major_groups(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MajorGroupSummary>>> {
    Ok(Json(state.service.major_group_breakdown().await?))
}
