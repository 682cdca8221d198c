//! Raw-source cache control

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    /// Number of cached tables dropped
    pub cleared: usize,
}

/// POST /api/cache/clear
///
/// The next analysis request refetches every table.
pub async fn clear_cache(State(state): State<AppState>) -> Json<CacheClearResponse> {
    let cleared = state.cache.clear().await;
    info!(cleared, "Cache cleared via API");
    Json(CacheClearResponse { cleared })
}
