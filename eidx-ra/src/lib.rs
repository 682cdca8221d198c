//! eidx-ra library - Economic Index risk analysis
//!
//! Loads the four Economic Index tables, links task signals to O*NET
//! occupations, scores them and serves the derived views over HTTP.

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod services;
pub mod sources;

pub use error::{ApiError, ApiResult};
pub use services::DataService;
pub use sources::{SourceCache, TabularSource};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Analysis facade reading through `cache`
    pub service: DataService,
    /// Raw-source cache, exposed for manual clearing
    pub cache: Arc<SourceCache>,
    /// Server start time, reported by the health endpoint
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create state for `source`, cached in `cache`
    pub fn new(source: Arc<dyn TabularSource>, cache: Arc<SourceCache>) -> Self {
        Self {
            service: DataService::with_cache(source, Arc::clone(&cache)),
            cache,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let analysis = Router::new()
        .route("/api/summary", get(api::get_summary))
        .route("/api/occupations", get(api::get_occupations))
        .route("/api/occupations/top", get(api::get_top_risk_occupations))
        .route(
            "/api/tasks/automation-vs-augmentation",
            get(api::get_automation_vs_augmentation),
        )
        .route("/api/major-groups", get(api::get_major_groups))
        .route("/api/cache/clear", post(api::clear_cache));

    Router::new()
        .merge(analysis)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
