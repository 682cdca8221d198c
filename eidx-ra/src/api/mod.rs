//! HTTP API handlers for eidx-ra

pub mod analysis;
pub mod cache;
pub mod health;

pub use analysis::{
    get_automation_vs_augmentation, get_major_groups, get_occupations, get_summary,
    get_top_risk_occupations,
};
pub use cache::clear_cache;
pub use health::health_routes;
