//! Analysis services
//!
//! Linking, scoring, aggregation and the views built on them.

pub mod data_service;
pub mod occupation_aggregator;
pub mod occupation_linker;
pub mod pipeline;
pub mod summary_views;
pub mod task_scorer;

pub use data_service::DataService;
pub use occupation_aggregator::aggregate_occupations;
pub use occupation_linker::{LinkStats, MatchStage, OccupationLinker, OccupationRef, Resolution};
pub use pipeline::{process_tasks, AnalysisSnapshot};
pub use task_scorer::TaskScorer;
