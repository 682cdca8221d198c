//! # EIDX Common Library
//!
//! Shared code for the Economic Index task-risk services:
//! - Raw dataset record types and the derived analysis records
//! - Error type shared by every stage of the pipeline
//! - TOML configuration loading and setting resolution

pub mod config;
pub mod error;
pub mod records;

pub use error::{Error, Result};
pub use records::{
    AutomationPartition, DataSummary, DominantCategory, MajorGroupSummary, OccupationSummary,
    OnetTaskRecord, ProcessedTask, RankedOccupation, RiskLevel, SocStructureRecord, TaskCategory,
    TaskSignalRecord, TaskThinkingRecord, UNKNOWN_OCCUPATION_CODE, UNKNOWN_OCCUPATION_TITLE,
};
