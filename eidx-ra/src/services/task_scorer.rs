//! Task Scorer
//!
//! Turns one raw signal record into a [`ProcessedTask`]:
//! - automation score = max(directive, feedback_loop)
//! - augmentation score = max(validation, task_iteration, learning)
//! - category from relative dominance of the two scores
//! - risk band from the automation score alone
//!
//! Records whose `filtered` share is 0.8 or more are excluded and produce no
//! output at all.

use super::occupation_linker::{normalize_task_text, OccupationRef};
use eidx_common::{
    ProcessedTask, RiskLevel, TaskCategory, TaskSignalRecord, TaskThinkingRecord,
    UNKNOWN_OCCUPATION_CODE, UNKNOWN_OCCUPATION_TITLE,
};
use std::collections::HashMap;

/// Records with `filtered` at or above this are excluded
pub const FILTERED_EXCLUSION_THRESHOLD: f64 = 0.8;
/// Score a dominant side must exceed
pub const DOMINANCE_THRESHOLD: f64 = 0.6;
/// Lead a dominant side must have over the other side
pub const DOMINANCE_MARGIN: f64 = 0.2;
/// Either score above this makes a non-dominant task `balanced`
pub const BALANCED_THRESHOLD: f64 = 0.3;

/// True when the record's signal is too unreliable to analyze
pub fn is_excluded(record: &TaskSignalRecord) -> bool {
    record.filtered >= FILTERED_EXCLUSION_THRESHOLD
}

pub fn automation_score(record: &TaskSignalRecord) -> f64 {
    record.directive.max(record.feedback_loop)
}

pub fn augmentation_score(record: &TaskSignalRecord) -> f64 {
    record
        .validation
        .max(record.task_iteration)
        .max(record.learning)
}

/// Classify a task by its two scores; first matching rule wins
pub fn classify_task(automation: f64, augmentation: f64) -> TaskCategory {
    if automation > DOMINANCE_THRESHOLD && automation > augmentation + DOMINANCE_MARGIN {
        TaskCategory::HighAutomation
    } else if augmentation > DOMINANCE_THRESHOLD && augmentation > automation + DOMINANCE_MARGIN {
        TaskCategory::HighAugmentation
    } else if automation > BALANCED_THRESHOLD || augmentation > BALANCED_THRESHOLD {
        TaskCategory::Balanced
    } else {
        TaskCategory::Filtered
    }
}

/// Risk band of an automation score (exclusive lower bounds)
pub fn risk_level(automation: f64) -> RiskLevel {
    if automation > 0.8 {
        RiskLevel::VeryHigh
    } else if automation > 0.6 {
        RiskLevel::High
    } else if automation > 0.4 {
        RiskLevel::Medium
    } else if automation > 0.2 {
        RiskLevel::Low
    } else {
        RiskLevel::VeryLow
    }
}

/// Scores tasks, joining in the sparse thinking-fraction signal
#[derive(Debug, Clone, Default)]
pub struct TaskScorer {
    /// Normalized task name → thinking fraction (later rows overwrite earlier)
    thinking_fractions: HashMap<String, f64>,
}

impl TaskScorer {
    pub fn new(thinking: &[TaskThinkingRecord]) -> Self {
        let thinking_fractions = thinking
            .iter()
            .map(|r| (normalize_task_text(&r.task_name), r.thinking_fraction))
            .collect();

        Self { thinking_fractions }
    }

    /// Thinking fraction for a task name, 0 when the task has no entry
    pub fn thinking_fraction(&self, task_name: &str) -> f64 {
        self.thinking_fractions
            .get(&normalize_task_text(task_name))
            .copied()
            .unwrap_or(0.0)
    }

    /// Score one record
    ///
    /// Returns `None` for excluded records. An unresolved occupation, or a
    /// blank code or title, is recorded with the `Unknown` sentinels.
    pub fn score(
        &self,
        record: &TaskSignalRecord,
        occupation: Option<&OccupationRef>,
    ) -> Option<ProcessedTask> {
        if is_excluded(record) {
            return None;
        }

        let automation = automation_score(record);
        let augmentation = augmentation_score(record);

        // Blank O*NET cells fall back to the sentinels field by field
        let occupation_code = occupation
            .map(|occ| occ.code.as_str())
            .filter(|code| !code.is_empty())
            .unwrap_or(UNKNOWN_OCCUPATION_CODE)
            .to_string();
        let occupation_title = occupation
            .map(|occ| occ.title.as_str())
            .filter(|title| !title.is_empty())
            .unwrap_or(UNKNOWN_OCCUPATION_TITLE)
            .to_string();

        Some(ProcessedTask {
            task_name: record.task_name.clone(),
            occupation_code,
            occupation_title,
            automation_score: automation,
            augmentation_score: augmentation,
            thinking_fraction: self.thinking_fraction(&record.task_name),
            category: classify_task(automation, augmentation),
            risk_level: risk_level(automation),
        })
    }
}
