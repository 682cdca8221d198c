//! Dataset records and derived analysis records
//!
//! The raw types mirror the four published Economic Index tables after
//! decoding. The derived types are the single canonical schema handed to the
//! presentation layer; each is created once per pipeline pass and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Occupation code assigned to tasks the linker could not resolve
pub const UNKNOWN_OCCUPATION_CODE: &str = "Unknown";

/// Occupation title assigned to tasks the linker could not resolve
pub const UNKNOWN_OCCUPATION_TITLE: &str = "Unknown Occupation";

// ============================================================================
// Raw records
// ============================================================================

/// One row of the automation-vs-augmentation signal table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSignalRecord {
    /// Free-text task name
    pub task_name: String,
    pub feedback_loop: f64,
    pub directive: f64,
    pub task_iteration: f64,
    pub validation: f64,
    pub learning: f64,
    /// Share of conversations filtered out; high values mean the signal is unreliable
    pub filtered: f64,
}

/// One O*NET task statement with its owning occupation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnetTaskRecord {
    /// O*NET-SOC code, e.g. `13-2011.00`
    pub occupation_code: String,
    pub occupation_title: String,
    /// Task statement text
    pub task: String,
}

/// One row of the SOC structure table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocStructureRecord {
    /// Major group code (`13-0000`); empty on minor/broad/detailed rows
    pub major_group: String,
    pub title: String,
}

/// Sparse thinking-fraction signal for a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskThinkingRecord {
    pub task_name: String,
    pub thinking_fraction: f64,
}

// ============================================================================
// Classification taxonomies
// ============================================================================

/// Per-task impact category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    HighAutomation,
    HighAugmentation,
    Balanced,
    Filtered,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::HighAutomation => "high_automation",
            TaskCategory::HighAugmentation => "high_augmentation",
            TaskCategory::Balanced => "balanced",
            TaskCategory::Filtered => "filtered",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Automation risk band of a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    #[serde(rename = "High")]
    High,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryHigh => "Very High",
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
            RiskLevel::VeryLow => "Very Low",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dominant impact pattern of an occupation, judged on its averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DominantCategory {
    #[serde(rename = "Automation Dominant")]
    AutomationDominant,
    #[serde(rename = "Augmentation Dominant")]
    AugmentationDominant,
    #[serde(rename = "Balanced Impact")]
    BalancedImpact,
}

impl DominantCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DominantCategory::AutomationDominant => "Automation Dominant",
            DominantCategory::AugmentationDominant => "Augmentation Dominant",
            DominantCategory::BalancedImpact => "Balanced Impact",
        }
    }
}

impl fmt::Display for DominantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Derived records
// ============================================================================

/// A linked, scored and classified task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedTask {
    pub task_name: String,
    pub occupation_code: String,
    pub occupation_title: String,
    pub automation_score: f64,
    pub augmentation_score: f64,
    pub thinking_fraction: f64,
    pub category: TaskCategory,
    pub risk_level: RiskLevel,
}

impl ProcessedTask {
    /// True when the linker found no occupation for this task
    pub fn is_unknown_occupation(&self) -> bool {
        self.occupation_code == UNKNOWN_OCCUPATION_CODE
    }
}

/// Per-occupation aggregate over processed tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationSummary {
    pub occupation_code: String,
    pub occupation_title: String,
    pub total_tasks: usize,
    pub avg_automation_score: f64,
    pub avg_augmentation_score: f64,
    pub avg_thinking_fraction: f64,
    /// Tasks with automation score above 0.7
    pub high_risk_tasks: usize,
    pub category: DominantCategory,
}

/// Projection of an [`OccupationSummary`] used by the risk ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOccupation {
    pub title: String,
    pub avg_automation_score: f64,
    pub task_count: usize,
    pub code: String,
}

impl From<&OccupationSummary> for RankedOccupation {
    fn from(summary: &OccupationSummary) -> Self {
        Self {
            title: summary.occupation_title.clone(),
            avg_automation_score: summary.avg_automation_score,
            task_count: summary.total_tasks,
            code: summary.occupation_code.clone(),
        }
    }
}

/// Three-way split of processed tasks by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomationPartition {
    pub automation_dominant: Vec<ProcessedTask>,
    pub augmentation_dominant: Vec<ProcessedTask>,
    pub balanced: Vec<ProcessedTask>,
}

/// Headline statistics over tasks with a resolved occupation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub total_occupations: usize,
    pub total_tasks: usize,
    /// Rounded to two decimal places
    pub avg_automation_score: f64,
    /// Rounded to two decimal places
    pub avg_augmentation_score: f64,
    /// Tasks with automation score above 0.7
    pub high_risk_tasks: usize,
    /// Tasks with automation score below 0.3
    pub low_risk_tasks: usize,
}

/// Occupation summaries rolled up to their SOC major group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorGroupSummary {
    pub major_group_code: String,
    pub major_group_title: String,
    pub occupation_count: usize,
    pub total_tasks: usize,
    /// Task-weighted mean of the member occupations' averages
    pub avg_automation_score: f64,
    /// Task-weighted mean of the member occupations' averages
    pub avg_augmentation_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_as_snake_case_tag() {
        let json = serde_json::to_string(&TaskCategory::HighAutomation).unwrap();
        assert_eq!(json, "\"high_automation\"");
        assert_eq!(TaskCategory::Filtered.to_string(), "filtered");
    }

    #[test]
    fn test_risk_level_serializes_as_display_string() {
        let json = serde_json::to_string(&RiskLevel::VeryHigh).unwrap();
        assert_eq!(json, "\"Very High\"");
        let parsed: RiskLevel = serde_json::from_str("\"Very Low\"").unwrap();
        assert_eq!(parsed, RiskLevel::VeryLow);
    }

    #[test]
    fn test_dominant_category_display() {
        assert_eq!(
            DominantCategory::AugmentationDominant.to_string(),
            "Augmentation Dominant"
        );
        let json = serde_json::to_string(&DominantCategory::BalancedImpact).unwrap();
        assert_eq!(json, "\"Balanced Impact\"");
    }

    #[test]
    fn test_ranked_occupation_projection() {
        let summary = OccupationSummary {
            occupation_code: "13-2011.00".to_string(),
            occupation_title: "Accountants".to_string(),
            total_tasks: 4,
            avg_automation_score: 0.55,
            avg_augmentation_score: 0.4,
            avg_thinking_fraction: 0.1,
            high_risk_tasks: 1,
            category: DominantCategory::BalancedImpact,
        };

        let ranked = RankedOccupation::from(&summary);
        assert_eq!(ranked.title, "Accountants");
        assert_eq!(ranked.code, "13-2011.00");
        assert_eq!(ranked.task_count, 4);
        assert_eq!(ranked.avg_automation_score, 0.55);
    }
}
