//! Occupation Aggregator
//!
//! Groups processed tasks by occupation code and summarizes each group.
//! Groups keep the order in which their code was first seen and the title of
//! that first task. The `Unknown` partition is an ordinary group here; views
//! that must exclude it filter it themselves.

use super::task_scorer::{DOMINANCE_MARGIN, DOMINANCE_THRESHOLD};
use eidx_common::{DominantCategory, OccupationSummary, ProcessedTask};
use std::collections::HashMap;

/// Automation score above which a task counts as high risk
pub const HIGH_RISK_TASK_THRESHOLD: f64 = 0.7;

/// Dominant impact of an occupation from its average scores
pub fn dominant_category(avg_automation: f64, avg_augmentation: f64) -> DominantCategory {
    if avg_automation > DOMINANCE_THRESHOLD && avg_automation > avg_augmentation + DOMINANCE_MARGIN
    {
        DominantCategory::AutomationDominant
    } else if avg_augmentation > DOMINANCE_THRESHOLD
        && avg_augmentation > avg_automation + DOMINANCE_MARGIN
    {
        DominantCategory::AugmentationDominant
    } else {
        DominantCategory::BalancedImpact
    }
}

/// Running sums for one occupation
struct OccupationGroup<'a> {
    code: &'a str,
    title: &'a str,
    count: usize,
    automation_sum: f64,
    augmentation_sum: f64,
    thinking_sum: f64,
    high_risk: usize,
}

impl<'a> OccupationGroup<'a> {
    fn new(task: &'a ProcessedTask) -> Self {
        Self {
            code: &task.occupation_code,
            title: &task.occupation_title,
            count: 0,
            automation_sum: 0.0,
            augmentation_sum: 0.0,
            thinking_sum: 0.0,
            high_risk: 0,
        }
    }

    fn add(&mut self, task: &ProcessedTask) {
        self.count += 1;
        self.automation_sum += task.automation_score;
        self.augmentation_sum += task.augmentation_score;
        self.thinking_sum += task.thinking_fraction;
        if task.automation_score > HIGH_RISK_TASK_THRESHOLD {
            self.high_risk += 1;
        }
    }

    fn summarize(&self) -> Option<OccupationSummary> {
        if self.count == 0 {
            return None;
        }

        let n = self.count as f64;
        let avg_automation = self.automation_sum / n;
        let avg_augmentation = self.augmentation_sum / n;

        Some(OccupationSummary {
            occupation_code: self.code.to_string(),
            occupation_title: self.title.to_string(),
            total_tasks: self.count,
            avg_automation_score: avg_automation,
            avg_augmentation_score: avg_augmentation,
            avg_thinking_fraction: self.thinking_sum / n,
            high_risk_tasks: self.high_risk,
            category: dominant_category(avg_automation, avg_augmentation),
        })
    }
}

/// Summarize tasks per occupation, highest average automation first
///
/// The sort is stable: occupations with equal averages keep first-seen order.
pub fn aggregate_occupations(tasks: &[ProcessedTask]) -> Vec<OccupationSummary> {
    let mut groups: Vec<OccupationGroup<'_>> = Vec::new();
    let mut index_by_code: HashMap<&str, usize> = HashMap::new();

    for task in tasks {
        let index = *index_by_code
            .entry(task.occupation_code.as_str())
            .or_insert_with(|| {
                groups.push(OccupationGroup::new(task));
                groups.len() - 1
            });
        groups[index].add(task);
    }

    let mut summaries: Vec<OccupationSummary> =
        groups.iter().filter_map(OccupationGroup::summarize).collect();

    summaries.sort_by(|a, b| b.avg_automation_score.total_cmp(&a.avg_automation_score));

    tracing::debug!(
        tasks = tasks.len(),
        occupations = summaries.len(),
        "Aggregated occupations"
    );

    summaries
}
