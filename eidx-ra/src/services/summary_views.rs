//! Summary & ranking views
//!
//! Read-only projections consumed by the presentation layer.

use super::occupation_aggregator::HIGH_RISK_TASK_THRESHOLD;
use eidx_common::{
    AutomationPartition, DataSummary, Error, MajorGroupSummary, OccupationSummary, ProcessedTask,
    RankedOccupation, Result, SocStructureRecord, TaskCategory, UNKNOWN_OCCUPATION_CODE,
};
use std::collections::{HashMap, HashSet};

/// Automation score below which a task counts as low risk
pub const LOW_RISK_TASK_THRESHOLD: f64 = 0.3;
/// Maximum entries per bucket of the automation-vs-augmentation partition
pub const PARTITION_BUCKET_LIMIT: usize = 100;
/// Major group assigned to codes without a `NN-` prefix
pub const UNKNOWN_MAJOR_GROUP_CODE: &str = "Unknown";
/// Title of a major group missing from the SOC structure table
pub const UNKNOWN_MAJOR_GROUP_TITLE: &str = "Unknown Major Group";

/// Round to two decimal places, half up for the non-negative averages
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Headline statistics over tasks with a resolved occupation
///
/// # Errors
/// [`Error::EmptyResultSet`] when no task has a resolved occupation.
pub fn data_summary(tasks: &[ProcessedTask]) -> Result<DataSummary> {
    let valid: Vec<&ProcessedTask> = tasks.iter().filter(|t| !t.is_unknown_occupation()).collect();

    if valid.is_empty() {
        return Err(Error::EmptyResultSet(
            "no processed tasks with a resolved occupation".to_string(),
        ));
    }

    let total_tasks = valid.len();
    let occupations: HashSet<&str> = valid.iter().map(|t| t.occupation_code.as_str()).collect();

    let automation_sum: f64 = valid.iter().map(|t| t.automation_score).sum();
    let augmentation_sum: f64 = valid.iter().map(|t| t.augmentation_score).sum();

    let high_risk_tasks = valid
        .iter()
        .filter(|t| t.automation_score > HIGH_RISK_TASK_THRESHOLD)
        .count();
    let low_risk_tasks = valid
        .iter()
        .filter(|t| t.automation_score < LOW_RISK_TASK_THRESHOLD)
        .count();

    let summary = DataSummary {
        total_occupations: occupations.len(),
        total_tasks,
        avg_automation_score: round_to_hundredths(automation_sum / total_tasks as f64),
        avg_augmentation_score: round_to_hundredths(augmentation_sum / total_tasks as f64),
        high_risk_tasks,
        low_risk_tasks,
    };

    tracing::info!(
        occupations = summary.total_occupations,
        tasks = summary.total_tasks,
        high_risk_tasks = summary.high_risk_tasks,
        "Data summary computed"
    );

    Ok(summary)
}

/// First `limit` occupations of the automation-sorted summaries
pub fn top_risk_occupations(summaries: &[OccupationSummary], limit: usize) -> Vec<RankedOccupation> {
    summaries.iter().take(limit).map(RankedOccupation::from).collect()
}

/// Split tasks by category, each bucket capped, in processing order
///
/// Tasks categorized `filtered` land in no bucket.
pub fn automation_vs_augmentation(tasks: &[ProcessedTask]) -> AutomationPartition {
    let bucket = |category: TaskCategory| -> Vec<ProcessedTask> {
        tasks
            .iter()
            .filter(|t| t.category == category)
            .take(PARTITION_BUCKET_LIMIT)
            .cloned()
            .collect()
    };

    AutomationPartition {
        automation_dominant: bucket(TaskCategory::HighAutomation),
        augmentation_dominant: bucket(TaskCategory::HighAugmentation),
        balanced: bucket(TaskCategory::Balanced),
    }
}

/// SOC major group of an occupation code: `13-2011.00` → `13-0000`
pub fn major_group_code(occupation_code: &str) -> String {
    match occupation_code.split_once('-') {
        Some((major, _)) if !major.is_empty() => format!("{}-0000", major),
        _ => UNKNOWN_MAJOR_GROUP_CODE.to_string(),
    }
}

struct MajorGroupTotals<'a> {
    code: String,
    title: &'a str,
    occupations: usize,
    tasks: usize,
    automation_weighted: f64,
    augmentation_weighted: f64,
}

/// Roll occupation summaries up to SOC major groups
///
/// `Unknown` occupations are left out. Group means are weighted by task
/// count. Output is sorted by mean automation, highest first (stable).
pub fn major_group_breakdown(
    summaries: &[OccupationSummary],
    soc_structure: &[SocStructureRecord],
) -> Vec<MajorGroupSummary> {
    let mut titles: HashMap<&str, &str> = HashMap::new();
    for row in soc_structure {
        if !row.major_group.is_empty() && !row.title.is_empty() {
            titles.entry(row.major_group.as_str()).or_insert(row.title.as_str());
        }
    }

    let mut groups: Vec<MajorGroupTotals<'_>> = Vec::new();
    let mut index_by_code: HashMap<String, usize> = HashMap::new();

    for summary in summaries
        .iter()
        .filter(|s| s.occupation_code != UNKNOWN_OCCUPATION_CODE)
    {
        let code = major_group_code(&summary.occupation_code);
        let index = match index_by_code.get(&code) {
            Some(&index) => index,
            None => {
                let title = titles
                    .get(code.as_str())
                    .copied()
                    .unwrap_or(UNKNOWN_MAJOR_GROUP_TITLE);
                groups.push(MajorGroupTotals {
                    code: code.clone(),
                    title,
                    occupations: 0,
                    tasks: 0,
                    automation_weighted: 0.0,
                    augmentation_weighted: 0.0,
                });
                index_by_code.insert(code, groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[index];
        let weight = summary.total_tasks as f64;
        group.occupations += 1;
        group.tasks += summary.total_tasks;
        group.automation_weighted += summary.avg_automation_score * weight;
        group.augmentation_weighted += summary.avg_augmentation_score * weight;
    }

    let mut breakdown: Vec<MajorGroupSummary> = groups
        .into_iter()
        .filter(|g| g.tasks > 0)
        .map(|g| {
            let n = g.tasks as f64;
            MajorGroupSummary {
                major_group_code: g.code,
                major_group_title: g.title.to_string(),
                occupation_count: g.occupations,
                total_tasks: g.tasks,
                avg_automation_score: g.automation_weighted / n,
                avg_augmentation_score: g.augmentation_weighted / n,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| b.avg_automation_score.total_cmp(&a.avg_automation_score));
    breakdown
}
