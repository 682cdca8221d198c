//! Analysis pipeline
//!
//! Single synchronous pass over a loaded [`Dataset`]:
//! link → score → aggregate. The resulting [`AnalysisSnapshot`] is immutable
//! and answers every view without recomputing the join.

use super::occupation_aggregator::aggregate_occupations;
use super::occupation_linker::{LinkStats, OccupationLinker};
use super::summary_views;
use super::task_scorer::{self, TaskScorer};
use crate::sources::Dataset;
use eidx_common::{
    AutomationPartition, DataSummary, MajorGroupSummary, OccupationSummary, ProcessedTask,
    RankedOccupation, Result, SocStructureRecord,
};
use tracing::info;

/// Link and score every qualifying signal record, in table order
///
/// Excluded records (filtered ≥ 0.8) are dropped before linking.
pub fn process_tasks(dataset: &Dataset) -> (Vec<ProcessedTask>, LinkStats) {
    let linker = OccupationLinker::new(&dataset.onet_tasks);
    let scorer = TaskScorer::new(&dataset.task_thinking);

    let mut stats = LinkStats::default();
    let mut excluded = 0usize;
    let mut processed = Vec::with_capacity(dataset.task_signals.len());

    for record in &dataset.task_signals {
        if task_scorer::is_excluded(record) {
            excluded += 1;
            continue;
        }

        let resolution = linker.resolve(&record.task_name);
        stats.record(resolution.stage);

        if let Some(task) = scorer.score(record, resolution.occupation) {
            processed.push(task);
        }
    }

    info!(
        signal_records = dataset.task_signals.len(),
        excluded,
        processed = processed.len(),
        exact = stats.exact,
        prefix = stats.prefix,
        substring = stats.substring,
        unresolved = stats.unresolved,
        "Tasks linked and scored"
    );

    (processed, stats)
}

/// Result of one pipeline pass
#[derive(Debug, Clone)]
pub struct AnalysisSnapshot {
    tasks: Vec<ProcessedTask>,
    occupations: Vec<OccupationSummary>,
    soc_structure: Vec<SocStructureRecord>,
    link_stats: LinkStats,
}

impl AnalysisSnapshot {
    /// Run the pipeline over a dataset
    pub fn build(dataset: &Dataset) -> Self {
        let (tasks, link_stats) = process_tasks(dataset);
        let occupations = aggregate_occupations(&tasks);

        Self {
            tasks,
            occupations,
            soc_structure: dataset.soc_structure.clone(),
            link_stats,
        }
    }

    /// Every processed task in processing order
    pub fn processed_tasks(&self) -> &[ProcessedTask] {
        &self.tasks
    }

    pub fn link_stats(&self) -> &LinkStats {
        &self.link_stats
    }

    /// Headline statistics (excludes unresolved occupations)
    pub fn summary(&self) -> Result<DataSummary> {
        summary_views::data_summary(&self.tasks)
    }

    /// All occupation summaries, highest average automation first
    pub fn occupation_summaries(&self) -> &[OccupationSummary] {
        &self.occupations
    }

    pub fn top_risk_occupations(&self, limit: usize) -> Vec<RankedOccupation> {
        summary_views::top_risk_occupations(&self.occupations, limit)
    }

    pub fn automation_vs_augmentation(&self) -> AutomationPartition {
        summary_views::automation_vs_augmentation(&self.tasks)
    }

    pub fn major_group_breakdown(&self) -> Vec<MajorGroupSummary> {
        summary_views::major_group_breakdown(&self.occupations, &self.soc_structure)
    }
}
