//! Tabular source adapter
//!
//! Supplies the four Economic Index tables to the analysis pipeline. The
//! pipeline only sees [`Dataset`]; where the raw CSV text comes from (HTTP,
//! a local directory, memory) is decided by the [`TabularSource`] in use.

pub mod cache;
pub mod csv_reader;
pub mod directory_source;
pub mod http_source;
pub mod memory_source;

pub use cache::{CachedSource, SourceCache};
pub use csv_reader::ParsedTable;
pub use directory_source::DirectorySource;
pub use http_source::HttpSource;
pub use memory_source::MemorySource;

use async_trait::async_trait;
use eidx_common::{
    OnetTaskRecord, Result, SocStructureRecord, TaskSignalRecord, TaskThinkingRecord,
};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Identity of one of the four published tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// Per-task automation/augmentation signals
    TaskAutomation,
    /// O*NET task statements with their occupation
    OnetTasks,
    /// SOC classification structure
    SocStructure,
    /// Per-task thinking fractions
    TaskThinking,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::TaskAutomation,
        SourceKind::OnetTasks,
        SourceKind::SocStructure,
        SourceKind::TaskThinking,
    ];

    /// File name of the table in the published release
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceKind::TaskAutomation => "automation_vs_augmentation_by_task.csv",
            SourceKind::OnetTasks => "onet_task_statements.csv",
            SourceKind::SocStructure => "SOC_Structure.csv",
            SourceKind::TaskThinking => "task_thinking_fractions.csv",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Origin of raw table text
///
/// Implementations either return the complete text of a table or a
/// [`eidx_common::Error::SourceUnavailable`]; there is no partial result.
#[async_trait]
pub trait TabularSource: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Retrieve the raw CSV text of one table
    async fn fetch(&self, kind: SourceKind) -> Result<Arc<str>>;
}

/// The four decoded tables, in source row order
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub task_signals: Vec<TaskSignalRecord>,
    pub onet_tasks: Vec<OnetTaskRecord>,
    pub soc_structure: Vec<SocStructureRecord>,
    pub task_thinking: Vec<TaskThinkingRecord>,
}

/// Retrieve all four tables concurrently and decode them
///
/// Any retrieval failure aborts the load. Rows that fail to decode are
/// skipped with a warning.
pub async fn load_dataset(source: &dyn TabularSource) -> Result<Dataset> {
    let (signals_text, onet_text, soc_text, thinking_text) = tokio::try_join!(
        source.fetch(SourceKind::TaskAutomation),
        source.fetch(SourceKind::OnetTasks),
        source.fetch(SourceKind::SocStructure),
        source.fetch(SourceKind::TaskThinking),
    )?;

    let task_signals = csv_reader::read_task_signals(&signals_text);
    let onet_tasks = csv_reader::read_onet_tasks(&onet_text);
    let soc_structure = csv_reader::read_soc_structure(&soc_text);
    let task_thinking = csv_reader::read_task_thinking(&thinking_text);

    info!(
        source = source.name(),
        task_signals = task_signals.records.len(),
        onet_tasks = onet_tasks.records.len(),
        soc_rows = soc_structure.records.len(),
        thinking_rows = task_thinking.records.len(),
        skipped_rows = task_signals.skipped
            + onet_tasks.skipped
            + soc_structure.skipped
            + task_thinking.skipped,
        "Dataset loaded"
    );

    Ok(Dataset {
        task_signals: task_signals.records,
        onet_tasks: onet_tasks.records,
        soc_structure: soc_structure.records,
        task_thinking: task_thinking.records,
    })
}
