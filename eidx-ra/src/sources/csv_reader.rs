//! CSV decoding of the published tables
//!
//! Column names follow the published files exactly. Empty numeric cells
//! decode as 0. A row that cannot be decoded (unparsable or non-finite
//! number, wrong field count, missing required column) is a malformed
//! record: it is logged and skipped, and decoding continues.

use super::SourceKind;
use eidx_common::{
    Error, OnetTaskRecord, SocStructureRecord, TaskSignalRecord, TaskThinkingRecord,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

/// Decoded rows of one table plus the number of rows skipped as malformed
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct TaskSignalRow {
    task_name: String,
    feedback_loop: Option<f64>,
    directive: Option<f64>,
    task_iteration: Option<f64>,
    validation: Option<f64>,
    learning: Option<f64>,
    filtered: Option<f64>,
}

impl TryFrom<TaskSignalRow> for TaskSignalRecord {
    type Error = String;

    fn try_from(row: TaskSignalRow) -> Result<Self, Self::Error> {
        Ok(TaskSignalRecord {
            task_name: row.task_name,
            feedback_loop: finite_or_zero("feedback_loop", row.feedback_loop)?,
            directive: finite_or_zero("directive", row.directive)?,
            task_iteration: finite_or_zero("task_iteration", row.task_iteration)?,
            validation: finite_or_zero("validation", row.validation)?,
            learning: finite_or_zero("learning", row.learning)?,
            filtered: finite_or_zero("filtered", row.filtered)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OnetTaskRow {
    #[serde(rename = "O*NET-SOC Code")]
    code: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Task")]
    task: String,
}

impl TryFrom<OnetTaskRow> for OnetTaskRecord {
    type Error = String;

    fn try_from(row: OnetTaskRow) -> Result<Self, Self::Error> {
        Ok(OnetTaskRecord {
            occupation_code: row.code,
            occupation_title: row.title,
            task: row.task,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SocStructureRow {
    #[serde(rename = "Major Group")]
    major_group: Option<String>,
    #[serde(rename = "SOC or O*NET-SOC 2019 Title")]
    title: Option<String>,
}

impl TryFrom<SocStructureRow> for SocStructureRecord {
    type Error = String;

    fn try_from(row: SocStructureRow) -> Result<Self, Self::Error> {
        Ok(SocStructureRecord {
            major_group: row.major_group.unwrap_or_default().trim().to_string(),
            title: row.title.unwrap_or_default().trim().to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TaskThinkingRow {
    task_name: String,
    thinking_fraction: Option<f64>,
}

impl TryFrom<TaskThinkingRow> for TaskThinkingRecord {
    type Error = String;

    fn try_from(row: TaskThinkingRow) -> Result<Self, Self::Error> {
        Ok(TaskThinkingRecord {
            task_name: row.task_name,
            thinking_fraction: finite_or_zero("thinking_fraction", row.thinking_fraction)?,
        })
    }
}

fn finite_or_zero(column: &str, value: Option<f64>) -> Result<f64, String> {
    match value {
        None => Ok(0.0),
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(format!("{} is not a finite number: {}", column, v)),
    }
}

/// Decode the automation-vs-augmentation signal table
pub fn read_task_signals(text: &str) -> ParsedTable<TaskSignalRecord> {
    read_table::<TaskSignalRow, _>(SourceKind::TaskAutomation, text)
}

/// Decode the O*NET task statement table
pub fn read_onet_tasks(text: &str) -> ParsedTable<OnetTaskRecord> {
    read_table::<OnetTaskRow, _>(SourceKind::OnetTasks, text)
}

/// Decode the SOC structure table
pub fn read_soc_structure(text: &str) -> ParsedTable<SocStructureRecord> {
    read_table::<SocStructureRow, _>(SourceKind::SocStructure, text)
}

/// Decode the task thinking-fraction table
pub fn read_task_thinking(text: &str) -> ParsedTable<TaskThinkingRecord> {
    read_table::<TaskThinkingRow, _>(SourceKind::TaskThinking, text)
}

fn read_table<R, T>(kind: SourceKind, text: &str) -> ParsedTable<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = String>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, row) in reader.deserialize::<R>().enumerate() {
        // Header is line 1
        let fallback_line = index as u64 + 2;

        let decoded = match row {
            Ok(row) => T::try_from(row).map_err(|reason| (fallback_line, reason)),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                Err((line, e.to_string()))
            }
        };

        match decoded {
            Ok(record) => records.push(record),
            Err((row, reason)) => {
                skipped += 1;
                let err = Error::MalformedRecord {
                    source_name: kind.file_name().to_string(),
                    row,
                    reason,
                };
                warn!("{}", err);
            }
        }
    }

    ParsedTable { records, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNAL_HEADER: &str =
        "task_name,feedback_loop,directive,task_iteration,validation,learning,filtered\n";

    #[test]
    fn test_task_signals_decode() {
        let text = format!(
            "{}Review contracts,0.9,0.5,0.2,0.1,0.1,0.0\nDraft memos,0.1,0.2,0.7,0.8,0.3,0.5\n",
            SIGNAL_HEADER
        );

        let parsed = read_task_signals(&text);

        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.records.len(), 2);
        let first = &parsed.records[0];
        assert_eq!(first.task_name, "Review contracts");
        assert_eq!(first.feedback_loop, 0.9);
        assert_eq!(first.directive, 0.5);
        assert_eq!(first.task_iteration, 0.2);
        assert_eq!(first.validation, 0.1);
        assert_eq!(first.learning, 0.1);
        assert_eq!(first.filtered, 0.0);
    }

    #[test]
    fn test_empty_numeric_cells_read_as_zero() {
        let text = format!("{}Sort mail,,0.4,,,,\n", SIGNAL_HEADER);

        let parsed = read_task_signals(&text);

        assert_eq!(parsed.skipped, 0);
        let record = &parsed.records[0];
        assert_eq!(record.feedback_loop, 0.0);
        assert_eq!(record.directive, 0.4);
        assert_eq!(record.filtered, 0.0);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = format!(
            "{}Good row,0.1,0.2,0.3,0.4,0.5,0.0\nBad number,abc,0.2,0.3,0.4,0.5,0.0\nToo few,0.1\nNot finite,NaN,0.2,0.3,0.4,0.5,0.0\nAnother good,0.5,0.5,0.5,0.5,0.5,0.1\n",
            SIGNAL_HEADER
        );

        let parsed = read_task_signals(&text);

        assert_eq!(parsed.skipped, 3);
        let names: Vec<_> = parsed.records.iter().map(|r| r.task_name.as_str()).collect();
        assert_eq!(names, vec!["Good row", "Another good"]);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let text = format!(
            "{}\nReview contracts,0.9,0.5,0.2,0.1,0.1,0.0\n\n",
            SIGNAL_HEADER
        );

        let parsed = read_task_signals(&text);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn test_onet_columns_and_quoting() {
        let text = "O*NET-SOC Code,Title,Task,Task Type\n\
                    13-2011.00,Accountants,\"Review, verify, and reconcile accounts\",Core\n";

        let parsed = read_onet_tasks(text);

        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.records[0].occupation_code, "13-2011.00");
        assert_eq!(parsed.records[0].occupation_title, "Accountants");
        assert_eq!(parsed.records[0].task, "Review, verify, and reconcile accounts");
    }

    #[test]
    fn test_onet_missing_column_skips_rows() {
        let text = "O*NET-SOC Code,Title\n13-2011.00,Accountants\n";

        let parsed = read_onet_tasks(text);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_soc_structure_blank_major_group() {
        let text = "Major Group,Minor Group,SOC or O*NET-SOC 2019 Title\n\
                    13-0000,,Business and Financial Operations Occupations\n\
                    ,13-1000,Business Operations Specialists\n";

        let parsed = read_soc_structure(text);

        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.records[0].major_group, "13-0000");
        assert_eq!(parsed.records[1].major_group, "");
        assert_eq!(parsed.records[1].title, "Business Operations Specialists");
    }

    #[test]
    fn test_task_thinking_decode() {
        let text = "task_name,thinking_fraction\nReview contracts,0.35\nSort mail,\n";

        let parsed = read_task_thinking(text);

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].thinking_fraction, 0.35);
        assert_eq!(parsed.records[1].thinking_fraction, 0.0);
    }
}
