//! Shared fixtures for eidx-ra integration tests
//!
//! The fixture dataset has five signal rows:
//! - "Review quarterly financial contracts": links to Accountants by fallback
//! - "Prepare tax returns": filtered 0.85, excluded
//! - "Teach students algebra": exact link, high augmentation
//! - "Grade student essays": exact link, balanced
//! - "Juggle flaming torches": no occupation

#![allow(dead_code)]

use eidx_ra::sources::{MemorySource, SourceKind};

pub const SIGNAL_HEADER: &str =
    "task_name,feedback_loop,directive,task_iteration,validation,learning,filtered\n";

pub const TASK_SIGNALS: &str = "task_name,feedback_loop,directive,task_iteration,validation,learning,filtered
Review quarterly financial contracts,0.9,0.5,0.2,0.1,0.1,0.0
Prepare tax returns,0.9,0.5,0.2,0.1,0.1,0.85
Teach students algebra,0.1,0.1,0.9,0.4,0.3,0.0
Grade student essays,0.4,0.3,0.5,0.2,0.1,0.0
Juggle flaming torches,0.95,0.1,0.0,0.0,0.0,0.0
";

pub const ONET_TASKS: &str = "O*NET-SOC Code,Title,Task
13-2011.00,Accountants,Review quarterly financial contracts for accuracy
13-2011.00,Accountants,Prepare tax returns
25-2031.00,Secondary School Teachers,Teach students algebra
25-2031.00,Secondary School Teachers,Grade student essays
";

pub const SOC_STRUCTURE: &str = "Major Group,SOC or O*NET-SOC 2019 Title
13-0000,Business and Financial Operations Occupations
25-0000,Educational Instruction and Library Occupations
";

pub const TASK_THINKING: &str = "task_name,thinking_fraction
Teach students algebra,0.4
";

pub const ACCOUNTANTS: &str = "13-2011.00";
pub const TEACHERS: &str = "25-2031.00";

/// Memory source holding the fixture tables, with `signals` as the signal table
pub fn source_with_signals(signals: impl Into<String>) -> MemorySource {
    MemorySource::new()
        .with_table(SourceKind::TaskAutomation, signals.into())
        .with_table(SourceKind::OnetTasks, ONET_TASKS)
        .with_table(SourceKind::SocStructure, SOC_STRUCTURE)
        .with_table(SourceKind::TaskThinking, TASK_THINKING)
}

/// Memory source holding the full fixture dataset
pub fn fixture_source() -> MemorySource {
    source_with_signals(TASK_SIGNALS)
}

/// Signal table with `count` identical rows of the given signals
pub fn repeated_signals(count: usize, row: &str) -> String {
    let mut table = SIGNAL_HEADER.to_string();
    for i in 0..count {
        table.push_str(&format!("Repeated task {},{}\n", i, row));
    }
    table
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
