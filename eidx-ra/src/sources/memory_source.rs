//! In-memory tabular source
//!
//! Serves CSV text held in memory. Used by tests and demos; also counts
//! fetches per table so cache behavior can be observed.

use super::{SourceKind, TabularSource};
use async_trait::async_trait;
use eidx_common::{Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct MemorySource {
    tables: HashMap<SourceKind, Arc<str>>,
    fetches: HashMap<SourceKind, AtomicUsize>,
}

impl MemorySource {
    pub fn new() -> Self {
        let fetches = SourceKind::ALL
            .iter()
            .map(|kind| (*kind, AtomicUsize::new(0)))
            .collect();

        Self {
            tables: HashMap::new(),
            fetches,
        }
    }

    /// Builder: serve `text` for `kind`
    pub fn with_table(mut self, kind: SourceKind, text: impl Into<Arc<str>>) -> Self {
        self.tables.insert(kind, text.into());
        self
    }

    /// Number of fetch calls seen for `kind`, including failed ones
    pub fn fetch_count(&self, kind: SourceKind) -> usize {
        self.fetches
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabularSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, kind: SourceKind) -> Result<Arc<str>> {
        if let Some(counter) = self.fetches.get(&kind) {
            counter.fetch_add(1, Ordering::SeqCst);
        }

        self.tables
            .get(&kind)
            .cloned()
            .ok_or_else(|| Error::source_unavailable(kind.file_name(), "table not loaded"))
    }
}
