//! Data service
//!
//! Async facade used by the HTTP layer: loads the dataset from the configured
//! source (through the raw-source cache when one is attached) and runs the
//! pipeline on the blocking pool.

use super::pipeline::AnalysisSnapshot;
use crate::sources::{load_dataset, CachedSource, SourceCache, TabularSource};
use eidx_common::{
    AutomationPartition, DataSummary, Error, MajorGroupSummary, OccupationSummary,
    RankedOccupation, Result,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct DataService {
    source: Arc<dyn TabularSource>,
}

impl DataService {
    /// Service reading straight from `source` on every call
    pub fn new(source: Arc<dyn TabularSource>) -> Self {
        Self { source }
    }

    /// Service reading through `cache`
    pub fn with_cache(source: Arc<dyn TabularSource>, cache: Arc<SourceCache>) -> Self {
        Self {
            source: Arc::new(CachedSource::new(source, cache)),
        }
    }

    /// Load the dataset and run the full pipeline
    pub async fn snapshot(&self) -> Result<AnalysisSnapshot> {
        let dataset = load_dataset(self.source.as_ref()).await?;

        tokio::task::spawn_blocking(move || AnalysisSnapshot::build(&dataset))
            .await
            .map_err(|e| Error::Internal(format!("Pipeline task failed: {}", e)))
    }

    pub async fn summary(&self) -> Result<DataSummary> {
        self.snapshot().await?.summary()
    }

    pub async fn occupation_summaries(&self) -> Result<Vec<OccupationSummary>> {
        Ok(self.snapshot().await?.occupation_summaries().to_vec())
    }

    /// Top `limit` occupations by average automation
    ///
    /// # Errors
    /// [`Error::InvalidInput`] when `limit` is 0; checked before any fetch.
    pub async fn top_risk_occupations(&self, limit: usize) -> Result<Vec<RankedOccupation>> {
        if limit == 0 {
            return Err(Error::InvalidInput("limit must be at least 1".to_string()));
        }
        Ok(self.snapshot().await?.top_risk_occupations(limit))
    }

    pub async fn automation_vs_augmentation(&self) -> Result<AutomationPartition> {
        Ok(self.snapshot().await?.automation_vs_augmentation())
    }

    pub async fn major_group_breakdown(&self) -> Result<Vec<MajorGroupSummary>> {
        Ok(self.snapshot().await?.major_group_breakdown())
    }
}
