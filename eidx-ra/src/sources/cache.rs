//! Raw-source cache
//!
//! Memoizes the raw text of each table keyed by [`SourceKind`]. Entries
//! expire after an optional TTL and can be dropped individually or all at
//! once. Whoever builds the [`CachedSource`] owns the cache.

use super::{SourceKind, TabularSource};
use async_trait::async_trait;
use eidx_common::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct CacheEntry {
    text: Arc<str>,
    fetched_at: Instant,
}

/// Shared cache of raw table text
#[derive(Debug)]
pub struct SourceCache {
    /// `None` keeps entries until cleared
    ttl: Option<Duration>,
    entries: RwLock<HashMap<SourceKind, CacheEntry>>,
}

impl SourceCache {
    /// Create a cache whose entries expire after `ttl`
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cache whose entries never expire on their own
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match self.ttl {
            Some(ttl) => entry.fetched_at.elapsed() < ttl,
            None => true,
        }
    }

    /// Cached text for `kind`, unless absent or expired
    pub async fn get(&self, kind: SourceKind) -> Option<Arc<str>> {
        let entries = self.entries.read().await;
        entries
            .get(&kind)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| Arc::clone(&entry.text))
    }

    /// Store text for `kind`, replacing any previous entry
    pub async fn insert(&self, kind: SourceKind, text: Arc<str>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            kind,
            CacheEntry {
                text,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for `kind`; returns whether one was present
    pub async fn invalidate(&self, kind: SourceKind) -> bool {
        let removed = self.entries.write().await.remove(&kind).is_some();
        if removed {
            debug!(source = %kind, "Invalidated cached source");
        }
        removed
    }

    /// Drop every entry; returns how many were present
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        info!(cleared = count, "Source cache cleared");
        count
    }

    /// Number of fresh entries
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| self.is_fresh(e)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A [`TabularSource`] that consults a [`SourceCache`] before its inner source
///
/// Concurrent misses for the same table are serialized so the inner source
/// is fetched at most once per fresh entry.
pub struct CachedSource {
    inner: Arc<dyn TabularSource>,
    cache: Arc<SourceCache>,
    fetch_locks: HashMap<SourceKind, Mutex<()>>,
}

impl CachedSource {
    pub fn new(inner: Arc<dyn TabularSource>, cache: Arc<SourceCache>) -> Self {
        let fetch_locks = SourceKind::ALL
            .iter()
            .map(|kind| (*kind, Mutex::new(())))
            .collect();

        Self {
            inner,
            cache,
            fetch_locks,
        }
    }

    pub fn cache(&self) -> &Arc<SourceCache> {
        &self.cache
    }
}

#[async_trait]
impl TabularSource for CachedSource {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch(&self, kind: SourceKind) -> Result<Arc<str>> {
        if let Some(text) = self.cache.get(kind).await {
            debug!(source = %kind, "Source cache hit");
            return Ok(text);
        }

        let _guard = match self.fetch_locks.get(&kind) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        // Another caller may have filled the entry while we waited
        if let Some(text) = self.cache.get(kind).await {
            debug!(source = %kind, "Source cache hit after wait");
            return Ok(text);
        }

        debug!(source = %kind, "Source cache miss");
        let text = self.inner.fetch(kind).await?;
        self.cache.insert(kind, Arc::clone(&text)).await;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemorySource;

    fn memory_source() -> Arc<MemorySource> {
        Arc::new(
            MemorySource::new()
                .with_table(SourceKind::OnetTasks, "O*NET-SOC Code,Title,Task\n")
                .with_table(SourceKind::TaskThinking, "task_name,thinking_fraction\n"),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = SourceCache::unbounded();
        assert!(cache.get(SourceKind::OnetTasks).await.is_none());

        cache.insert(SourceKind::OnetTasks, Arc::from("a,b\n")).await;

        assert_eq!(cache.get(SourceKind::OnetTasks).await.as_deref(), Some("a,b\n"));
        assert!(cache.get(SourceKind::TaskThinking).await.is_none());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = SourceCache::new(Some(Duration::from_millis(50)));
        cache.insert(SourceKind::OnetTasks, Arc::from("x")).await;
        assert!(cache.get(SourceKind::OnetTasks).await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(cache.get(SourceKind::OnetTasks).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = SourceCache::unbounded();
        cache.insert(SourceKind::OnetTasks, Arc::from("x")).await;
        cache.insert(SourceKind::TaskThinking, Arc::from("y")).await;

        assert!(cache.invalidate(SourceKind::OnetTasks).await);
        assert!(!cache.invalidate(SourceKind::OnetTasks).await);
        assert_eq!(cache.len().await, 1);

        assert_eq!(cache.clear().await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cached_source_fetches_inner_once() {
        let inner = memory_source();
        let cache = Arc::new(SourceCache::unbounded());
        let source = CachedSource::new(inner.clone(), cache.clone());

        for _ in 0..3 {
            let text = source.fetch(SourceKind::OnetTasks).await.unwrap();
            assert_eq!(&*text, "O*NET-SOC Code,Title,Task\n");
        }

        assert_eq!(inner.fetch_count(SourceKind::OnetTasks), 1);
    }

    #[tokio::test]
    async fn test_cached_source_refetches_after_clear() {
        let inner = memory_source();
        let cache = Arc::new(SourceCache::unbounded());
        let source = CachedSource::new(inner.clone(), cache.clone());

        source.fetch(SourceKind::TaskThinking).await.unwrap();
        cache.clear().await;
        source.fetch(SourceKind::TaskThinking).await.unwrap();

        assert_eq!(inner.fetch_count(SourceKind::TaskThinking), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_fetch_once() {
        let inner = memory_source();
        let cache = Arc::new(SourceCache::unbounded());
        let source = Arc::new(CachedSource::new(inner.clone(), cache));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let source = Arc::clone(&source);
            handles.push(tokio::spawn(async move {
                source.fetch(SourceKind::OnetTasks).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(inner.fetch_count(SourceKind::OnetTasks), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let inner = memory_source();
        let cache = Arc::new(SourceCache::unbounded());
        let source = CachedSource::new(inner.clone(), cache.clone());

        assert!(source.fetch(SourceKind::SocStructure).await.is_err());
        assert!(source.fetch(SourceKind::SocStructure).await.is_err());

        assert_eq!(inner.fetch_count(SourceKind::SocStructure), 2);
        assert!(cache.is_empty().await);
    }
}
