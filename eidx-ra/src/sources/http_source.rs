//! HTTP tabular source
//!
//! Fetches the published CSV files from the Economic Index dataset release.
//! Every request carries a timeout so a stalled server surfaces as
//! [`Error::SourceUnavailable`] instead of hanging the pipeline.

use super::{SourceKind, TabularSource};
use async_trait::async_trait;
use eidx_common::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("eidx-ra/", env!("CARGO_PKG_VERSION"));

/// HTTP source client
pub struct HttpSource {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a client for `base_url` with the given request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client init failed: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Full URL of the table for `kind`
    pub fn url_for(&self, kind: SourceKind) -> String {
        format!("{}/{}", self.base_url, kind.file_name())
    }
}

#[async_trait]
impl TabularSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, kind: SourceKind) -> Result<Arc<str>> {
        let url = self.url_for(kind);

        tracing::debug!(source = %kind, url = %url, "Fetching source table");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::source_unavailable(kind.file_name(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::source_unavailable(
                kind.file_name(),
                format!("HTTP {} from {}", status, url),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::source_unavailable(kind.file_name(), e.to_string()))?;

        tracing::info!(source = %kind, bytes = text.len(), "Fetched source table");

        Ok(Arc::from(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpSource::new("https://example.org/data", Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_joins_file_name() {
        let client = HttpSource::new("https://example.org/data/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url_for(SourceKind::OnetTasks),
            "https://example.org/data/onet_task_statements.csv"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_source_unavailable() {
        // Port 9 (discard) on localhost is normally closed
        let client = HttpSource::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        let err = client.fetch(SourceKind::TaskAutomation).await.unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }
}
