//! Provider abstractions over the search engine
//!
//! The HTTP layer talks to Elasticsearch only through these traits, so tests
//! can swap in-memory fakes for the real clients.

pub mod elastic;
pub mod pipeline;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::AttachmentRecord;

pub use elastic::EsClient;
pub use pipeline::PipelineClient;

/// Document and index operations of the search engine
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Whether the named index exists
    async fn index_exists(&self, index: &str) -> Result<bool>;

    /// Create the named index with default settings
    async fn create_index(&self, index: &str) -> Result<()>;

    /// Index one document, letting the engine assign its id
    async fn index_document(&self, index: &str, document: &Value) -> Result<()>;

    /// Make recently indexed documents searchable
    async fn refresh_index(&self, index: &str) -> Result<()>;

    /// Run a query and return the raw hit objects
    async fn search(&self, index: &str, query: &Value) -> Result<Vec<Value>>;

    /// Retrieve the source of every document in the index
    async fn scan(&self, index: &str) -> Result<Vec<Value>>;

    /// Create the index if it does not exist yet. Safe to call repeatedly;
    /// the existence check runs every time.
    async fn ensure_index(&self, index: &str) -> Result<()> {
        if self.index_exists(index).await? {
            tracing::debug!("The index '{}' already exists", index);
        } else {
            tracing::info!("The index '{}' does not exist, creating it", index);
            self.create_index(index).await?;
        }
        Ok(())
    }
}

/// Outcome of one ingestion pipeline invocation.
///
/// Network-level failures are part of the value, not the error channel: the
/// upload flow logs them and carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The engine answered with this HTTP status
    Completed(u16),
    /// The request never reached the engine
    Unreachable(String),
}

impl PipelineOutcome {
    /// Only a plain 200 counts as success
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Completed(200))
    }
}

impl std::fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineOutcome::Completed(status) => write!(f, "status code {}", status),
            PipelineOutcome::Unreachable(reason) => write!(f, "unreachable: {}", reason),
        }
    }
}

/// Attachment ingestion pipelines of the search engine
#[async_trait]
pub trait AttachmentPipeline: Send + Sync {
    /// Send an attachment through the named pipeline of an index. Transport
    /// failures come back as [`PipelineOutcome::Unreachable`], never as an
    /// error.
    async fn invoke(
        &self,
        index: &str,
        pipeline: &str,
        record: &AttachmentRecord,
    ) -> PipelineOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CountingStore {
        existing: Mutex<Vec<String>>,
        create_calls: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                existing: Mutex::new(Vec::new()),
                create_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SearchStore for CountingStore {
        async fn index_exists(&self, index: &str) -> Result<bool> {
            Ok(self.existing.lock().unwrap().iter().any(|i| i == index))
        }

        async fn create_index(&self, index: &str) -> Result<()> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.existing.lock().unwrap().push(index.to_string());
            Ok(())
        }

        async fn index_document(&self, _index: &str, _document: &Value) -> Result<()> {
            Ok(())
        }

        async fn refresh_index(&self, _index: &str) -> Result<()> {
            Ok(())
        }

        async fn search(&self, _index: &str, _query: &Value) -> Result<Vec<Value>> {
            Ok(Vec::new())
        }

        async fn scan(&self, _index: &str) -> Result<Vec<Value>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_ensure_index_is_idempotent() {
        let store = CountingStore::new();

        store.ensure_index("docs").await.unwrap();
        store.ensure_index("docs").await.unwrap();

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.existing.lock().unwrap().as_slice(), ["docs"]);
    }

    #[test]
    fn test_only_plain_200_is_success() {
        assert!(PipelineOutcome::Completed(200).is_success());
        assert!(!PipelineOutcome::Completed(201).is_success());
        assert!(!PipelineOutcome::Completed(500).is_success());
        assert!(!PipelineOutcome::Unreachable("connection refused".to_string()).is_success());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(PipelineOutcome::Completed(500).to_string(), "status code 500");
        assert_eq!(
            PipelineOutcome::Unreachable("timed out".to_string()).to_string(),
            "unreachable: timed out"
        );
    }
}
