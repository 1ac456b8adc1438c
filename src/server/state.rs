//! Application state for the gateway server

use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::providers::{AttachmentPipeline, EsClient, PipelineClient, SearchStore};
use crate::store::FileStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    settings: Settings,
    /// Search engine document and index operations
    search: Arc<dyn SearchStore>,
    /// Attachment ingestion pipelines
    pipeline: Arc<dyn AttachmentPipeline>,
    /// Raw upload storage
    files: FileStore,
}

impl AppState {
    /// Create state wired to real Elasticsearch clients
    pub fn new(settings: Settings) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let search: Arc<dyn SearchStore> = Arc::new(EsClient::new(&settings.elasticsearch)?);
        tracing::info!(
            "Elasticsearch client initialized ({})",
            settings.elasticsearch.base_url()
        );

        let pipeline: Arc<dyn AttachmentPipeline> =
            Arc::new(PipelineClient::new(&settings.elasticsearch)?);

        let files = FileStore::new(settings.server.uploads_dir.clone());

        Ok(Self::with_providers(settings, search, pipeline, files))
    }

    /// Create state with explicit provider handles (tests swap in fakes here)
    pub fn with_providers(
        settings: Settings,
        search: Arc<dyn SearchStore>,
        pipeline: Arc<dyn AttachmentPipeline>,
        files: FileStore,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                settings,
                search,
                pipeline,
                files,
            }),
        }
    }

    /// Get configuration
    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    /// Get the search store
    pub fn search(&self) -> &Arc<dyn SearchStore> {
        &self.inner.search
    }

    /// Get the attachment pipeline
    pub fn pipeline(&self) -> &Arc<dyn AttachmentPipeline> {
        &self.inner.pipeline
    }

    /// Get the file store
    pub fn files(&self) -> &FileStore {
        &self.inner.files
    }
}
