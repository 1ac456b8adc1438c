//! Attachment ingestion pipeline invoker
//!
//! Writes the base64 payload to `{index}/_doc/1?pipeline={name}`; the engine
//! runs the named pipeline to extract text before indexing.

use async_trait::async_trait;
use reqwest::{Certificate, Client};

use crate::config::ElasticsearchSettings;
use crate::error::{Error, Result};
use crate::types::AttachmentRecord;

use super::{AttachmentPipeline, PipelineOutcome};

/// Document id every pipeline write targets. Each new attachment of a kind
/// overwrites the previous one in its index.
/// TODO: derive the id from the filename once consumers of the attachment
/// indices confirm they expect more than the latest document.
const PIPELINE_DOC_ID: &str = "1";

/// Pipeline client backing the [`AttachmentPipeline`] trait
pub struct PipelineClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl PipelineClient {
    /// Build a client from settings, pinning TLS to the configured CA
    /// certificate
    pub fn new(settings: &ElasticsearchSettings) -> Result<Self> {
        let pem = std::fs::read(&settings.ca_cert).map_err(|e| {
            Error::Config(format!(
                "Failed to read CA certificate {}: {}",
                settings.ca_cert.display(),
                e
            ))
        })?;
        let ca = Certificate::from_pem(&pem)
            .map_err(|e| Error::Config(format!("Invalid CA certificate: {}", e)))?;

        let client = Client::builder()
            .add_root_certificate(ca)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::from_parts(
            client,
            settings.base_url(),
            settings.username.clone(),
            settings.password.clone(),
        ))
    }

    /// Build from an existing HTTP client and connection details
    pub fn from_parts(client: Client, base_url: String, username: String, password: String) -> Self {
        Self {
            client,
            base_url,
            username,
            password,
        }
    }
}

#[async_trait]
impl AttachmentPipeline for PipelineClient {
    async fn invoke(
        &self,
        index: &str,
        pipeline: &str,
        record: &AttachmentRecord,
    ) -> PipelineOutcome {
        let url = format!(
            "{}/{}/_doc/{}?pipeline={}",
            self.base_url, index, PIPELINE_DOC_ID, pipeline
        );

        match self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(record)
            .send()
            .await
        {
            Ok(response) => PipelineOutcome::Completed(response.status().as_u16()),
            Err(e) => {
                tracing::error!("Error occurred during the pipeline request: {}", e);
                PipelineOutcome::Unreachable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_network_failure_is_unreachable_not_error() {
        // Nothing listens on the discard port, so the connection is refused
        let client = PipelineClient::from_parts(
            Client::new(),
            "https://127.0.0.1:9".to_string(),
            "elastic".to_string(),
            "changeme".to_string(),
        );

        let record = AttachmentRecord::from_bytes("report.docx", b"bytes");
        let outcome = client
            .invoke("docx-attachments", "docx_attachment_pipeline", &record)
            .await;

        assert!(matches!(outcome, PipelineOutcome::Unreachable(_)));
        assert!(!outcome.is_success());
    }
}
