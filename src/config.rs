//! Configuration for the gateway

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::DocKind;

/// Top-level settings, loaded from a TOML file at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerSettings,
    /// Elasticsearch connection and index names
    pub elasticsearch: ElasticsearchSettings,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
    /// Directory raw uploads are written under
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_enable_cors() -> bool {
    true
}
fn default_max_upload_size() -> usize {
    100 * 1024 * 1024
}
fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
            max_upload_size: default_max_upload_size(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

/// Elasticsearch connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchSettings {
    /// Cluster host name
    pub host: String,
    /// Cluster port
    pub port: u16,
    /// Index for flattened XML documents
    pub xml_index: String,
    /// Index for DOCX attachments
    pub docx_index: String,
    /// Index for PDF attachments
    pub pdf_index: String,
    /// Path to the PEM CA certificate the cluster is verified against
    pub ca_cert: PathBuf,
    /// Basic auth username
    pub username: String,
    /// Basic auth password
    pub password: String,
}

impl ElasticsearchSettings {
    /// Base URL of the cluster
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }

    /// Index name for a document kind
    pub fn index_for(&self, kind: DocKind) -> &str {
        match kind {
            DocKind::Xml => &self.xml_index,
            DocKind::Docx => &self.docx_index,
            DocKind::Pdf => &self.pdf_index,
        }
    }

    /// All configured index names
    pub fn indices(&self) -> [&str; 3] {
        [&self.xml_index, &self.docx_index, &self.pdf_index]
    }
}
