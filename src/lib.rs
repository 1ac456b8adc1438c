//! docgate: HTTP gateway for XML/DOCX/PDF ingestion and search over Elasticsearch
//!
//! Accepts multipart uploads, flattens XML into nested key-value documents,
//! keeps the raw files on local disk, and forwards DOCX/PDF content through
//! Elasticsearch ingestion pipelines for server-side text extraction.
//! Listing and search endpoints expose the three backing indices.

pub mod config;
pub mod error;
pub mod flatten;
pub mod providers;
pub mod server;
pub mod store;
pub mod types;

pub use config::Settings;
pub use error::{Error, Result};
pub use types::{AttachmentRecord, UploadResponse};
