//! Wire and domain types

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document kinds the gateway accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Xml,
    Docx,
    Pdf,
}

impl DocKind {
    /// Subdirectory raw files of this kind are stored under
    pub fn subdir(&self) -> &'static str {
        match self {
            DocKind::Xml => "xml",
            DocKind::Docx => "docx",
            DocKind::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subdir())
    }
}

/// Attachment kinds that go through an ingestion pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Docx,
    Pdf,
}

impl AttachmentKind {
    /// Name of the server-side ingestion pipeline for this kind
    pub fn pipeline(&self) -> &'static str {
        match self {
            AttachmentKind::Docx => "docx_attachment_pipeline",
            AttachmentKind::Pdf => "pdf_attachment_pipeline",
        }
    }

    /// The document kind this attachment is stored as
    pub fn doc_kind(&self) -> DocKind {
        match self {
            AttachmentKind::Docx => DocKind::Docx,
            AttachmentKind::Pdf => DocKind::Pdf,
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.doc_kind().subdir())
    }
}

/// Payload sent to an attachment ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRecord {
    /// Original upload filename
    pub filename: String,
    /// Base64-encoded file content
    pub data: String,
}

impl AttachmentRecord {
    /// Build a record from raw bytes, base64-encoding them
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

/// Response body for POST /upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

impl UploadResponse {
    /// The fixed message returned after an upload completes
    pub fn success() -> Self {
        Self {
            message: "Files processed and stored successfully.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdirs() {
        assert_eq!(DocKind::Xml.subdir(), "xml");
        assert_eq!(DocKind::Docx.subdir(), "docx");
        assert_eq!(DocKind::Pdf.subdir(), "pdf");
    }

    #[test]
    fn test_pipeline_names() {
        assert_eq!(AttachmentKind::Docx.pipeline(), "docx_attachment_pipeline");
        assert_eq!(AttachmentKind::Pdf.pipeline(), "pdf_attachment_pipeline");
    }

    #[test]
    fn test_attachment_record_encodes_base64() {
        let record = AttachmentRecord::from_bytes("report.docx", b"hello");
        assert_eq!(record.filename, "report.docx");
        assert_eq!(record.data, "aGVsbG8=");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["filename"], "report.docx");
        assert_eq!(json["data"], "aGVsbG8=");
    }

    #[test]
    fn test_upload_response_message() {
        let response = UploadResponse::success();
        assert_eq!(response.message, "Files processed and stored successfully.");
    }
}
