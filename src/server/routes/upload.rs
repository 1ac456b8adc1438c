//! Multipart upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::flatten;
use crate::server::state::AppState;
use crate::types::{AttachmentKind, AttachmentRecord, DocKind, UploadResponse};

/// POST /upload - Process up to three file parts: `xml_file`, `docx_file`,
/// `pdf_file`
///
/// XML is flattened and indexed directly; DOCX and PDF go through the
/// engine's ingestion pipelines for text extraction. Every part is also kept
/// raw on disk. A pipeline failure is logged but does not fail the upload.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    // Every upload starts by making sure all three indices exist, whether or
    // not the matching part is present
    for index in state.settings().elasticsearch.indices() {
        state.search().ensure_index(index).await?;
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Multipart(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| name.clone());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Multipart(format!("Failed to read file '{}': {}", filename, e)))?;

        match name.as_str() {
            "xml_file" => process_xml(&state, &filename, &data).await?,
            "docx_file" => process_attachment(&state, AttachmentKind::Docx, &filename, &data).await?,
            "pdf_file" => process_attachment(&state, AttachmentKind::Pdf, &filename, &data).await?,
            other => {
                tracing::debug!("Ignoring unknown multipart field '{}'", other);
            }
        }
    }

    Ok(Json(UploadResponse::success()))
}

/// Flatten the XML, index the result, refresh, and keep the raw file
async fn process_xml(state: &AppState, filename: &str, data: &[u8]) -> Result<()> {
    tracing::info!("Processing XML file: {} ({} bytes)", filename, data.len());

    let text = std::str::from_utf8(data)
        .map_err(|e| Error::Xml(format!("XML is not valid UTF-8: {}", e)))?;
    let root = flatten::parse_document(text)?;
    let mut document = flatten::flatten(&root);

    // The indexed document carries its own serialized form; computed before
    // insertion, so Content does not contain itself
    let serialized = serde_json::to_string(&document)?;
    document.insert("Content".to_string(), Value::String(serialized));

    let index = &state.settings().elasticsearch.xml_index;
    state
        .search()
        .index_document(index, &Value::Object(document))
        .await?;

    // Refresh so the document is searchable right away
    state.search().refresh_index(index).await?;

    state.files().store(DocKind::Xml, filename, data).await?;

    Ok(())
}

/// Keep the raw file, then hand the bytes to the type-specific ingestion
/// pipeline
async fn process_attachment(
    state: &AppState,
    kind: AttachmentKind,
    filename: &str,
    data: &[u8],
) -> Result<()> {
    tracing::info!(
        "Processing {} attachment: {} ({} bytes)",
        kind,
        filename,
        data.len()
    );

    state.files().store(kind.doc_kind(), filename, data).await?;

    let record = AttachmentRecord::from_bytes(filename, data);
    let index = state.settings().elasticsearch.index_for(kind.doc_kind());
    let outcome = state
        .pipeline()
        .invoke(index, kind.pipeline(), &record)
        .await;

    if outcome.is_success() {
        tracing::info!(
            "Elasticsearch {} ingestion pipeline executed successfully",
            kind
        );
    } else {
        tracing::warn!(
            "Elasticsearch {} ingestion pipeline execution failed: {}",
            kind,
            outcome
        );
    }

    Ok(())
}
