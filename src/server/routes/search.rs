//! Listing and term-search endpoints
//!
//! Listing endpoints scan the whole index and return every document's
//! source; term searches return the engine's raw hit objects.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::Result;
use crate::server::state::AppState;

/// Nested keyword field the XML term search matches exactly
const XML_SEARCH_FIELD: &str = "Header.DocumentaryUnitType.keyword";
/// Field the attachment free-text searches run against, filled in by the
/// ingestion pipelines
const ATTACHMENT_SEARCH_FIELD: &str = "attachment.content";

/// GET /xml-index - every indexed XML document
pub async fn list_xml_documents(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    scan_index(&state, &state.settings().elasticsearch.xml_index).await
}

/// GET /xml-index/:term - exact match on the documentary unit type
pub async fn search_xml_documents(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<Vec<Value>>> {
    let query = json!({
        "query": {
            "match": {
                XML_SEARCH_FIELD: term
            }
        }
    });
    let hits = state
        .search()
        .search(&state.settings().elasticsearch.xml_index, &query)
        .await?;
    Ok(Json(hits))
}

/// GET /docx-attachments - every indexed DOCX attachment
pub async fn list_docx_attachments(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    scan_index(&state, &state.settings().elasticsearch.docx_index).await
}

/// GET /docx-attachments/:term - free-text search over extracted DOCX content
pub async fn search_docx_attachments(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<Vec<Value>>> {
    search_attachments(&state, &state.settings().elasticsearch.docx_index, &term).await
}

/// GET /pdf-attachments - every indexed PDF attachment
pub async fn list_pdf_attachments(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    scan_index(&state, &state.settings().elasticsearch.pdf_index).await
}

/// GET /pdf-attachments/:term - free-text search over extracted PDF content
pub async fn search_pdf_attachments(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<Vec<Value>>> {
    search_attachments(&state, &state.settings().elasticsearch.pdf_index, &term).await
}

async fn scan_index(state: &AppState, index: &str) -> Result<Json<Vec<Value>>> {
    let items = state.search().scan(index).await?;
    Ok(Json(items))
}

async fn search_attachments(state: &AppState, index: &str, term: &str) -> Result<Json<Vec<Value>>> {
    let query = json!({
        "query": {
            "query_string": {
                "default_field": ATTACHMENT_SEARCH_FIELD,
                "query": term
            }
        }
    });
    let hits = state.search().search(index, &query).await?;
    Ok(Json(hits))
}
