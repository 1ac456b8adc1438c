//! API routes for the document gateway

pub mod search;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload - with larger body limit for multipart file parts
        .route(
            "/upload",
            post(upload::upload_files).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // XML documents
        .route("/xml-index", get(search::list_xml_documents))
        .route("/xml-index/:term", get(search::search_xml_documents))
        // DOCX attachments
        .route("/docx-attachments", get(search::list_docx_attachments))
        .route("/docx-attachments/:term", get(search::search_docx_attachments))
        // PDF attachments
        .route("/pdf-attachments", get(search::list_pdf_attachments))
        .route("/pdf-attachments/:term", get(search::search_pdf_attachments))
}
