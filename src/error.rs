//! Error types for the gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the gateway
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loading or client construction failed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Uploaded XML could not be parsed
    #[error("XML error: {0}")]
    Xml(String),

    /// An Elasticsearch request failed or returned an unexpected status
    #[error("Search engine error: {0}")]
    Search(String),

    /// The multipart body could not be read
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// Filesystem failure while storing an upload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status this error maps to
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::Search(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_)
            | Error::Xml(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!("Request failed: {}", self);
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::Multipart("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Search("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::Xml("broken".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Config("missing".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
