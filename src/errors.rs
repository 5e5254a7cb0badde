use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Top-level application error.
/// All variants carry a human-readable message for display/logging.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Storage errors ───────────────────────────────────────────────────────
    #[error("Failed to store document '{filename}': {source}")]
    StorageFailed {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read stored document '{id}': {source}")]
    StorageReadFailed {
        id: String,
        #[source]
        source: std::io::Error,
    },

    // ── Lookup errors ────────────────────────────────────────────────────────
    #[error("Document '{id}' not found")]
    DocumentNotFound { id: String },

    #[error("Session '{id}' not found")]
    SessionNotFound { id: String },

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong { field_name: String, max_length: usize, actual_length: usize },

    #[error("Only PDF files are allowed.")]
    NotPdf { filename: String },

    #[error("File size must be less than {}.", format_limit(.max_bytes))]
    FileTooLarge { max_bytes: usize },

    #[error("Malformed upload: {message}")]
    InvalidMultipart { message: String },
}

fn format_limit(bytes: &usize) -> String {
    const MIB: usize = 1024 * 1024;
    let bytes = *bytes;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

impl AppError {
    pub fn storage(filename: impl Into<String>, source: std::io::Error) -> Self {
        AppError::StorageFailed { filename: filename.into(), source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::DocumentNotFound { .. } | AppError::SessionNotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::EmptyField { .. }
                | AppError::FieldTooLong { .. }
                | AppError::NotPdf { .. }
                | AppError::InvalidMultipart { .. }
        )
    }

    pub fn is_too_large(&self) -> bool {
        matches!(self, AppError::FileTooLarge { .. })
    }

    pub fn status(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else if self.is_too_large() {
            StatusCode::PAYLOAD_TOO_LARGE
        } else if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Renders as `{ "error": "..." }`. Storage failures are logged in full and
/// reported with a generic message so server paths never reach the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
