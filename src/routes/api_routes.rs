use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::debug;

use crate::errors::AppError;
use crate::models::{ChatMessage, ChatRequest, ChatResponse, DocumentsResponse, UploadResponse};
use crate::routes::AppState;

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET `/` — health check
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "message": "Document Q&A server is running" }))
}

/// POST `/api/upload` — multipart `file` (PDF) plus optional `session_id`
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let max_bytes = state.documents.max_upload_bytes();
    let mut upload: Option<(String, String, Vec<u8>)> = None;
    let mut session_id: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                state.documents.check_filename(&filename)?;
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                // Enforce the limit while streaming rather than after buffering
                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?
                {
                    bytes.extend_from_slice(&chunk);
                    state.documents.check_size(bytes.len())?;
                }
                debug!(filename = %filename, size_bytes = bytes.len(), "received upload");
                upload = Some((filename, content_type, bytes));
            }
            "session_id" => {
                let text = field.text().await.map_err(|e| multipart_error(e, max_bytes))?;
                session_id = Some(text);
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) = upload.ok_or_else(|| AppError::InvalidMultipart {
        message: "missing 'file' field".to_string(),
    })?;

    let record = state.documents.store(&filename, &content_type, &bytes).await?;
    let session = state.chat.attach_document(session_id, &record.id).await;

    Ok(Json(UploadResponse {
        url: record.file_url(),
        document_id: record.id,
        session_id: session.id,
        filename: record.filename,
        size_bytes: record.size_bytes,
        message: "Upload successful".to_string(),
    }))
}

/// POST `/api/chat` — answer a question within a session
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    state.chat.chat(request).await.map(Json)
}

/// POST `/api/ask` — stateless simulated answer, always 200
pub async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(state.chat.ask(&request.question))
}

/// GET `/api/documents` — uploaded documents, oldest first
pub async fn list_documents_handler(State(state): State<AppState>) -> Json<DocumentsResponse> {
    Json(DocumentsResponse { documents: state.documents.list().await })
}

/// GET `/api/documents/{id}/file` — stored PDF bytes
pub async fn document_file_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.documents.read(&id).await?;
    Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes))
}

/// GET `/api/sessions/{id}/messages` — transcript of a session
pub async fn list_messages_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    state.chat.get_messages(&id).await.map(Json)
}

// ── Helper ────────────────────────────────────────────────────────────────────

fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { max_bytes }
    } else {
        AppError::InvalidMultipart { message: err.body_text() }
    }
}
