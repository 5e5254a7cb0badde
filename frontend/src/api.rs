use gloo_net::http::Request;
use web_sys::{File, FormData};

use crate::models::{ChatRequest, ChatResponse};
use crate::upload::interpret_response;

/// Base URL of the backend API server, fixed at build time via `API_BASE_URL`.
pub const API_BASE: &str = match option_env!("API_BASE_URL") {
    Some(base) => base,
    None => "http://localhost:3000",
};

/// Turns a server-relative path (`/api/...`) into an absolute URL.
pub fn resolve_url(path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{path}", API_BASE.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

/// Posts `question` to the chat endpoint.
pub async fn send_chat(
    question: &str,
    session_id: Option<String>,
) -> Result<ChatResponse, String> {
    let body = ChatRequest { question: question.to_string(), session_id };

    let resp = Request::post(&format!("{API_BASE}/api/chat"))
        .json(&body)
        .map_err(|e| format!("Serialize error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;

    if !resp.ok() {
        return Err(format!("Server error: {}", resp.status()));
    }

    resp.json::<ChatResponse>()
        .await
        .map_err(|e| format!("Parse error: {e}"))
}

/// Uploads `file` as multipart field `file`. Resolves to the response body
/// on success, or to the server's `error` message.
pub async fn upload_document(
    file: &File,
    session_id: Option<String>,
) -> Result<serde_json::Value, String> {
    let form = FormData::new().map_err(|e| format!("Form error: {e:?}"))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| format!("Form error: {e:?}"))?;
    if let Some(id) = session_id {
        form.append_with_str("session_id", &id)
            .map_err(|e| format!("Form error: {e:?}"))?;
    }

    let resp = Request::post(&format!("{API_BASE}/api/upload"))
        .body(form)
        .map_err(|e| format!("Request error: {e}"))?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let body = resp.json::<serde_json::Value>().await.ok();
    interpret_response(resp.ok(), body)
}
