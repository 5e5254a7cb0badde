use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A backend-asserted pointer justifying part of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub page: u32,
    pub score: f64,
}

impl Citation {
    pub fn new(content: &str, page: u32, score: f64) -> Self {
        Self { content: Some(content.to_string()), page, score }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Citation>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: String) -> Self {
        Self { sender: Sender::User, text, sources: Vec::new(), created_at: Utc::now() }
    }

    pub fn assistant(text: String, sources: Vec<Citation>) -> Self {
        Self { sender: Sender::Assistant, text, sources, created_at: Utc::now() }
    }
}

/// Per-client conversation state, keyed by `id`.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    pub document_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String) -> Self {
        let now = Utc::now();
        Self { id, document_id: None, messages: Vec::new(), created_at: now, updated_at: now }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Stored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub upload_date: DateTime<Utc>,
    pub status: DocumentStatus,
}

impl DocumentRecord {
    /// Location the client should load the stored copy from.
    pub fn file_url(&self) -> String {
        format!("/api/documents/{}/file", self.id)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub question: String,
}

/// Response shape shared by `/api/chat` and `/api/ask`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub processing_time: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub document_id: String,
    pub session_id: String,
    pub filename: String,
    pub size_bytes: usize,
    pub url: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentsResponse {
    pub documents: Vec<DocumentRecord>,
}
