use serde::{Deserialize, Serialize};

/// Shown when the backend replies without an `answer` field.
pub const NO_ANSWER: &str = "No answer found.";

/// Replaces the assistant reply when the send fails for any reason.
pub const SEND_ERROR: &str = "An error occurred. Please try again.";

/// Citations rendered under a single assistant message.
pub const MAX_VISIBLE_SOURCES: usize = 3;

/// Matches the backend `Citation` model. `score` may be absent on the wire.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Citation {
    #[serde(default)]
    pub content: Option<String>,
    pub page: u32,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Citation {
    pub fn label(&self) -> String {
        match self.score {
            Some(score) => format!("Page {} (score: {score:.2})", self.page),
            None => format!("Page {}", self.page),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub sources: Vec<Citation>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into(), sources: Vec::new() }
    }

    pub fn assistant(text: impl Into<String>, sources: Vec<Citation>) -> Self {
        Self { sender: Sender::Assistant, text: text.into(), sources }
    }

    pub fn send_error() -> Self {
        Self::assistant(SEND_ERROR, Vec::new())
    }

    /// First [`MAX_VISIBLE_SOURCES`] citations, in the order received.
    pub fn visible_sources(&self) -> &[Citation] {
        &self.sources[..self.sources.len().min(MAX_VISIBLE_SOURCES)]
    }
}

/// Request body for the chat API.
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Response from the chat API. Every field is optional on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<Citation>>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatResponse {
    pub fn into_message(self) -> ChatMessage {
        let answer = self
            .answer
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| NO_ANSWER.to_string());
        ChatMessage::assistant(answer, self.sources.unwrap_or_default())
    }
}

/// The fields of the upload response the page acts on.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}
