use std::time::Instant;

use tracing::info;
use uuid::Uuid;

use crate::agent::SimulatedAssistant;
use crate::db::session_repository::SessionRepository;
use crate::errors::AppError;
use crate::models::{ChatMessage, ChatRequest, ChatResponse, Session};

const MAX_QUESTION_LENGTH: usize = 8000;

#[derive(Clone)]
pub struct ChatService {
    session_repo: SessionRepository,
    assistant: SimulatedAssistant,
}

impl ChatService {
    pub fn new(session_repo: SessionRepository, assistant: SimulatedAssistant) -> Self {
        Self { session_repo, assistant }
    }

    pub async fn get_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, AppError> {
        self.session_repo.find_messages(session_id).await
    }

    /// Makes `document_id` the current document of the session, opening a
    /// new session when none is given.
    pub async fn attach_document(&self, session_id: Option<String>, document_id: &str) -> Session {
        let session_id = resolve_session_id(session_id);
        self.session_repo.attach_document(&session_id, document_id).await
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        let started = Instant::now();

        // ── Validation ────────────────────────────────────────────────────────
        let question = request.question.trim();
        if question.is_empty() {
            return Err(AppError::EmptyField { field_name: "question".to_string() });
        }
        if question.len() > MAX_QUESTION_LENGTH {
            return Err(AppError::FieldTooLong {
                field_name: "question".to_string(),
                max_length: MAX_QUESTION_LENGTH,
                actual_length: question.len(),
            });
        }

        let session_id = resolve_session_id(request.session_id);

        // ── Answer & record the turn ──────────────────────────────────────────
        let reply = self.assistant.reply(question);
        let answer = reply.text.clone();
        let sources = reply.sources.clone();
        let session = self
            .session_repo
            .append_turn(&session_id, ChatMessage::user(question.to_string()), reply)
            .await;

        info!(
            session_id = %session.id,
            turns = session.messages.len() / 2,
            "answered question"
        );

        Ok(ChatResponse {
            answer,
            sources,
            session_id: Some(session.id),
            document_id: session.document_id,
            processing_time: elapsed_secs(started),
        })
    }

    /// Stateless variant backing `/api/ask`: no validation, no session.
    pub fn ask(&self, question: &str) -> ChatResponse {
        let started = Instant::now();
        let reply = self.assistant.reply(question);
        ChatResponse {
            answer: reply.text,
            sources: reply.sources,
            session_id: None,
            document_id: None,
            processing_time: elapsed_secs(started),
        }
    }
}

fn resolve_session_id(session_id: Option<String>) -> String {
    session_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn elapsed_secs(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 100.0).round() / 100.0
}
