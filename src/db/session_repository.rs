use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::AppError;
use crate::models::{ChatMessage, Session};

/// Sessions kept when no limit is configured.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// In-process session store. Holds at most `capacity` sessions; opening one
/// more drops the session that has been idle longest.
#[derive(Clone)]
pub struct SessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    capacity: usize,
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    pub async fn find_messages(&self, id: &str) -> Result<Vec<ChatMessage>, AppError> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|s| s.messages.clone())
            .ok_or_else(|| AppError::SessionNotFound { id: id.to_string() })
    }

    /// Points the session at `document_id`, opening the session if needed.
    pub async fn attach_document(&self, id: &str, document_id: &str) -> Session {
        let mut sessions = self.sessions.write().await;
        let session = open_session(&mut sessions, id, self.capacity);
        session.document_id = Some(document_id.to_string());
        session.updated_at = Utc::now();
        debug!(session_id = %id, document_id = %document_id, "document attached");
        session.clone()
    }

    /// Appends a question and its reply under a single write lock, so the
    /// pair stays adjacent however many turns run concurrently.
    pub async fn append_turn(
        &self,
        id: &str,
        question: ChatMessage,
        reply: ChatMessage,
    ) -> Session {
        let mut sessions = self.sessions.write().await;
        let session = open_session(&mut sessions, id, self.capacity);
        session.messages.push(question);
        session.messages.push(reply);
        session.updated_at = Utc::now();
        session.clone()
    }
}

/// Returns the session `id`, opening it first when absent. Opening at
/// capacity evicts the least recently updated session.
fn open_session<'a>(
    sessions: &'a mut HashMap<String, Session>,
    id: &str,
    capacity: usize,
) -> &'a mut Session {
    if !sessions.contains_key(id) && sessions.len() >= capacity {
        let idle = sessions
            .values()
            .min_by_key(|s| s.updated_at)
            .map(|s| s.id.clone());
        if let Some(idle) = idle {
            sessions.remove(&idle);
            debug!(session_id = %idle, "evicted idle session");
        }
    }
    sessions
        .entry(id.to_string())
        .or_insert_with(|| Session::new(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::models::Sender;

    #[tokio::test]
    async fn append_turn_opens_unknown_session() {
        let repo = SessionRepository::new();
        let session = repo
            .append_turn(
                "s1",
                ChatMessage::user("hi".to_string()),
                ChatMessage::assistant("hello".to_string(), Vec::new()),
            )
            .await;

        assert_eq!(session.id, "s1");
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].sender, Sender::User);
        assert_eq!(session.messages[1].sender, Sender::Assistant);
    }

    #[tokio::test]
    async fn concurrent_turns_never_interleave() {
        let repo = SessionRepository::new();
        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.append_turn(
                    "shared",
                    ChatMessage::user(format!("q{i}")),
                    ChatMessage::assistant(format!("a{i}"), Vec::new()),
                )
                .await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let messages = repo.find_messages("shared").await.unwrap();
        assert_eq!(messages.len(), 32);
        for pair in messages.chunks(2) {
            assert_eq!(pair[0].sender, Sender::User);
            assert_eq!(pair[1].sender, Sender::Assistant);
            assert_eq!(pair[0].text[1..], pair[1].text[1..]);
        }
    }

    #[tokio::test]
    async fn attach_document_replaces_current_document() {
        let repo = SessionRepository::new();
        repo.attach_document("s1", "doc-a").await;
        let session = repo.attach_document("s1", "doc-b").await;
        assert_eq!(session.document_id.as_deref(), Some("doc-b"));
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let repo = SessionRepository::new();
        let err = repo.find_messages("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn store_never_grows_past_capacity() {
        let repo = SessionRepository::with_capacity(3);
        for i in 0..10 {
            repo.append_turn(
                &format!("s{i}"),
                ChatMessage::user("q".to_string()),
                ChatMessage::assistant("a".to_string(), Vec::new()),
            )
            .await;
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        for i in 0..10 {
            let kept = repo.find_messages(&format!("s{i}")).await.is_ok();
            assert_eq!(kept, i >= 7, "session s{i}");
        }
    }

    #[tokio::test]
    async fn active_session_outlives_idle_ones() {
        let repo = SessionRepository::with_capacity(2);
        for id in ["busy", "idle", "busy", "new"] {
            repo.attach_document(id, "doc").await;
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        assert!(repo.find_messages("busy").await.is_ok());
        assert!(repo.find_messages("new").await.is_ok());
        assert!(repo.find_messages("idle").await.unwrap_err().is_not_found());
    }
}
