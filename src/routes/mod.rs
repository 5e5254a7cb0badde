pub mod api_routes;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::agent::SimulatedAssistant;
use crate::config::Config;
use crate::db::document_repository::DocumentRepository;
use crate::db::session_repository::SessionRepository;
use crate::service::chat_service::ChatService;
use crate::service::document_service::DocumentService;
use api_routes::{
    ask_handler, chat_handler, document_file_handler, health_handler, list_documents_handler,
    list_messages_handler, upload_handler,
};

/// Room for multipart boundaries and the `session_id` field on top of the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
    pub documents: DocumentService,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let session_repo = SessionRepository::with_capacity(config.max_sessions);
        let document_repo = DocumentRepository::new(config.upload_dir.clone());
        Self {
            chat: ChatService::new(session_repo, SimulatedAssistant::new()),
            documents: DocumentService::new(document_repo, config.max_upload_bytes),
        }
    }
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/api/upload", post(upload_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/ask", post(ask_handler))
        .route("/api/documents", get(list_documents_handler))
        .route("/api/documents/{id}/file", get(document_file_handler))
        .route("/api/sessions/{id}/messages", get(list_messages_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes + MULTIPART_OVERHEAD))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match &config.allowed_origins {
        Some(origins) => AllowOrigin::list(
            origins.iter().filter_map(|o| o.parse::<HeaderValue>().ok()),
        ),
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
