//! Router-level tests for the HTTP surface the browser client talks to.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use doc_qa_server::config::Config;
use doc_qa_server::models::{ChatMessage, ChatResponse, DocumentsResponse, Sender, UploadResponse};
use doc_qa_server::routes::{build_router, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;

const BOUNDARY: &str = "----docqa-test-boundary";

// ============================================================================
// Test Setup
// ============================================================================

fn setup(max_upload_bytes: usize) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        upload_dir: dir.path().join("uploads"),
        max_upload_bytes,
        ..Config::default()
    };
    let router = build_router(AppState::from_config(&config), &config);
    (router, dir)
}

fn multipart_body(filename: &str, bytes: &[u8], session_id: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(id) = session_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"session_id\"\r\n\r\n{id}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (router, _dir) = setup(1024);
    let response = router.oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["message"], "Document Q&A server is running");
}

// ============================================================================
// Upload Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_upload_stores_document_and_opens_session() {
    let (router, dir) = setup(1024);
    let response = router
        .clone()
        .oneshot(upload_request(multipart_body("report.pdf", b"%PDF-1.7 test", None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let upload: UploadResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(upload.filename, "report.pdf");
    assert_eq!(upload.size_bytes, 13);
    assert_eq!(upload.message, "Upload successful");
    assert_eq!(upload.url, format!("/api/documents/{}/file", upload.document_id));
    assert!(!upload.session_id.is_empty());
    assert!(dir
        .path()
        .join("uploads")
        .join(format!("{}.pdf", upload.document_id))
        .exists());

    // Canonical location serves the stored copy
    let response = router.oneshot(get_request(&upload.url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(body_bytes(response).await, b"%PDF-1.7 test");
}

#[tokio::test]
async fn test_upload_keeps_given_session() {
    let (router, _dir) = setup(1024);
    let response = router
        .oneshot(upload_request(multipart_body("a.pdf", b"%PDF", Some("session-42"))))
        .await
        .unwrap();

    let upload: UploadResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(upload.session_id, "session-42");
}

#[tokio::test]
async fn test_upload_rejects_non_pdf() {
    let (router, _dir) = setup(1024);
    let response = router
        .clone()
        .oneshot(upload_request(multipart_body("notes.txt", b"hello", None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "Only PDF files are allowed.");

    let response = router.oneshot(get_request("/api/documents")).await.unwrap();
    let docs: DocumentsResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(docs.documents.is_empty());
}

#[tokio::test]
async fn test_upload_rejects_oversized_file() {
    let (router, _dir) = setup(1024);
    let payload = vec![b'x'; 2048];
    let response = router
        .clone()
        .oneshot(upload_request(multipart_body("big.pdf", &payload, None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body["error"].is_string());

    let response = router.oneshot(get_request("/api/documents")).await.unwrap();
    let docs: DocumentsResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(docs.documents.is_empty());
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (router, _dir) = setup(1024);
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"session_id\"\r\n\r\nabc\r\n--{BOUNDARY}--\r\n"
    );
    let response = router
        .oneshot(upload_request(body.into_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Documents Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_list_documents_in_upload_order() {
    let (router, _dir) = setup(1024);
    for name in ["first.pdf", "second.pdf"] {
        let response = router
            .clone()
            .oneshot(upload_request(multipart_body(name, b"%PDF", None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = router.oneshot(get_request("/api/documents")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let docs: DocumentsResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let names: Vec<_> = docs.documents.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, vec!["first.pdf", "second.pdf"]);
}

#[tokio::test]
async fn test_unknown_document_file_is_404() {
    let (router, _dir) = setup(1024);
    let response = router
        .oneshot(get_request("/api/documents/does-not-exist/file"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Chat / Ask Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_chat_returns_answer_with_scored_sources() {
    let (router, _dir) = setup(1024);
    let response = router
        .oneshot(json_request(
            "/api/chat",
            serde_json::json!({ "question": "What was net profit?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body["answer"],
        "This is a simulated answer for: \"What was net profit?\""
    );
    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    for source in sources {
        assert!(source["content"].is_string());
        assert!(source["page"].is_u64());
        assert!(source["score"].is_f64());
    }
    assert!(body["session_id"].is_string());
}

#[tokio::test]
async fn test_chat_rejects_blank_question() {
    let (router, _dir) = setup(1024);
    let response = router
        .oneshot(json_request("/api/chat", serde_json::json!({ "question": "  " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "Field 'question' cannot be empty");
}

#[tokio::test]
async fn test_chat_links_uploaded_document_and_records_transcript() {
    let (router, _dir) = setup(1024);
    let response = router
        .clone()
        .oneshot(upload_request(multipart_body("report.pdf", b"%PDF", None)))
        .await
        .unwrap();
    let upload: UploadResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();

    let response = router
        .clone()
        .oneshot(json_request(
            "/api/chat",
            serde_json::json!({ "question": "Revenue?", "session_id": upload.session_id }),
        ))
        .await
        .unwrap();
    let chat: ChatResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(chat.session_id.as_deref(), Some(upload.session_id.as_str()));
    assert_eq!(chat.document_id.as_deref(), Some(upload.document_id.as_str()));

    let response = router
        .oneshot(get_request(&format!(
            "/api/sessions/{}/messages",
            upload.session_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let messages: Vec<ChatMessage> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].text, "Revenue?");
    assert_eq!(messages[1].sender, Sender::Assistant);
    assert_eq!(messages[1].sources.len(), 2);
}

#[tokio::test]
async fn test_unknown_session_messages_is_404() {
    let (router, _dir) = setup(1024);
    let response = router
        .oneshot(get_request("/api/sessions/nope/messages"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ask_shares_chat_response_shape() {
    let (router, _dir) = setup(1024);
    let response = router
        .oneshot(json_request("/api/ask", serde_json::json!({ "question": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let ask: ChatResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(ask.answer, "This is a simulated answer for: \"\"");
    assert_eq!(ask.sources.len(), 2);
    assert_eq!(ask.sources[0].page, 7);
    assert_eq!(ask.sources[1].page, 2);
    assert!(ask.session_id.is_none());
}
