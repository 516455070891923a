//! End-to-end flows through the HTTP router with a mock model.

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use codechat_core::Config;
use codechat_core::session::{FAREWELL, NOT_INITIALIZED_REPLY};
use codechat_gateway::{AppState, build_router};
use codechat_llm::any::AnyProvider;
use codechat_llm::mock::MockProvider;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn router_with(provider: MockProvider) -> Router {
    build_router(AppState::new(AnyProvider::Mock(provider), Config::default()))
}

async fn send_initialize(router: &Router, directory: &Path) -> (StatusCode, serde_json::Value) {
    let uri = format!(
        "/initialize-bard-qna?directory_path={}",
        directory.display()
    );
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn send_chat(router: &Router, message: &str) -> (StatusCode, serde_json::Value) {
    let body = serde_json::json!({ "message": message }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn codebase_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("server.py"),
        "class Server:\n    def start(self):\n        return bind(self.port)\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("routes.rs"),
        "pub fn routes() -> Vec<Route> {\n    vec![health(), chat()]\n}\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("README.md"), "# demo\n\nA demo service.\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not indexed\n").unwrap();
    dir
}

#[tokio::test]
async fn full_conversation_flow() {
    let provider = MockProvider::new().with_responses([
        "the server starts in server.py",
        "routes live in routes.rs",
    ]);
    let router = router_with(provider);
    let dir = codebase_fixture();

    let (status, body) = send_initialize(&router, dir.path()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("chunks indexed"));

    let (status, body) = send_chat(&router, "where does the server start?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Chatbot: the server starts in server.py");

    let (status, body) = send_chat(&router, "and the routes?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Chatbot: routes live in routes.rs");

    let (status, body) = send_chat(&router, "bye").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], FAREWELL);
}

#[tokio::test]
async fn chat_without_initialize_gets_fixed_reply() {
    let provider = MockProvider::new();
    let router = router_with(provider.clone());

    let (status, body) = send_chat(&router, "anything there?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], NOT_INITIALIZED_REPLY);
    assert_eq!(provider.chat_call_count(), 0);
}

#[tokio::test]
async fn exit_phrase_never_reaches_the_model() {
    let provider = MockProvider::new();
    let router = router_with(provider.clone());
    let dir = codebase_fixture();

    let (status, _) = send_initialize(&router, dir.path()).await;
    assert_eq!(status, StatusCode::OK);

    for phrase in ["exit", "QUIT", "  bye  "] {
        let (status, body) = send_chat(&router, phrase).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], FAREWELL);
    }
    assert_eq!(provider.chat_call_count(), 0);
}

#[tokio::test]
async fn reinitialize_replaces_the_session() {
    let provider = MockProvider::new().with_default_response("answer");
    let router = router_with(provider);

    let first = codebase_fixture();
    let (status, _) = send_initialize(&router, first.path()).await;
    assert_eq!(status, StatusCode::OK);

    let second = tempfile::tempdir().unwrap();
    std::fs::write(second.path().join("only.go"), "package main\n").unwrap();
    let (status, body) = send_initialize(&router, second.path()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("1 chunks indexed"));

    let (status, body) = send_chat(&router, "still working?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Chatbot: answer");
}

#[tokio::test]
async fn invalid_directory_keeps_existing_session_usable() {
    let provider = MockProvider::new().with_default_response("from the old index");
    let router = router_with(provider);
    let dir = codebase_fixture();

    let (status, _) = send_initialize(&router, dir.path()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_initialize(&router, Path::new("/definitely/missing")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not a directory"));

    let (status, body) = send_chat(&router, "do you remember the codebase?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Chatbot: from the old index");
}

#[tokio::test]
async fn model_failure_surfaces_as_bad_gateway() {
    let provider = MockProvider::new().with_failing_chat();
    let router = router_with(provider);
    let dir = codebase_fixture();

    let (status, _) = send_initialize(&router, dir.path()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_chat(&router, "this will fail").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}
