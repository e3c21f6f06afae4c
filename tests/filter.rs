use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use repo_notes::config::{FilterConfig, DEFAULT_INSTRUCTION};
use repo_notes::error::NoteError;
use repo_notes::filter::{create_filter, ContentFilter, GeminiFilter};

const ENDPOINT: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn filter(server: &MockServer) -> GeminiFilter {
    GeminiFilter::new(FilterConfig {
        api_url: server.uri(),
        api_key: Some("k3y".to_string()),
        ..FilterConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_filter_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(query_param("key", "k3y"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "darn it" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "oh well\n" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(filter(&server).filter("darn it").await.unwrap(), "oh well");
}

#[tokio::test]
async fn test_filter_prefers_filtered_content_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"filteredContent": "clean"})),
        )
        .mount(&server)
        .await;

    assert_eq!(filter(&server).filter("dirty").await.unwrap(), "clean");
}

#[tokio::test]
async fn test_filter_falls_back_to_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert_eq!(
        filter(&server).filter("Hello world").await.unwrap(),
        "Hello world"
    );
}

#[tokio::test]
async fn test_filter_error_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    match filter(&server).filter("x").await.unwrap_err() {
        NoteError::Upstream { status, message, .. } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start().await;
    let filter = GeminiFilter::new(FilterConfig {
        api_url: server.uri(),
        ..FilterConfig::default()
    })
    .unwrap();

    assert!(matches!(
        filter.filter("x").await.unwrap_err(),
        NoteError::Config(_)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_disabled_provider_is_identity() {
    let filter = create_filter(&FilterConfig {
        provider: "disabled".to_string(),
        ..FilterConfig::default()
    })
    .unwrap();
    assert_eq!(filter.filter("unchanged").await.unwrap(), "unchanged");
}

#[tokio::test]
async fn test_default_request_carries_instruction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": DEFAULT_INSTRUCTION }] },
            "contents": [{ "parts": [{ "text": "Hello world" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello world\n" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        filter(&server).filter("Hello world").await.unwrap(),
        "Hello world"
    );
}

#[tokio::test]
async fn test_chat_reply_ignored_without_instruction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello! How can I help you today?" }] }
            }]
        })))
        .mount(&server)
        .await;

    let filter = GeminiFilter::new(FilterConfig {
        api_url: server.uri(),
        api_key: Some("k3y".to_string()),
        instruction: Some(String::new()),
        ..FilterConfig::default()
    })
    .unwrap();

    assert_eq!(filter.filter("Hello world").await.unwrap(), "Hello world");
}
