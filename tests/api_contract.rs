#![allow(clippy::unwrap_used)]
//! HTTP contract tests for the chatbot client.
//!
//! A wiremock server stands in for the chatbot service and checks the exact
//! request bodies sent to `/chat` and `/feedback`.

use std::sync::Arc;

use parley_cli::api::{
    ApiError, ChatApi, ChatRequest, FeedbackRequest, FeedbackType, HttpChatApi,
};
use parley_cli::i18n::Language;
use parley_cli::identity::SessionIdentity;
use parley_cli::session::{ChatSession, Sender, SendOutcome, SessionOptions};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_request(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        language: Language::En,
        session_id: "session_1_abcdefghi".to_string(),
        user_id: "anon_1_abcdefghi".to_string(),
    }
}

#[tokio::test]
async fn test_chat_posts_contract_body_and_decodes_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "message": "Hello",
            "language": "en",
            "session_id": "session_1_abcdefghi",
            "user_id": "anon_1_abcdefghi",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Hi there",
            "confidence": 0.9,
            "category": "greeting",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpChatApi::new(server.uri());
    let reply = api.chat(&chat_request("Hello")).await.unwrap();

    assert_eq!(reply.response, "Hi there");
    assert_eq!(reply.category, "greeting");
}

#[tokio::test]
async fn test_chat_non_success_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let api = HttpChatApi::new(server.uri());
    let err = api.chat(&chat_request("Hello")).await.unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_malformed_body_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let api = HttpChatApi::new(server.uri());
    let err = api.chat(&chat_request("Hello")).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let api = HttpChatApi::new("http://127.0.0.1:1");
    let err = api.chat(&chat_request("Hello")).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
    assert!(err.to_string().contains("127.0.0.1:1/chat"));
}

#[tokio::test]
async fn test_feedback_posts_null_comment_and_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedback"))
        .and(body_json(json!({
            "session_id": "session_1_abcdefghi",
            "feedback_type": "like",
            "comment": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpChatApi::new(server.uri());
    let request = FeedbackRequest {
        session_id: "session_1_abcdefghi".to_string(),
        feedback_type: FeedbackType::Like,
        comment: None,
    };

    api.feedback(&request).await.unwrap();
}

#[tokio::test]
async fn test_feedback_non_success_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedback"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = HttpChatApi::new(server.uri());
    let request = FeedbackRequest {
        session_id: "s".to_string(),
        feedback_type: FeedbackType::Dislike,
        comment: Some("wrong".to_string()),
    };

    assert!(matches!(
        api.feedback(&request).await,
        Err(ApiError::Status { status: 404, .. })
    ));
}

fn http_session(server: &MockServer) -> ChatSession {
    let session = ChatSession::new(
        Arc::new(HttpChatApi::new(server.uri())),
        SessionIdentity::new(
            "session_1_abcdefghi".to_string(),
            "anon_1_abcdefghi".to_string(),
        ),
        SessionOptions::default(),
    );
    session.open();
    session
}

#[tokio::test]
async fn test_session_round_trip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Hi there",
            "confidence": 0.9,
            "category": "greeting",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = http_session(&server);
    let outcome = session.send_message("Hello").await;

    assert!(matches!(outcome, SendOutcome::Replied { .. }));
    let transcript: Vec<(Sender, String)> = session
        .transcript()
        .into_iter()
        .map(|m| (m.sender, m.text))
        .collect();
    assert_eq!(
        transcript,
        vec![
            (Sender::User, "Hello".to_string()),
            (Sender::Bot, "Hi there".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_session_server_error_becomes_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let session = http_session(&server);
    session.toggle_language();
    session.send_message("مرحبا").await;

    let last = session.transcript().pop().unwrap();
    assert_eq!(last.sender, Sender::Bot);
    assert!(last.metadata.is_error);
    assert_eq!(last.text, Language::Ar.strings().error);
}

#[tokio::test]
async fn test_inline_feedback_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Your order ships tomorrow.",
            "confidence": 0.95,
            "category": "orders",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/feedback"))
        .and(body_json(json!({
            "session_id": "session_1_abcdefghi",
            "feedback_type": "dislike",
            "comment": null,
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = http_session(&server);
    session.send_message("Where is my order?").await;
    let id = session.last_rateable_message_id().unwrap();

    session
        .submit_inline_feedback(FeedbackType::Dislike, &id)
        .unwrap()
        .await
        .unwrap();

    assert_eq!(session.inline_feedback(&id), Some(FeedbackType::Dislike));
}
