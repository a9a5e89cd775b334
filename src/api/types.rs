use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::i18n::Language;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub language: Language,
    pub session_id: String,
    pub user_id: String,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Like,
    Dislike,
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        })
    }
}

/// Body of `POST /feedback`. `comment` serializes as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRequest {
    pub session_id: String,
    pub feedback_type: FeedbackType,
    pub comment: Option<String>,
}

/// Transport-level failure talking to the chatbot service.
///
/// Malformed responses are reported the same way as network failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to connect to API endpoint: {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The chatbot service as seen by a session.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    /// The response body is ignored on success.
    async fn feedback(&self, request: &FeedbackRequest) -> Result<(), ApiError>;
}
