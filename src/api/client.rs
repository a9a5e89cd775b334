use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;

use super::types::{ApiError, ChatApi, ChatReply, ChatRequest, FeedbackRequest};

/// [`ChatApi`] over HTTP.
///
/// No client-side timeout is configured; requests take as long as the
/// transport allows.
pub struct HttpChatApi {
    client: Client,
    endpoint: String,
}

impl HttpChatApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint.trim_end_matches('/'))
    }

    async fn post<T: Serialize + Sync>(&self, url: &str, body: &T) -> Result<Response, ApiError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        let url = self.url("chat");
        tracing::debug!(%url, language = %request.language, "sending chat message");

        let response = self.post(&url, request).await?;
        response
            .json::<ChatReply>()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }

    async fn feedback(&self, request: &FeedbackRequest) -> Result<(), ApiError> {
        let url = self.url("feedback");
        tracing::debug!(%url, feedback_type = %request.feedback_type, "sending feedback");

        self.post(&url, request).await?;
        Ok(())
    }
}
