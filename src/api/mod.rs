//! Client for the remote chatbot service.
//!
//! [`ChatApi`] is the seam the session talks to; [`HttpChatApi`] implements
//! it over HTTP with reqwest.

mod client;
mod types;

pub use client::HttpChatApi;
pub use types::{ApiError, ChatApi, ChatReply, ChatRequest, FeedbackRequest, FeedbackType};
