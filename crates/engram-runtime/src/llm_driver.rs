//! The external LLM capability boundary.
//!
//! One synchronous-feeling operation: send a message list, get text back.
//! No streaming, no retries; a failed call surfaces as an [`LlmError`] that
//! the agent converts into a user-visible error string.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from an LLM driver.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The HTTP request could not be completed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or error message.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    /// No API key was available.
    #[error("missing API key: {0}")]
    MissingApiKey(String),
}

/// One message in a chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user", or "assistant".
    pub role: String,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// A system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A single non-streaming completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Ordered message list.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token cap.
    pub max_tokens: u32,
}

/// The text result of a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The assistant's reply.
    pub text: String,
}

/// Driver abstraction over an LLM provider.
///
/// Implementations make exactly one request per call; retry policy, if any,
/// belongs to callers (the Engram agent has none).
#[async_trait]
pub trait LlmDriver: Send + Sync {
    /// Run one completion request to completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
