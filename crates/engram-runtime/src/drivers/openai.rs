//! OpenAI-compatible chat completions driver.
//!
//! Works against any endpoint speaking the `/chat/completions` wire format
//! (OpenAI, local proxies, compatible gateways). One request per call, no
//! streaming.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::llm_driver::{CompletionRequest, CompletionResponse, LlmDriver, LlmError};

/// Request timeout for a single completion call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Driver for OpenAI-compatible chat completion APIs.
pub struct OpenAIDriver {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

/// Wire shape of a chat completions response (the fields we read).
#[derive(Deserialize)]
struct ChatCompletionsBody {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAIDriver {
    /// Create a driver for the given API key and base URL.
    ///
    /// `base_url` is the API root (e.g. `https://api.openai.com/v1`);
    /// a trailing slash is tolerated.
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a driver reading the key from the named environment variable.
    pub fn from_env(api_key_env: &str, base_url: String) -> Result<Self, LlmError> {
        let api_key = std::env::var(api_key_env)
            .map_err(|_| LlmError::MissingApiKey(api_key_env.to_string()))?;
        Self::new(api_key, base_url)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmDriver for OpenAIDriver {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        debug!(model = %request.model, messages = request.messages.len(), "LLM completion request");

        let resp = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionsBody = resp
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("no choices in response".to_string()))?;

        Ok(CompletionResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_strips_trailing_slash() {
        let driver = OpenAIDriver::new("k".into(), "https://api.openai.com/v1/".into()).unwrap();
        assert_eq!(
            driver.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_from_env_missing_key() {
        let err = OpenAIDriver::from_env("ENGRAM_TEST_NO_SUCH_KEY", "https://x".into());
        assert!(matches!(err, Err(LlmError::MissingApiKey(_))));
    }

    #[test]
    fn test_response_body_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatCompletionsBody = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hello"));
    }

    #[test]
    fn test_response_body_without_content() {
        let json = r#"{"choices":[{"message":{"role":"assistant"}}]}"#;
        let parsed: ChatCompletionsBody = serde_json::from_str(json).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
