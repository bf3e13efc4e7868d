//! OpenAI chat-completions provider
//!
//! Sends a two-message chat (system framing plus user prompt) to a
//! hosted chat-completions endpoint and returns the first choice's
//! content. Timeouts live here; callers treat any failure as "no
//! answer" rather than retrying.

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};
use vouch_domain::traits::CompletionProvider as CompletionProviderTrait;

/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Connection establishment timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// End-to-end request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Sampling temperature sent with every request
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Maximum completion tokens sent with every request
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Hosted chat-completions API provider
///
/// # Examples
///
/// ```no_run
/// use vouch_llm::OpenAiProvider;
/// use vouch_domain::traits::CompletionProvider;
///
/// let provider = OpenAiProvider::new("sk-...");
/// let reply = provider.complete("You answer in JSON.", "Extract the spans.").unwrap();
/// ```
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f64,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

impl OpenAiProvider {
    /// Create a new provider with default endpoint and model
    ///
    /// An empty API key is tolerated here so the server can start
    /// without one; every completion call will then fail with
    /// [`LlmError::MissingApiKey`] until a key is configured.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        if api_key.is_empty() {
            error!("API key is empty; completion calls will fail until one is configured");
        } else {
            info!("API key configured ({} chars)", api_key.len());
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            client,
        }
    }

    /// Set a custom endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set a custom model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Internal async implementation of complete
    async fn complete_internal(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Sending chat completion request. model: {}, user prompt: {} chars",
            self.model,
            user_prompt.chars().count()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "API returned status {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;
        debug!("Chat completion response received: {} chars", body.chars().count());

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        Ok(choice.message.content)
    }
}

impl CompletionProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper; callers on an async runtime run this on the
        // blocking pool.
        tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::Other(format!("Failed to create runtime: {}", e)))?
            .block_on(self.complete_internal(system_prompt, user_prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation_defaults() {
        let provider = OpenAiProvider::new("test-key");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(provider.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_with_endpoint_and_model() {
        let provider = OpenAiProvider::new("test-key")
            .with_endpoint("http://localhost:8080/v1/chat/completions")
            .with_model("test-model");

        assert_eq!(provider.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(provider.model, "test-model");
    }

    #[test]
    fn test_request_wire_format() {
        let request = ChatCompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: "framing".to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: "prompt".to_string(),
                },
            ],
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["temperature"], 0.2);
        assert_eq!(value["max_tokens"], 2000);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "prompt");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "[]"}}
            ]
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content, "[]");
    }

    #[tokio::test]
    async fn test_empty_api_key_fails_without_network() {
        let provider = OpenAiProvider::new("");
        let result = provider.complete_internal("sys", "user").await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        // Port 99999 is invalid, so the request fails before any I/O.
        let provider =
            OpenAiProvider::new("test-key").with_endpoint("http://localhost:99999/v1/chat");

        let result = provider.complete_internal("sys", "user").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[test]
    #[ignore] // Requires a real API key in OPENAI_API_KEY
    fn test_live_completion() {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let provider = OpenAiProvider::new(api_key);

        let result = provider.complete("Reply with the single word: ok", "ping");
        assert!(result.is_ok());
    }
}
