//! Vouch Completion Provider Layer
//!
//! Pluggable chat-completion provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `CompletionProvider` trait
//! from `vouch-domain`. A provider receives a system framing and a user
//! prompt and returns the model's raw text reply; everything downstream
//! treats that reply as untrusted input.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: Hosted chat-completions API integration
//!
//! # Examples
//!
//! ```
//! use vouch_llm::MockProvider;
//! use vouch_domain::traits::CompletionProvider;
//!
//! let provider = MockProvider::new("[]");
//! let result = provider.complete("system framing", "user prompt").unwrap();
//! assert_eq!(result, "[]");
//! ```

#![warn(missing_docs)]

pub mod openai;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use vouch_domain::traits::CompletionProvider as CompletionProviderTrait;

pub use openai::OpenAiProvider;

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// No API key was configured
    #[error("API key is not configured")]
    MissingApiKey,

    /// Generic error
    #[error("Provider error: {0}")]
    Other(String),
}

/// Mock completion provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Canned responses are keyed by the user prompt; the system framing is
/// ignored.
///
/// # Examples
///
/// ```
/// use vouch_llm::MockProvider;
/// use vouch_domain::traits::CompletionProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.complete("sys", "any prompt").unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.complete("sys", "prompt1").unwrap(), "response1");
/// assert_eq!(provider.complete("sys", "prompt2").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for a given user prompt
    pub fn add_response(&mut self, user_prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(user_prompt.into(), response.into());
    }

    /// Configure an error for a specific user prompt
    pub fn add_error(&mut self, user_prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(user_prompt.into(), "ERROR".to_string());
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl CompletionProviderTrait for MockProvider {
    type Error = LlmError;

    fn complete(&self, _system_prompt: &str, user_prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        // Check if we have a specific response for this prompt
        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(user_prompt) {
            if response == "ERROR" {
                return Err(LlmError::Other("Mock error".to_string()));
            }
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}
