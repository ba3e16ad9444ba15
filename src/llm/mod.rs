//! LLM integration for document question answering.
//!
//! Two backends answer questions about extracted text:
//! - `OllamaClient`: a local Ollama server (`/api/tags`, `/api/generate`)
//! - `HostedClient`: an OpenAI-compatible chat completions API (Groq by default)

mod config;
mod hosted;
mod ollama;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;

pub use config::{HostedLlmConfig, LlmConfig, LlmProvider, LocalLlmConfig};
pub use hosted::{HostedClient, API_KEY_HINT};
pub use ollama::{choose_model, OllamaClient, OLLAMA_SETUP_HINT};

/// A model backend that answers a question given a context window.
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    /// Human-readable backend name for CLI and web output.
    fn display_name(&self) -> &str;

    /// Model that will answer.
    fn model(&self) -> &str;

    /// Assemble the prompt sent for `question` over `context`.
    fn build_prompt(&self, question: &str, context: &str) -> String;

    /// Send the prompt and return the model's answer text.
    async fn answer(&self, question: &str, context: &str) -> Result<String, LlmError>;
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The local server refused the connection
    #[error("Cannot connect to Ollama. Make sure 'ollama serve' is running.")]
    OllamaUnreachable,

    /// The local server answered with a non-success status
    #[error("Could not get response from Ollama. Status: {0}")]
    OllamaStatus(u16),

    /// The local server lists no models
    #[error("Ollama is not running or no models available. Please run 'ollama serve' and pull a model first.")]
    NoModels,

    /// The hosted API answered with a non-success status
    #[error("API Error: {0}")]
    ApiStatus(u16),

    /// No key configured for the hosted API
    #[error("Please enter {0} API key")]
    MissingApiKey(String),

    /// Transport failure or timeout
    #[error("{0}")]
    Request(String),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Parse(String),
}

impl LlmError {
    /// Message shown in place of an answer when the request fails.
    pub fn user_message(&self) -> String {
        match self {
            LlmError::ApiStatus(_) => self.to_string(),
            other => format!("Error: {}", other),
        }
    }
}
