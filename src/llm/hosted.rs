//! Hosted LLM client using an OpenAI-compatible chat completions API.
//!
//! Groq is the default provider; any API serving `/v1/chat/completions`
//! with bearer authentication works.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::HostedLlmConfig;
use super::prompts::{render, HOSTED_QA_PROMPT};
use super::{LlmError, QuestionAnswerer};

/// Where to obtain a Groq key.
pub const API_KEY_HINT: &str = "Get free key from: https://console.groq.com";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for a hosted chat completions API.
pub struct HostedClient {
    config: HostedLlmConfig,
    api_key: String,
    client: Client,
}

impl HostedClient {
    /// Create a client. Fails when no API key is configured.
    pub fn new(config: HostedLlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LlmError::MissingApiKey(config.name.clone()))?;
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Get the config.
    pub fn config(&self) -> &HostedLlmConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    /// Send a single user message and return the first choice's content.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        debug!(
            "Sending {} char prompt to {} ({})",
            prompt.len(),
            self.config.name,
            self.config.model
        );
        let resp = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!("{} returned {}: {}", self.config.name, status, body);
            return Err(LlmError::ApiStatus(status.as_u16()));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Parse("response has no choices".to_string()))
    }
}

#[async_trait]
impl QuestionAnswerer for HostedClient {
    fn display_name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn build_prompt(&self, question: &str, context: &str) -> String {
        render(HOSTED_QA_PROMPT, question, context)
    }

    async fn answer(&self, question: &str, context: &str) -> Result<String, LlmError> {
        let prompt = self.build_prompt(question, context);
        self.complete(&prompt).await
    }
}
