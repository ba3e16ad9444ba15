//! Ollama client for local question answering.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::LocalLlmConfig;
use super::prompts::{render, LOCAL_QA_PROMPT};
use super::{LlmError, QuestionAnswerer};

/// Model used when nothing is configured and no server listing is consulted.
const FALLBACK_MODEL: &str = "llama2";

/// Setup instructions shown when the server lists no models.
pub const OLLAMA_SETUP_HINT: &str =
    "Run these commands in terminal:\n1. ollama serve\n2. ollama pull llama2";

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

/// Client for a local Ollama server.
pub struct OllamaClient {
    config: LocalLlmConfig,
    model: String,
    client: Client,
}

impl OllamaClient {
    /// Create a client for the configured (or fallback) model.
    pub fn new(config: LocalLlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::Request(format!("Failed to create HTTP client: {}", e)))?;
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| FALLBACK_MODEL.to_string());

        Ok(Self {
            config,
            model,
            client,
        })
    }

    /// Create a client after checking which models the server has.
    ///
    /// Fails with `LlmError::NoModels` when the server is down or empty.
    pub async fn connect(config: LocalLlmConfig) -> Result<Self, LlmError> {
        let client = Self::new(config)?;
        let available = client.available_models().await;
        let model = choose_model(client.config.model.as_deref(), &available)
            .ok_or(LlmError::NoModels)?;
        info!("Using Ollama model {} at {}", model, client.config.endpoint);
        Ok(client.with_model(&model))
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Get the config.
    pub fn config(&self) -> &LocalLlmConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    /// List available models.
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let resp = self
            .client
            .get(self.url("/api/tags"))
            .timeout(Duration::from_secs(self.config.list_timeout_secs))
            .send()
            .await
            .map_err(map_send_error)?;

        if !resp.status().is_success() {
            return Err(LlmError::OllamaStatus(resp.status().as_u16()));
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// List available models, treating any failure as an empty list.
    pub async fn available_models(&self) -> Vec<String> {
        match self.list_models().await {
            Ok(models) => models,
            Err(e) => {
                debug!("Could not list Ollama models: {}", e);
                Vec::new()
            }
        }
    }

    /// Call the generate endpoint with a prompt.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        debug!("Sending {} char prompt to {}", prompt.len(), self.model);
        let resp = self
            .client
            .post(self.url("/api/generate"))
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!("Ollama returned {}: {}", status, body);
            return Err(LlmError::OllamaStatus(status.as_u16()));
        }

        let generated: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        generated
            .response
            .ok_or_else(|| LlmError::Parse("missing 'response' field".to_string()))
    }
}

#[async_trait]
impl QuestionAnswerer for OllamaClient {
    fn display_name(&self) -> &str {
        "Ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_prompt(&self, question: &str, context: &str) -> String {
        render(LOCAL_QA_PROMPT, question, context)
    }

    async fn answer(&self, question: &str, context: &str) -> Result<String, LlmError> {
        let prompt = self.build_prompt(question, context);
        self.generate(&prompt).await
    }
}

/// Pick the model to use: the configured one, else the first the server lists.
///
/// Returns `None` when the server lists nothing. A configured model missing
/// from the listing is still used, with a warning.
pub fn choose_model(configured: Option<&str>, available: &[String]) -> Option<String> {
    let first = available.first()?;
    match configured {
        Some(model) => {
            if !available.iter().any(|m| m == model) {
                warn!(
                    "Model {} is not listed by the server (available: {})",
                    model,
                    available.join(", ")
                );
            }
            Some(model.to_string())
        }
        None => Some(first.clone()),
    }
}

fn map_send_error(e: reqwest::Error) -> LlmError {
    if e.is_connect() {
        LlmError::OllamaUnreachable
    } else {
        LlmError::Request(e.to_string())
    }
}
