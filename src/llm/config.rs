//! LLM client configuration.

use serde::{Deserialize, Serialize};

/// Which model backend answers questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Ollama server on this machine (default)
    #[default]
    Local,
    /// OpenAI-compatible hosted API (Groq by default)
    Hosted,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" | "ollama" => Some(Self::Local),
            "hosted" | "groq" | "openai" => Some(Self::Hosted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Hosted => "hosted",
        }
    }
}

/// Configuration for the local Ollama server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalLlmConfig {
    /// Ollama API endpoint
    #[serde(default = "default_local_endpoint")]
    pub endpoint: String,
    /// Model to use; the first model the server lists when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Temperature for generation
    #[serde(default)]
    pub temperature: f32,
    /// Timeout for a generation request, in seconds
    #[serde(default = "default_local_timeout")]
    pub request_timeout_secs: u64,
    /// Timeout for listing models, in seconds
    #[serde(default = "default_list_timeout")]
    pub list_timeout_secs: u64,
}

fn default_local_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_local_timeout() -> u64 {
    60
}

fn default_list_timeout() -> u64 {
    5
}

impl Default for LocalLlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LocalLlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            endpoint: default_local_endpoint(),
            model: None,
            temperature: 0.0,
            request_timeout_secs: default_local_timeout(),
            list_timeout_secs: default_list_timeout(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENDPOINT` (or `OLLAMA_HOST`): Ollama endpoint
    /// - `LLM_MODEL`: Model name
    /// - `LLM_TEMPERATURE`: Generation temperature
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LLM_ENDPOINT").or_else(|_| std::env::var("OLLAMA_HOST")) {
            self.endpoint = normalize_endpoint(&val);
        }
        if let Ok(val) = std::env::var("LLM_MODEL") {
            self.model = Some(val);
        }
        if let Some(t) = std::env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.temperature = t;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = normalize_endpoint(endpoint);
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }
}

/// Configuration for the hosted OpenAI-compatible API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostedLlmConfig {
    /// Provider name used in messages
    #[serde(default = "default_hosted_name")]
    pub name: String,
    /// API base URL (`/v1/chat/completions` is appended)
    #[serde(default = "default_hosted_endpoint")]
    pub endpoint: String,
    /// API key; never written back out
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model name
    #[serde(default = "default_hosted_model")]
    pub model: String,
    /// Temperature for generation
    #[serde(default = "default_hosted_temperature")]
    pub temperature: f32,
    /// Timeout for a completion request, in seconds
    #[serde(default = "default_hosted_timeout")]
    pub request_timeout_secs: u64,
}

fn default_hosted_name() -> String {
    "Groq".to_string()
}

fn default_hosted_endpoint() -> String {
    "https://api.groq.com/openai".to_string()
}

fn default_hosted_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_hosted_temperature() -> f32 {
    0.7
}

fn default_hosted_timeout() -> u64 {
    30
}

impl Default for HostedLlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl HostedLlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            name: default_hosted_name(),
            endpoint: default_hosted_endpoint(),
            api_key: None,
            model: default_hosted_model(),
            temperature: default_hosted_temperature(),
            request_timeout_secs: default_hosted_timeout(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_API_KEY`, then `GROQ_API_KEY`: API key, used only when no key is configured
    /// - `GROQ_ENDPOINT`: API base URL
    /// - `GROQ_MODEL`: Model name
    pub fn with_env_overrides(mut self) -> Self {
        self.api_key = self.api_key.filter(|k| !k.trim().is_empty());
        if self.api_key.is_none() {
            self.api_key = ["LLM_API_KEY", "GROQ_API_KEY"]
                .iter()
                .filter_map(|var| std::env::var(var).ok())
                .find(|k| !k.trim().is_empty());
        }

        if let Ok(val) = std::env::var("GROQ_ENDPOINT") {
            self.endpoint = normalize_endpoint(&val);
        }
        if let Ok(val) = std::env::var("GROQ_MODEL") {
            self.model = val;
        }
        self
    }

    /// Use an explicitly supplied key (CLI flag or form field) when non-empty.
    pub fn with_api_key(mut self, key: Option<&str>) -> Self {
        if let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) {
            self.api_key = Some(key.to_string());
        }
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = normalize_endpoint(endpoint);
        self
    }
}

/// Both model backends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub local: LocalLlmConfig,
    #[serde(default)]
    pub hosted: HostedLlmConfig,
}

impl LlmConfig {
    pub fn with_env_overrides(self) -> Self {
        Self {
            local: self.local.with_env_overrides(),
            hosted: self.hosted.with_env_overrides(),
        }
    }
}

/// Strip trailing slashes and add a scheme when missing (`OLLAMA_HOST` is often `host:port`).
fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_defaults() {
        let config = LocalLlmConfig::base_default();
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, None);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.list_timeout_secs, 5);
    }

    #[test]
    fn test_hosted_defaults() {
        let config = HostedLlmConfig::base_default();
        assert_eq!(config.endpoint, "https://api.groq.com/openai");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_explicit_api_key() {
        let config = HostedLlmConfig::base_default().with_api_key(Some("  gsk_test  "));
        assert_eq!(config.api_key.as_deref(), Some("gsk_test"));

        let config = HostedLlmConfig::base_default().with_api_key(Some("   "));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = HostedLlmConfig::base_default().with_api_key(Some("secret"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_partial_toml() {
        let config: LlmConfig = toml::from_str(
            r#"
            [local]
            model = "mistral"

            [hosted]
            temperature = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.local.model.as_deref(), Some("mistral"));
        assert_eq!(config.local.request_timeout_secs, 60);
        assert_eq!(config.hosted.temperature, 0.2);
        assert_eq!(config.hosted.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("http://host:11434/"), "http://host:11434");
        assert_eq!(normalize_endpoint("127.0.0.1:11434"), "http://127.0.0.1:11434");
        assert_eq!(
            normalize_endpoint("https://api.groq.com/openai"),
            "https://api.groq.com/openai"
        );
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(LlmProvider::from_str("ollama"), Some(LlmProvider::Local));
        assert_eq!(LlmProvider::from_str("GROQ"), Some(LlmProvider::Hosted));
        assert_eq!(LlmProvider::from_str("other"), None);
    }
}
