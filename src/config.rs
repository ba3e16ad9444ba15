//! Configuration management for docquery using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::documents::{ContextWindow, PdfBackend};
use crate::llm::LlmConfig;

/// Default address for the web server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Errors reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Text extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// How PDF pages are turned into text.
    #[serde(default)]
    pub pdf_backend: PdfBackend,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl ExtractionConfig {
    pub fn base_default() -> Self {
        Self {
            pdf_backend: PdfBackend::default(),
        }
    }

    /// Apply `DOCQ_PDF_BACKEND` (`native` or `pdftotext`).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("DOCQ_PDF_BACKEND") {
            match PdfBackend::from_str(&val) {
                Some(backend) => self.pdf_backend = backend,
                None => tracing::warn!("Ignoring unknown DOCQ_PDF_BACKEND value: {}", val),
            }
        }
        self
    }
}

/// Web server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `PORT`, `HOST` or `HOST:PORT`
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Largest accepted upload request, in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_max_upload_mb() -> usize {
    200
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Local and hosted model backends.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Character budgets for context and previews.
    #[serde(default)]
    pub context: ContextWindow,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration, preferring an explicit path over discovery.
    ///
    /// Unreadable or invalid files are logged and replaced by defaults.
    pub async fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => Some(expand_path(path)),
            None => Self::discover().await,
        };

        let Some(path) = path else {
            tracing::debug!("No config file found, using defaults");
            return Self::default();
        };

        match Self::load_from_path(&path).await {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Find a docquery config file in the standard locations.
    async fn discover() -> Option<PathBuf> {
        match prefer::load("docquery").await {
            Ok(pref_config) => pref_config.source_path().cloned(),
            Err(_) => None,
        }
    }

    /// Load configuration from a specific file path.
    /// The format follows the extension: TOML, YAML, or JSON otherwise.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Environment variables win over values from the file.
    pub fn with_env_overrides(mut self) -> Self {
        self.llm = self.llm.with_env_overrides();
        self.context = self.context.with_env_overrides();
        self.extraction = self.extraction.with_env_overrides();
        self
    }

    /// Effective configuration as JSON, with the API key redacted.
    pub fn to_display_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        let key = match self.llm.hosted.api_key {
            Some(_) => serde_json::Value::from("********"),
            None => serde_json::Value::Null,
        };
        if let Some(hosted) = value
            .get_mut("llm")
            .and_then(|llm| llm.get_mut("hosted"))
            .and_then(|hosted| hosted.as_object_mut())
        {
            hosted.insert("api_key".to_string(), key);
        }
        if let (Some(path), Some(root)) = (&self.source_path, value.as_object_mut()) {
            root.insert(
                "source_path".to_string(),
                serde_json::Value::from(path.display().to_string()),
            );
        }
        value
    }
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(&raw).as_ref()),
    }
}
