//! Multipart form parsing and the error type shared by handlers.

use std::collections::HashMap;

use axum::{
    extract::multipart::{Multipart, MultipartError},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use super::super::templates;
use crate::documents::UploadedDocument;
use crate::llm::{LlmError, LlmProvider, API_KEY_HINT, OLLAMA_SETUP_HINT};
use crate::services::QaError;

/// A request that could not be served.
#[derive(Debug)]
pub enum ApiError {
    /// Something the user can fix in the form.
    BadRequest {
        message: String,
        hint: Option<&'static str>,
    },
    /// The local model server has nothing to answer with.
    Unavailable {
        message: String,
        hint: Option<&'static str>,
    },
    /// The model backend failed in an unexpected way.
    Upstream(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            hint: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::Unavailable { message, .. } => message,
            Self::Upstream(message) => message,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::BadRequest { hint, .. } | Self::Unavailable { hint, .. } => *hint,
            Self::Upstream(_) => None,
        }
    }

    /// Render as an HTML error page with the matching status.
    pub fn into_html(self) -> Response {
        let page = templates::error_page(self.message(), self.hint());
        (self.status(), Html(page)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "error": self.message() });
        if let Some(hint) = self.hint() {
            body["hint"] = serde_json::Value::from(hint);
        }
        (self.status(), Json(body)).into_response()
    }
}

impl From<QaError> for ApiError {
    fn from(e: QaError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<LlmError> for ApiError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::NoModels => Self::Unavailable {
                message: e.to_string(),
                hint: Some(OLLAMA_SETUP_HINT),
            },
            LlmError::MissingApiKey(_) => Self::BadRequest {
                message: e.to_string(),
                hint: Some(API_KEY_HINT),
            },
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::bad_request(format!("Invalid upload: {}", e))
    }
}

/// Uploaded files plus the text fields of a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedDocument>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Read every part. File parts named `files` or `file` become uploads;
    /// an empty file input (no name, no bytes) is ignored.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "files" | "file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    let file_name = if file_name.is_empty() {
                        format!("upload-{}", form.files.len() + 1)
                    } else {
                        file_name
                    };
                    form.files.push(UploadedDocument::new(file_name, bytes.to_vec()));
                }
                _ => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    /// A text field, `None` when missing or blank.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Fields of a question form.
#[derive(Debug)]
pub struct AskForm {
    pub files: Vec<UploadedDocument>,
    pub question: String,
    pub provider: LlmProvider,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

impl TryFrom<UploadForm> for AskForm {
    type Error = ApiError;

    fn try_from(form: UploadForm) -> Result<Self, ApiError> {
        let provider = match form.field("provider") {
            None => LlmProvider::default(),
            Some(value) => LlmProvider::from_str(value)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown provider: {}", value)))?,
        };
        let question = form.fields.get("question").cloned().unwrap_or_default();
        let model = form.field("model").map(str::to_string);
        let api_key = form.field("api_key").map(str::to_string);

        Ok(Self {
            files: form.files,
            question,
            provider,
            model,
            api_key,
        })
    }
}
