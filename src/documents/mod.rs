//! Document ingestion.
//!
//! Turns uploaded files into text:
//! - `extractor`: PDF and plain-text extraction (lopdf or Poppler's pdftotext)
//! - `corpus`: concatenation layouts and the character-budget context window

mod corpus;
mod extractor;
#[doc(hidden)]
pub mod fixtures;

use std::path::Path;

use serde::Serialize;

pub use corpus::{ContextWindow, Corpus, CorpusLayout};
pub use extractor::{
    DocumentContent, ExtractedDocument, ExtractionBatch, ExtractionError, PdfBackend,
    SkippedDocument, TextExtractor,
};

/// A file handed to the tool, either read from disk or received as an upload.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Original file name (used for classification and reporting).
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk, naming it after the file name component.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Classify this upload.
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::classify(&self.name, &self.bytes)
    }
}

/// Kind of document, decided by extension with a content sniff fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Text,
    Unsupported,
}

impl DocumentKind {
    pub fn classify(name: &str, bytes: &[u8]) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("txt") => Self::Text,
            _ => match infer::get(bytes) {
                Some(kind) if kind.mime_type() == "application/pdf" => Self::Pdf,
                _ => Self::Unsupported,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "text",
            Self::Unsupported => "unsupported",
        }
    }
}
