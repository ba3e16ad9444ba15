//! Text extraction from uploaded PDF and plain-text documents.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DocumentKind, UploadedDocument};

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::ExtractionFailed(format!(
                    "{}: {}",
                    error_prefix,
                    stderr.trim()
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("{0} is not valid UTF-8 text")]
    InvalidUtf8(String),

    #[error("Failed to parse PDF: {0}")]
    Pdf(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend used to pull text out of PDF pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PdfBackend {
    /// Pure-Rust parsing with lopdf.
    #[default]
    Native,
    /// Poppler's pdftotext binary, one invocation per page.
    Pdftotext,
}

impl PdfBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "native" | "lopdf" => Some(Self::Native),
            "pdftotext" | "poppler" => Some(Self::Pdftotext),
            _ => None,
        }
    }
}

/// Extracted text of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum DocumentContent {
    /// Whole-file text (plain-text uploads).
    Text(String),
    /// One entry per PDF page, in page order.
    Pages(Vec<String>),
}

/// A document whose text has been extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedDocument {
    pub name: String,
    pub content: DocumentContent,
}

impl ExtractedDocument {
    pub fn kind(&self) -> DocumentKind {
        match self.content {
            DocumentContent::Text(_) => DocumentKind::Text,
            DocumentContent::Pages(_) => DocumentKind::Pdf,
        }
    }

    pub fn page_count(&self) -> Option<usize> {
        match &self.content {
            DocumentContent::Text(_) => None,
            DocumentContent::Pages(pages) => Some(pages.len()),
        }
    }
}

/// An upload that produced no text.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub name: String,
    pub reason: String,
}

/// Result of extracting a set of uploads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionBatch {
    pub documents: Vec<ExtractedDocument>,
    pub skipped: Vec<SkippedDocument>,
}

impl ExtractionBatch {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Text extractor for PDF and plain-text uploads.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    backend: PdfBackend,
}

impl TextExtractor {
    /// Create a new text extractor using the native PDF backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the PDF backend.
    pub fn with_backend(mut self, backend: PdfBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn backend(&self) -> PdfBackend {
        self.backend
    }

    /// Extract text from one upload.
    pub fn extract(&self, upload: &UploadedDocument) -> Result<ExtractedDocument, ExtractionError> {
        let content = match upload.kind() {
            DocumentKind::Text => {
                let text = String::from_utf8(upload.bytes.clone())
                    .map_err(|_| ExtractionError::InvalidUtf8(upload.name.clone()))?;
                DocumentContent::Text(text)
            }
            DocumentKind::Pdf => {
                let pages = match self.backend {
                    PdfBackend::Native => self.extract_pdf_native(&upload.bytes)?,
                    PdfBackend::Pdftotext => self.extract_pdf_poppler(&upload.bytes)?,
                };
                tracing::debug!("Extracted {} page(s) from {}", pages.len(), upload.name);
                DocumentContent::Pages(pages)
            }
            DocumentKind::Unsupported => {
                return Err(ExtractionError::UnsupportedFileType(upload.name.clone()))
            }
        };

        Ok(ExtractedDocument {
            name: upload.name.clone(),
            content,
        })
    }

    /// Extract every upload, keeping successes in order and recording failures.
    pub fn extract_all(&self, uploads: &[UploadedDocument]) -> ExtractionBatch {
        let mut batch = ExtractionBatch::default();
        for upload in uploads {
            match self.extract(upload) {
                Ok(doc) => batch.documents.push(doc),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", upload.name, e);
                    batch.skipped.push(SkippedDocument {
                        name: upload.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        batch
    }

    /// Run `extract_all` on the blocking thread pool.
    pub async fn extract_all_blocking(&self, uploads: Vec<UploadedDocument>) -> ExtractionBatch {
        let extractor = self.clone();
        let names: Vec<String> = uploads.iter().map(|u| u.name.clone()).collect();
        match tokio::task::spawn_blocking(move || extractor.extract_all(&uploads)).await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!("Extraction task failed: {}", e);
                ExtractionBatch {
                    documents: Vec::new(),
                    skipped: names
                        .into_iter()
                        .map(|name| SkippedDocument {
                            name,
                            reason: format!("extraction task failed: {}", e),
                        })
                        .collect(),
                }
            }
        }
    }

    /// Extract each page with lopdf. Pages that fail to decode yield empty text.
    fn extract_pdf_native(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let doc =
            lopdf::Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        let pages = doc.get_pages();
        for page_id in pages.values() {
            check_page_ancestry(&doc, *page_id)?;
        }

        let page_numbers: Vec<u32> = pages.keys().copied().collect();
        let pages = page_numbers
            .into_iter()
            .map(|page_num| match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!("No text on page {}: {}", page_num, e);
                    String::new()
                }
            })
            .collect();

        Ok(pages)
    }

    /// Extract each page with pdftotext, using pdfinfo for the page count.
    fn extract_pdf_poppler(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        let path = file.path();

        let page_count = self.get_pdf_page_count(path)?;
        let mut pages = Vec::with_capacity(page_count as usize);
        for page_num in 1..=page_count {
            pages.push(self.extract_pdf_page_text(path, page_num)?);
        }
        Ok(pages)
    }

    /// Run pdftotext on a single page of a PDF file.
    fn extract_pdf_page_text(&self, file_path: &Path, page: u32) -> Result<String, ExtractionError> {
        let page_str = page.to_string();
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(file_path)
            .arg("-") // Output to stdout
            .output();

        handle_cmd_output(
            output,
            "pdftotext (install poppler-utils)",
            &format!("pdftotext failed on page {}", page),
        )
        .map(|text| text.trim_end_matches('\x0c').to_string())
    }

    /// Get the page count of a PDF from pdfinfo.
    fn get_pdf_page_count(&self, file_path: &Path) -> Result<u32, ExtractionError> {
        let output = Command::new("pdfinfo").arg(file_path).output();
        let stdout = handle_cmd_output(output, "pdfinfo (install poppler-utils)", "pdfinfo failed")?;
        parse_page_count(&stdout).ok_or_else(|| {
            ExtractionError::ExtractionFailed("pdfinfo reported no page count".to_string())
        })
    }

    /// Check if the Poppler tools used by the pdftotext backend are available.
    pub fn check_tools() -> Vec<(String, bool)> {
        ["pdftotext", "pdfinfo"]
            .iter()
            .map(|tool| (tool.to_string(), which::which(tool).is_ok()))
            .collect()
    }
}

/// Deepest `/Parent` chain accepted for a page.
const MAX_PAGE_TREE_DEPTH: usize = 256;

/// Reject pages whose `/Parent` chain loops or never ends.
///
/// lopdf follows the chain recursively when collecting page resources.
fn check_page_ancestry(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> Result<(), ExtractionError> {
    let mut seen = HashSet::new();
    let mut current = Some(page_id);
    while let Some(id) = current {
        if !seen.insert(id) {
            return Err(ExtractionError::Pdf("cyclic page tree".to_string()));
        }
        if seen.len() > MAX_PAGE_TREE_DEPTH {
            return Err(ExtractionError::Pdf("page tree too deep".to_string()));
        }
        current = doc
            .get_dictionary(id)
            .and_then(|node| node.get(b"Parent"))
            .and_then(lopdf::Object::as_reference)
            .ok();
    }
    Ok(())
}

fn parse_page_count(pdfinfo_output: &str) -> Option<u32> {
    pdfinfo_output
        .lines()
        .find(|line| line.starts_with("Pages:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::fixtures::{sample_pdf, self_parented_pdf};

    #[test]
    fn test_extract_text_file() {
        let upload = UploadedDocument::new("notes.txt", b"Plain text body".to_vec());
        let doc = TextExtractor::new().extract(&upload).unwrap();
        assert_eq!(doc.name, "notes.txt");
        assert_eq!(doc.content, DocumentContent::Text("Plain text body".to_string()));
        assert_eq!(doc.kind(), DocumentKind::Text);
        assert_eq!(doc.page_count(), None);
    }

    #[test]
    fn test_extract_text_file_rejects_invalid_utf8() {
        let upload = UploadedDocument::new("broken.txt", vec![0x66, 0x6f, 0xff, 0xfe]);
        let err = TextExtractor::new().extract(&upload).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUtf8(name) if name == "broken.txt"));
    }

    #[test]
    fn test_extract_pdf_pages() {
        let bytes = sample_pdf(&["Hello first page", "Second page here"]).unwrap();
        let upload = UploadedDocument::new("article.pdf", bytes);
        let doc = TextExtractor::new().extract(&upload).unwrap();

        assert_eq!(doc.page_count(), Some(2));
        match doc.content {
            DocumentContent::Pages(pages) => {
                assert!(pages[0].contains("Hello first page"));
                assert!(pages[1].contains("Second page here"));
            }
            other => panic!("expected pages, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_corrupt_pdf() {
        let upload = UploadedDocument::new("bad.pdf", b"not really a pdf".to_vec());
        let err = TextExtractor::new().extract(&upload).unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }

    #[test]
    fn test_cyclic_page_tree_is_skipped() {
        let uploads = vec![
            UploadedDocument::new("good.txt", b"fine".to_vec()),
            UploadedDocument::new("loop.pdf", self_parented_pdf(&["one", "two"]).unwrap()),
        ];
        let batch = TextExtractor::new().extract_all(&uploads);

        assert_eq!(batch.documents.len(), 1);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].name, "loop.pdf");
        assert_eq!(batch.skipped[0].reason, "Failed to parse PDF: cyclic page tree");
    }

    #[test]
    fn test_extract_pdf_with_pdftotext() {
        if which::which("pdftotext").is_err() || which::which("pdfinfo").is_err() {
            println!("pdftotext not installed, skipping");
            return;
        }
        let upload = UploadedDocument::new(
            "report.pdf",
            sample_pdf(&["Poppler first page", "Poppler second page"]).unwrap(),
        );
        let extractor = TextExtractor::new().with_backend(PdfBackend::Pdftotext);
        assert_eq!(extractor.backend(), PdfBackend::Pdftotext);

        let doc = extractor.extract(&upload).unwrap();
        assert_eq!(doc.page_count(), Some(2));
        match doc.content {
            DocumentContent::Pages(pages) => {
                assert!(pages[0].contains("Poppler first page"));
                assert!(pages[1].contains("Poppler second page"));
                assert!(!pages[1].contains('\x0c'));
            }
            other => panic!("expected pages, got {:?}", other),
        }

        let bad = UploadedDocument::new("bad.pdf", b"%PDF-1.5 truncated".to_vec());
        assert!(extractor.extract(&bad).is_err());
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let output = Command::new("docquery-no-such-tool").output();
        let err = handle_cmd_output(output, "docquery-no-such-tool", "failed").unwrap_err();
        assert!(matches!(err, ExtractionError::ToolNotFound(tool) if tool == "docquery-no-such-tool"));
    }

    #[test]
    fn test_extract_all_records_skipped() {
        let uploads = vec![
            UploadedDocument::new("a.txt", b"alpha".to_vec()),
            UploadedDocument::new("b.docx", b"PK\x03\x04".to_vec()),
            UploadedDocument::new("c.txt", b"gamma".to_vec()),
        ];
        let batch = TextExtractor::new().extract_all(&uploads);

        let names: Vec<_> = batch.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "c.txt"]);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].name, "b.docx");
        assert!(batch.skipped[0].reason.contains("Unsupported"));
    }

    #[test]
    fn test_parse_page_count() {
        let output = "Title:          Report\nPages:          12\nEncrypted:      no\n";
        assert_eq!(parse_page_count(output), Some(12));
        assert_eq!(parse_page_count("Title: x\n"), None);
    }

    #[test]
    fn test_pdf_backend_from_str() {
        assert_eq!(PdfBackend::from_str("native"), Some(PdfBackend::Native));
        assert_eq!(PdfBackend::from_str("Poppler"), Some(PdfBackend::Pdftotext));
        assert_eq!(PdfBackend::from_str("ocr"), None);
    }

    #[test]
    fn test_check_tools() {
        let tools = TextExtractor::check_tools();
        let names: Vec<_> = tools.iter().map(|(tool, _)| tool.as_str()).collect();
        assert_eq!(names, vec!["pdftotext", "pdfinfo"]);
        for (tool, available) in tools {
            assert_eq!(available, which::which(&tool).is_ok());
        }
    }
}
