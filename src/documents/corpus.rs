//! Corpus assembly and context windowing.

use serde::{Deserialize, Serialize};

use super::extractor::{DocumentContent, ExtractedDocument};
use crate::utils::take_chars;

/// Separators used when concatenating extracted documents.
///
/// Each flow joins pages and files slightly differently; the layouts keep
/// those differences explicit instead of scattering string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusLayout {
    /// Appended after a plain-text document.
    pub text_suffix: &'static str,
    /// Appended after every kept PDF page.
    pub page_suffix: &'static str,
    /// Appended after a whole PDF document.
    pub pdf_suffix: &'static str,
    /// Drop pages whose text is empty.
    pub skip_empty_pages: bool,
}

impl CorpusLayout {
    /// Local model flow: every page followed by a blank line.
    pub const LOCAL_QA: Self = Self {
        text_suffix: "\n\n",
        page_suffix: "\n\n",
        pdf_suffix: "",
        skip_empty_pages: false,
    };

    /// Hosted API flow: pages on their own line, documents separated by a blank line.
    pub const HOSTED_QA: Self = Self {
        text_suffix: "\n\n",
        page_suffix: "\n",
        pdf_suffix: "\n\n",
        skip_empty_pages: false,
    };

    /// Abbreviation flow: a single article, empty pages dropped.
    pub const ARTICLE: Self = Self {
        text_suffix: "",
        page_suffix: "\n",
        pdf_suffix: "",
        skip_empty_pages: true,
    };

    /// Render one document with this layout.
    pub fn render(&self, doc: &ExtractedDocument) -> String {
        let mut out = String::new();
        self.render_into(doc, &mut out);
        out
    }

    fn render_into(&self, doc: &ExtractedDocument, out: &mut String) {
        match &doc.content {
            DocumentContent::Text(text) => {
                out.push_str(text);
                out.push_str(self.text_suffix);
            }
            DocumentContent::Pages(pages) => {
                for page in pages {
                    if self.skip_empty_pages && page.is_empty() {
                        continue;
                    }
                    out.push_str(page);
                    out.push_str(self.page_suffix);
                }
                out.push_str(self.pdf_suffix);
            }
        }
    }
}

/// Concatenated text of every extracted document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    text: String,
    document_count: usize,
}

impl Corpus {
    /// Concatenate documents in order using the given layout.
    pub fn build(documents: &[ExtractedDocument], layout: CorpusLayout) -> Self {
        let mut text = String::new();
        for doc in documents {
            layout.render_into(doc, &mut text);
        }
        Self {
            text,
            document_count: documents.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// True when no visible text was extracted.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Character budgets applied to a corpus before it reaches a model or a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    /// Characters of corpus sent to the model.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// Characters shown when previewing the context.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_max_chars() -> usize {
    4000
}

fn default_preview_chars() -> usize {
    1000
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl ContextWindow {
    pub fn base_default() -> Self {
        Self {
            max_chars: default_max_chars(),
            preview_chars: default_preview_chars(),
        }
    }

    /// Apply `DOCQ_MAX_CONTEXT_CHARS` and `DOCQ_PREVIEW_CHARS`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(n) = std::env::var("DOCQ_MAX_CONTEXT_CHARS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.max_chars = n;
        }
        if let Some(n) = std::env::var("DOCQ_PREVIEW_CHARS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.preview_chars = n;
        }
        self
    }

    /// The prefix of `text` sent to the model.
    pub fn window<'a>(&self, text: &'a str) -> &'a str {
        take_chars(text, self.max_chars)
    }

    /// Preview of the context, always followed by an ellipsis.
    pub fn preview(&self, text: &str) -> String {
        format!("{}...", take_chars(text, self.preview_chars))
    }

    /// Excerpt of `text`, with an ellipsis only when something was cut.
    pub fn excerpt(&self, text: &str) -> String {
        let head = take_chars(text, self.preview_chars);
        if head.len() < text.len() {
            format!("{}...", head)
        } else {
            text.to_string()
        }
    }
}
