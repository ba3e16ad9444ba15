//! Per-article abbreviation reports.

use serde::Serialize;

use super::AbbreviationIndex;
use crate::documents::{ContextWindow, CorpusLayout, ExtractedDocument};

/// What the scan of one article produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArticleOutcome {
    /// Extraction produced only whitespace.
    NoText,
    /// Text was found but no pairs matched; carries the start of the text.
    NoAbbreviations { excerpt: String },
    /// At least one pair matched.
    Found { abbreviations: AbbreviationIndex },
}

/// Abbreviation index for one uploaded article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleReport {
    /// 1-based position in upload order.
    pub number: usize,
    pub name: String,
    #[serde(flatten)]
    pub outcome: ArticleOutcome,
}

impl ArticleReport {
    /// Scan raw article text.
    pub fn build(number: usize, name: &str, text: &str, window: &ContextWindow) -> Self {
        let outcome = if text.trim().is_empty() {
            tracing::warn!("No text extracted from {}", name);
            ArticleOutcome::NoText
        } else {
            let abbreviations = AbbreviationIndex::from_text(text);
            if abbreviations.is_empty() {
                ArticleOutcome::NoAbbreviations {
                    excerpt: window.excerpt(text),
                }
            } else {
                ArticleOutcome::Found { abbreviations }
            }
        };

        Self {
            number,
            name: name.to_string(),
            outcome,
        }
    }

    /// Scan an extracted document using the article layout.
    pub fn from_document(number: usize, doc: &ExtractedDocument, window: &ContextWindow) -> Self {
        let text = CorpusLayout::ARTICLE.render(doc);
        Self::build(number, &doc.name, &text, window)
    }

    /// Report for an upload that could not be read at all.
    pub fn unreadable(number: usize, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            outcome: ArticleOutcome::NoText,
        }
    }

    /// `Article N: name`
    pub fn title(&self) -> String {
        format!("Article {}: {}", self.number, self.name)
    }

    /// One-line status message for the article.
    pub fn summary(&self) -> String {
        match &self.outcome {
            ArticleOutcome::NoText => format!("No text extracted from {}", self.name),
            ArticleOutcome::NoAbbreviations { .. } => {
                "No abbreviations found in standard format".to_string()
            }
            ArticleOutcome::Found { abbreviations } => {
                format!("Found {} abbreviations", abbreviations.len())
            }
        }
    }

    pub fn abbreviations(&self) -> Option<&AbbreviationIndex> {
        match &self.outcome {
            ArticleOutcome::Found { abbreviations } => Some(abbreviations),
            _ => None,
        }
    }
}
