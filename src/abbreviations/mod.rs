//! Abbreviation index generation.
//!
//! Finds abbreviation/expansion pairs written in one of four common forms:
//!
//! | Form                              | Example                            |
//! |-----------------------------------|------------------------------------|
//! | `Full Term (ABBR)`                | `Magnetic Resonance Imaging (MRI)` |
//! | `ABBR (Full Term)`                | `WHO (World Health Organization)`  |
//! | `ABBR = Full Term` (`=`, `-`, `:`)| `CPU = Central Processing Unit`    |
//! | `Full Term = ABBR` (`=`, `-`, `:`)| `Random Access Memory: RAM`        |
//!
//! Patterns run in that order over the whole text. For every match the
//! upper-case side of 2 to 6 characters becomes the abbreviation; the first
//! expansion seen for an abbreviation wins.

mod report;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::utils::collapse_whitespace;

pub use report::{ArticleOutcome, ArticleReport};

/// Shortest abbreviation accepted, in characters.
const MIN_ABBREVIATION_CHARS: usize = 2;
/// Longest abbreviation accepted, in characters.
const MAX_ABBREVIATION_CHARS: usize = 6;

/// Which textual form a pair was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// `Full Term (ABBR)`
    TermThenParenthesized,
    /// `ABBR (Full Term)`
    AbbreviationThenParenthesized,
    /// `ABBR = Full Term`
    AbbreviationDefined,
    /// `Full Term = ABBR`
    TermDefined,
}

static PATTERNS: LazyLock<Vec<(Regex, PatternKind)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"([A-Z][A-Za-z\s\-]{2,})\s*\(([A-Z]{2,})\)").unwrap(),
            PatternKind::TermThenParenthesized,
        ),
        (
            Regex::new(r"([A-Z]{2,})\s*\(([A-Z][A-Za-z\s\-]{2,})\)").unwrap(),
            PatternKind::AbbreviationThenParenthesized,
        ),
        (
            Regex::new(r"\b([A-Z]{2,})\b\s*[=\-:]\s*([A-Z][A-Za-z\s\-]{2,})").unwrap(),
            PatternKind::AbbreviationDefined,
        ),
        (
            Regex::new(r"([A-Z][A-Za-z\s\-]{2,})\s*[=\-:]\s*\b([A-Z]{2,})\b").unwrap(),
            PatternKind::TermDefined,
        ),
    ]
});

/// One abbreviation and the expansion recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Abbreviation {
    pub abbreviation: String,
    pub expansion: String,
    pub pattern: PatternKind,
}

/// Abbreviations found in a text, keyed and ordered by abbreviation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AbbreviationIndex {
    entries: BTreeMap<String, Abbreviation>,
}

impl AbbreviationIndex {
    /// Scan `text` with every pattern in order.
    pub fn from_text(text: &str) -> Self {
        let mut index = Self::default();
        for (pattern, kind) in PATTERNS.iter() {
            for caps in pattern.captures_iter(text) {
                let (Some(first), Some(second)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                if let Some((abbreviation, expansion)) = classify_pair(first.as_str(), second.as_str())
                {
                    index.insert(abbreviation, expansion, *kind);
                }
            }
        }
        tracing::debug!("Found {} abbreviations", index.len());
        index
    }

    /// Record a pair unless the abbreviation already has an expansion.
    fn insert(&mut self, abbreviation: String, expansion: String, pattern: PatternKind) {
        self.entries
            .entry(abbreviation.clone())
            .or_insert(Abbreviation {
                abbreviation,
                expansion,
                pattern,
            });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, abbreviation: &str) -> Option<&str> {
        self.entries
            .get(abbreviation)
            .map(|entry| entry.expansion.as_str())
    }

    /// Entries in sorted abbreviation order.
    pub fn iter(&self) -> impl Iterator<Item = &Abbreviation> {
        self.entries.values()
    }

    /// Render as `• ABBR: Full Term` lines.
    pub fn format(&self) -> String {
        if self.entries.is_empty() {
            return "No abbreviations found.".to_string();
        }
        self.entries
            .values()
            .map(|entry| format!("• {}: {}", entry.abbreviation, entry.expansion))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Decide which side of a matched pair is the abbreviation.
///
/// The second capture is tried first. Lengths are measured before trimming.
fn classify_pair(term1: &str, term2: &str) -> Option<(String, String)> {
    if looks_like_abbreviation(term2) {
        Some((term2.trim().to_string(), collapse_whitespace(term1)))
    } else if looks_like_abbreviation(term1) {
        Some((term1.trim().to_string(), collapse_whitespace(term2)))
    } else {
        None
    }
}

fn looks_like_abbreviation(term: &str) -> bool {
    let len = term.chars().count();
    is_upper(term) && (MIN_ABBREVIATION_CHARS..=MAX_ABBREVIATION_CHARS).contains(&len)
}

/// True when `s` has at least one cased character and none of them is lower-case.
fn is_upper(s: &str) -> bool {
    let mut has_cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_then_parenthesized() {
        let index = AbbreviationIndex::from_text("Magnetic Resonance Imaging (MRI) is common.");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("MRI"), Some("Magnetic Resonance Imaging"));
        assert_eq!(
            index.iter().next().unwrap().pattern,
            PatternKind::TermThenParenthesized
        );
    }

    #[test]
    fn test_abbreviation_then_parenthesized() {
        let index = AbbreviationIndex::from_text("WHO (World Health Organization) said so.");
        assert_eq!(index.get("WHO"), Some("World Health Organization"));
    }

    #[test]
    fn test_abbreviation_defined() {
        let index = AbbreviationIndex::from_text("CPU = Central Processing Unit");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("CPU"), Some("Central Processing Unit"));
    }

    #[test]
    fn test_term_defined() {
        let index = AbbreviationIndex::from_text("Random Access Memory: RAM");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("RAM"), Some("Random Access Memory"));
        assert_eq!(index.iter().next().unwrap().pattern, PatternKind::TermDefined);
    }

    #[test]
    fn test_expansion_whitespace_is_collapsed() {
        let index = AbbreviationIndex::from_text("Natural\nLanguage   Processing (NLP).");
        assert_eq!(index.get("NLP"), Some("Natural Language Processing"));
    }

    #[test]
    fn test_first_expansion_wins() {
        let index = AbbreviationIndex::from_text(
            "Magnetic Resonance Imaging (MRI). MRI (Medical Record Index).",
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("MRI"), Some("Magnetic Resonance Imaging"));
    }

    #[test]
    fn test_long_abbreviation_is_rejected() {
        let index = AbbreviationIndex::from_text("Very Long Acronym (ABCDEFGH)");
        assert!(index.is_empty());
    }

    #[test]
    fn test_falls_back_to_first_term() {
        // Second term is upper-case but too long, so the first term is the abbreviation.
        let index = AbbreviationIndex::from_text("NASA = NATIONAL AERONAUTICS");
        assert_eq!(index.get("NASA"), Some("NATIONAL AERONAUTICS"));
    }

    #[test]
    fn test_format_sorted() {
        let index = AbbreviationIndex::from_text(
            "WHO (World Health Organization). Central Processing Unit (CPU).",
        );
        assert_eq!(
            index.format(),
            "• CPU: Central Processing Unit\n• WHO: World Health Organization"
        );
    }

    #[test]
    fn test_format_empty() {
        let index = AbbreviationIndex::from_text("nothing to see here");
        assert_eq!(index.format(), "No abbreviations found.");
    }

    #[test]
    fn test_is_upper() {
        assert!(is_upper("NASA"));
        assert!(is_upper("NASA "));
        assert!(is_upper("A-B"));
        assert!(!is_upper("Nasa"));
        assert!(!is_upper(" - "));
        assert!(!is_upper(""));
    }

    #[test]
    fn test_classify_pair() {
        assert_eq!(
            classify_pair("Gross Domestic Product ", "GDP"),
            Some(("GDP".to_string(), "Gross Domestic Product".to_string()))
        );
        assert_eq!(
            classify_pair("GDP ", "Gross Domestic Product"),
            Some(("GDP".to_string(), "Gross Domestic Product".to_string()))
        );
        assert_eq!(classify_pair("Alpha", "Beta"), None);
    }
}
