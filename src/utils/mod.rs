//! Shared utility functions.
//!
//! - `html`: HTML escaping for safe rendering
//! - `text`: character-budget slicing and whitespace normalization

mod html;
mod text;

pub use html::{html_escape, html_paragraphs};
pub use text::{collapse_whitespace, take_chars};
