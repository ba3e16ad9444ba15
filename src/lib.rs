//! docquery - question answering and abbreviation indexing over documents.
//!
//! Uploaded PDF and text files are turned into text, then either sent as
//! context to a local (Ollama) or hosted (OpenAI-compatible) model together
//! with a question, or scanned for abbreviation definitions.

pub mod abbreviations;
pub mod cli;
pub mod config;
pub mod documents;
pub mod llm;
pub mod server;
pub mod services;
pub mod utils;
