//! Service layer for docquery business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services are used by both the CLI and the web server.

pub mod articles;
pub mod qa;

pub use articles::index_articles;
pub use qa::{connect_answerer, QaAnswer, QaError, QaSession};
