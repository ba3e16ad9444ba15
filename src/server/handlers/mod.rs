//! HTTP request handlers for the web server.

mod abbreviations;
mod api;
mod ask;
mod forms;
mod static_files;

// Re-export handlers for use by the router
pub use abbreviations::{abbreviations_page, api_abbreviations};
pub use api::{api_models, health};
pub use ask::{api_ask, ask_page};
pub use static_files::{index, serve_css};
