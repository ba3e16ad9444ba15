//! Web interface for document question answering and abbreviation indexes.
//!
//! Provides:
//! - Upload forms for local and hosted question answering
//! - An abbreviation index page with one report per article
//! - JSON equivalents under `/api`

mod assets;
mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::documents::TextExtractor;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: TextExtractor,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let extractor = TextExtractor::new().with_backend(config.extraction.pdf_backend);
        Self {
            config: Arc::new(config),
            extractor,
        }
    }
}

/// Start the web server.
pub async fn serve(config: Config, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(AppState::new(config));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
