//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes();

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Form targets (HTML)
        .route("/ask", post(handlers::ask_page))
        .route("/abbreviations", post(handlers::abbreviations_page))
        // JSON API
        .route("/api/models", get(handlers::api_models))
        .route("/api/ask", post(handlers::api_ask))
        .route("/api/abbreviations", post(handlers::api_abbreviations))
        // Static assets
        .route("/static/style.css", get(handlers::serve_css))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
