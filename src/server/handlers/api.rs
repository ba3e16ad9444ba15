//! Status and model listing endpoints.

use axum::{extract::State, Json};

use super::super::AppState;
use crate::llm::OllamaClient;

/// Liveness check.
pub async fn health() -> &'static str {
    "OK"
}

/// Models the local server lists; empty when it cannot be reached.
pub async fn api_models(State(state): State<AppState>) -> Json<Vec<String>> {
    let models = match OllamaClient::new(state.config.llm.local.clone()) {
        Ok(client) => client.available_models().await,
        Err(e) => {
            tracing::warn!("Could not create Ollama client: {}", e);
            Vec::new()
        }
    };
    Json(models)
}
