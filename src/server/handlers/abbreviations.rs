//! Abbreviation index handlers.

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Response},
    Json,
};

use super::super::{templates, AppState};
use super::forms::{ApiError, UploadForm};
use crate::abbreviations::ArticleReport;
use crate::services::index_articles;

async fn reports_for(
    state: &AppState,
    multipart: Multipart,
) -> Result<Vec<ArticleReport>, ApiError> {
    let form = UploadForm::read(multipart).await?;
    Ok(index_articles(&state.extractor, form.files, &state.config.context).await)
}

/// HTML form target.
pub async fn abbreviations_page(State(state): State<AppState>, multipart: Multipart) -> Response {
    match reports_for(&state, multipart).await {
        Ok(reports) => Html(templates::abbreviations_page(&reports)).into_response(),
        Err(e) => e.into_html(),
    }
}

/// JSON API.
pub async fn api_abbreviations(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<ArticleReport>>, ApiError> {
    Ok(Json(reports_for(&state, multipart).await?))
}
