//! Home page and static asset handlers.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use super::super::{assets, templates, AppState};

/// Home page with the three forms.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let hosted = &state.config.llm.hosted;
    Html(templates::index_page(&hosted.name, hosted.api_key.is_some()))
}

/// Serve CSS.
pub async fn serve_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}
