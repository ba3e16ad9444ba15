//! Question answering handlers.

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::super::{templates, AppState};
use super::forms::{ApiError, AskForm, UploadForm};
use crate::documents::SkippedDocument;
use crate::llm::LlmProvider;
use crate::services::{connect_answerer, QaAnswer, QaError, QaSession};

/// Outcome of one question over one set of uploads.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    #[serde(flatten)]
    pub answer: QaAnswer,
    pub documents: usize,
    pub skipped: Vec<SkippedDocument>,
}

/// Extract the uploads and answer the question.
pub async fn answer_form(state: &AppState, form: AskForm) -> Result<AskResponse, ApiError> {
    if form.question.trim().is_empty() {
        return Err(QaError::EmptyQuestion.into());
    }

    let mut llm = state.config.llm.clone();
    match form.provider {
        LlmProvider::Local => {
            if let Some(model) = &form.model {
                llm.local = llm.local.with_model(model);
            }
        }
        LlmProvider::Hosted => {
            if let Some(model) = &form.model {
                llm.hosted = llm.hosted.with_model(model);
            }
            llm.hosted = llm.hosted.with_api_key(form.api_key.as_deref());
        }
    }

    let answerer = connect_answerer(form.provider, &llm).await?;
    let mut session = QaSession::new(answerer, form.provider, state.config.context);

    let batch = state.extractor.extract_all_blocking(form.files).await;
    let summary = session.load(&batch.documents);
    tracing::info!(
        "Answering with {} document(s), {} skipped",
        summary.documents,
        batch.skipped.len()
    );

    let answer = session.ask(&form.question).await?;
    Ok(AskResponse {
        answer,
        documents: summary.documents,
        skipped: batch.skipped,
    })
}

async fn read_ask_form(multipart: Multipart) -> Result<AskForm, ApiError> {
    AskForm::try_from(UploadForm::read(multipart).await?)
}

/// HTML form target.
pub async fn ask_page(State(state): State<AppState>, multipart: Multipart) -> Response {
    let result = match read_ask_form(multipart).await {
        Ok(form) => answer_form(&state, form).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(response) => Html(templates::answer_page(
            &response.answer,
            response.documents,
            &response.skipped,
        ))
        .into_response(),
        Err(e) => e.into_html(),
    }
}

/// JSON API.
pub async fn api_ask(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AskResponse>, ApiError> {
    let form = read_ask_form(multipart).await?;
    Ok(Json(answer_form(&state, form).await?))
}
