//! Question answering over uploaded documents.
//!
//! A session holds the extracted corpus for one set of uploads. Every question
//! is answered independently from the same context window; nothing from earlier
//! answers is sent back to the model.

use serde::Serialize;
use thiserror::Error;

use crate::documents::{ContextWindow, Corpus, CorpusLayout, ExtractedDocument};
use crate::llm::{
    HostedClient, LlmConfig, LlmError, LlmProvider, OllamaClient, QuestionAnswerer,
};

/// Errors that stop a question before it reaches a model.
#[derive(Debug, Error)]
pub enum QaError {
    #[error("Please enter a question")]
    EmptyQuestion,

    #[error("Upload documents to ask questions about them")]
    NoDocuments,
}

/// An answer, or the user-facing failure message in its place.
#[derive(Debug, Clone, Serialize)]
pub struct QaAnswer {
    pub question: String,
    pub answer: String,
    /// True when `answer` is an error message rather than model output.
    pub failed: bool,
    pub provider: String,
    pub model: String,
    pub context_preview: String,
}

/// Outcome of loading documents into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub documents: usize,
    /// True when extraction produced only whitespace.
    pub blank: bool,
}

/// Documents plus the backend answering questions about them.
pub struct QaSession {
    answerer: Box<dyn QuestionAnswerer>,
    provider: LlmProvider,
    window: ContextWindow,
    corpus: Option<Corpus>,
}

impl QaSession {
    pub fn new(
        answerer: Box<dyn QuestionAnswerer>,
        provider: LlmProvider,
        window: ContextWindow,
    ) -> Self {
        Self {
            answerer,
            provider,
            window,
            corpus: None,
        }
    }

    pub fn answerer(&self) -> &dyn QuestionAnswerer {
        self.answerer.as_ref()
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Concatenation layout used for this session's provider.
    pub fn layout(&self) -> CorpusLayout {
        layout_for(self.provider)
    }

    /// Replace the session corpus with the given documents.
    ///
    /// For the local provider a blank corpus is not kept, so later questions
    /// fail with `QaError::NoDocuments`.
    pub fn load(&mut self, documents: &[ExtractedDocument]) -> LoadSummary {
        let corpus = Corpus::build(documents, self.layout());
        let blank = corpus.is_blank();
        if blank {
            tracing::warn!("No text could be extracted from documents");
        }
        let summary = LoadSummary {
            documents: corpus.document_count(),
            blank,
        };

        self.corpus = if blank && self.requires_documents() {
            None
        } else {
            Some(corpus)
        };
        summary
    }

    pub fn has_documents(&self) -> bool {
        self.corpus.is_some()
    }

    fn requires_documents(&self) -> bool {
        matches!(self.provider, LlmProvider::Local)
    }

    /// Full corpus text (empty before anything is loaded).
    pub fn corpus_text(&self) -> &str {
        self.corpus.as_ref().map(Corpus::text).unwrap_or("")
    }

    /// Text actually sent to the model.
    pub fn context(&self) -> &str {
        self.window.window(self.corpus_text())
    }

    pub fn context_preview(&self) -> String {
        self.window.preview(self.corpus_text())
    }

    /// Answer one question about the loaded documents.
    pub async fn ask(&self, question: &str) -> Result<QaAnswer, QaError> {
        if question.trim().is_empty() {
            return Err(QaError::EmptyQuestion);
        }
        if self.requires_documents() && self.corpus.is_none() {
            return Err(QaError::NoDocuments);
        }

        let context = self.context();
        tracing::info!(
            "Asking {} ({}) with {} chars of context",
            self.answerer.display_name(),
            self.answerer.model(),
            context.chars().count()
        );

        let (answer, failed) = match self.answerer.answer(question, context).await {
            Ok(text) => (text, false),
            Err(e) => {
                tracing::warn!("{} request failed: {}", self.answerer.display_name(), e);
                (e.user_message(), true)
            }
        };

        Ok(QaAnswer {
            question: question.to_string(),
            answer,
            failed,
            provider: self.answerer.display_name().to_string(),
            model: self.answerer.model().to_string(),
            context_preview: self.context_preview(),
        })
    }
}

/// Concatenation layout for a provider.
pub fn layout_for(provider: LlmProvider) -> CorpusLayout {
    match provider {
        LlmProvider::Local => CorpusLayout::LOCAL_QA,
        LlmProvider::Hosted => CorpusLayout::HOSTED_QA,
    }
}

/// Build the backend for a provider.
///
/// The local backend checks the server's model list first; the hosted backend
/// requires an API key.
pub async fn connect_answerer(
    provider: LlmProvider,
    config: &LlmConfig,
) -> Result<Box<dyn QuestionAnswerer>, LlmError> {
    match provider {
        LlmProvider::Local => {
            let client = OllamaClient::connect(config.local.clone()).await?;
            Ok(Box::new(client))
        }
        LlmProvider::Hosted => {
            let client = HostedClient::new(config.hosted.clone())?;
            Ok(Box::new(client))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::documents::DocumentContent;
    use crate::llm::prompts::{render, HOSTED_QA_PROMPT};

    /// Records every prompt and replies with a canned result.
    struct StubAnswerer {
        prompts: Arc<Mutex<Vec<String>>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl QuestionAnswerer for StubAnswerer {
        fn display_name(&self) -> &str {
            "Stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }

        fn build_prompt(&self, question: &str, context: &str) -> String {
            render(HOSTED_QA_PROMPT, question, context)
        }

        async fn answer(&self, question: &str, context: &str) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push(self.build_prompt(question, context));
            match self.fail_with {
                Some(status) => Err(LlmError::ApiStatus(status)),
                None => Ok("stub answer".to_string()),
            }
        }
    }

    fn session(
        provider: LlmProvider,
        window: ContextWindow,
        fail_with: Option<u16>,
    ) -> (QaSession, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let answerer = StubAnswerer {
            prompts: prompts.clone(),
            fail_with,
        };
        (QaSession::new(Box::new(answerer), provider, window), prompts)
    }

    fn text_doc(text: &str) -> ExtractedDocument {
        ExtractedDocument {
            name: "doc.txt".to_string(),
            content: DocumentContent::Text(text.to_string()),
        }
    }

    #[tokio::test]
    async fn test_context_is_windowed() {
        let window = ContextWindow {
            max_chars: 5,
            preview_chars: 3,
        };
        let (mut session, prompts) = session(LlmProvider::Hosted, window, None);
        let summary = session.load(&[text_doc("abcdefghij")]);
        assert_eq!(summary.documents, 1);
        assert!(!summary.blank);

        let answer = session.ask("What?").await.unwrap();
        assert_eq!(answer.answer, "stub answer");
        assert!(!answer.failed);
        assert_eq!(answer.context_preview, "abc...");
        assert_eq!(answer.model, "stub-model");

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts[0], "Context: abcde\n\nQuestion: What?\n\nAnswer:");
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let (mut session, prompts) = session(LlmProvider::Hosted, ContextWindow::base_default(), None);
        session.load(&[text_doc("text")]);
        assert!(matches!(session.ask("   ").await, Err(QaError::EmptyQuestion)));
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_question_sent_as_typed() {
        let (session, prompts) = session(LlmProvider::Hosted, ContextWindow::base_default(), None);
        let answer = session.ask("  Why?\n").await.unwrap();
        assert_eq!(answer.question, "  Why?\n");
        assert_eq!(
            prompts.lock().unwrap()[0],
            "Context: \n\nQuestion:   Why?\n\n\nAnswer:"
        );
    }

    #[tokio::test]
    async fn test_local_requires_documents() {
        let (mut session, _) = session(LlmProvider::Local, ContextWindow::base_default(), None);
        assert!(matches!(session.ask("Hi").await, Err(QaError::NoDocuments)));

        let summary = session.load(&[text_doc("  \n ")]);
        assert!(summary.blank);
        assert!(!session.has_documents());
        assert!(matches!(session.ask("Hi").await, Err(QaError::NoDocuments)));
    }

    #[tokio::test]
    async fn test_hosted_runs_without_documents() {
        let (session, prompts) = session(LlmProvider::Hosted, ContextWindow::base_default(), None);
        let answer = session.ask("General question").await.unwrap();
        assert_eq!(answer.answer, "stub answer");
        assert_eq!(
            prompts.lock().unwrap()[0],
            "Context: \n\nQuestion: General question\n\nAnswer:"
        );
    }

    #[tokio::test]
    async fn test_failure_becomes_message() {
        let (mut session, _) = session(LlmProvider::Hosted, ContextWindow::base_default(), Some(429));
        session.load(&[text_doc("text")]);
        let answer = session.ask("Hi").await.unwrap();
        assert!(answer.failed);
        assert_eq!(answer.answer, "API Error: 429");
    }

    #[test]
    fn test_layout_for_provider() {
        assert_eq!(layout_for(LlmProvider::Local), CorpusLayout::LOCAL_QA);
        assert_eq!(layout_for(LlmProvider::Hosted), CorpusLayout::HOSTED_QA);
    }
}
