//! Question answering command.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::helpers::{read_uploads, report_skipped, spinner};
use crate::cli::icons::{error, info, success, warn};
use crate::config::Config;
use crate::documents::TextExtractor;
use crate::llm::{LlmConfig, LlmError, LlmProvider, API_KEY_HINT, OLLAMA_SETUP_HINT};
use crate::services::{connect_answerer, QaAnswer, QaError, QaSession};

#[derive(Args)]
pub struct AskArgs {
    /// Question to ask; questions are read from stdin, one per line, when omitted
    pub question: Option<String>,
    /// PDF or text files to ask about
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,
    /// Model backend
    #[arg(short, long, value_enum, default_value = "local")]
    pub provider: LlmProvider,
    /// Model name (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,
    /// API endpoint (overrides config)
    #[arg(long)]
    pub endpoint: Option<String>,
    /// API key for the hosted provider (falls back to config, then GROQ_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,
    /// Print the start of the context sent to the model
    #[arg(long)]
    pub show_context: bool,
}

impl AskArgs {
    /// Config with command-line overrides applied to the chosen provider.
    fn llm_config(&self, base: &LlmConfig) -> LlmConfig {
        let mut llm = base.clone();
        match self.provider {
            LlmProvider::Local => {
                if let Some(model) = &self.model {
                    llm.local = llm.local.with_model(model);
                }
                if let Some(endpoint) = &self.endpoint {
                    llm.local = llm.local.with_endpoint(endpoint);
                }
            }
            LlmProvider::Hosted => {
                if let Some(model) = &self.model {
                    llm.hosted = llm.hosted.with_model(model);
                }
                if let Some(endpoint) = &self.endpoint {
                    llm.hosted = llm.hosted.with_endpoint(endpoint);
                }
                llm.hosted = llm.hosted.with_api_key(self.api_key.as_deref());
            }
        }
        llm
    }
}

/// Answer questions about a set of documents.
pub async fn cmd_ask(config: &Config, args: AskArgs) -> anyhow::Result<()> {
    let llm = args.llm_config(&config.llm);

    let pb = spinner("Connecting to model...");
    let answerer = connect_answerer(args.provider, &llm).await;
    pb.finish_and_clear();

    let answerer = match answerer {
        Ok(answerer) => answerer,
        Err(e) => {
            eprintln!("{} {}", error(), e);
            match &e {
                LlmError::NoModels => eprintln!("{}", style(OLLAMA_SETUP_HINT).dim()),
                LlmError::MissingApiKey(_) => eprintln!("  {}", style(API_KEY_HINT).dim()),
                _ => {}
            }
            std::process::exit(1);
        }
    };
    println!(
        "{} Using {} ({})",
        success(),
        answerer.display_name(),
        answerer.model()
    );

    let mut session = QaSession::new(answerer, args.provider, config.context);

    if !args.files.is_empty() {
        let uploads = read_uploads(&args.files).await?;
        let extractor = TextExtractor::new().with_backend(config.extraction.pdf_backend);

        let pb = spinner(format!("Reading {} document(s)...", uploads.len()));
        let batch = extractor.extract_all_blocking(uploads).await;
        pb.finish_and_clear();

        report_skipped(&batch);
        let summary = session.load(&batch.documents);
        if summary.blank {
            eprintln!("{} No text could be extracted from documents", warn());
        } else {
            println!("{} Loaded {} document(s)", success(), summary.documents);
        }
    }

    if args.show_context {
        println!("\n{}", style("Document Content Preview").bold());
        println!("{}", "-".repeat(40));
        println!("{}\n", session.context_preview());
    }

    match args.question.as_deref() {
        Some(question) => Ok(ask_one(&session, question).await?),
        None => ask_from_stdin(&session).await,
    }
}

async fn ask_from_stdin(session: &QaSession) -> anyhow::Result<()> {
    eprintln!("{} Enter one question per line (Ctrl+D to finish)", info());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        ask_one(session, &line).await?;
    }
    Ok(())
}

/// Answer and print one question. `NoDocuments` is returned for the caller to report.
async fn ask_one(session: &QaSession, question: &str) -> Result<(), QaError> {
    let pb = spinner("Thinking...");
    let result = session.ask(question).await;
    pb.finish_and_clear();

    match result {
        Ok(answer) => print_answer(&answer),
        Err(QaError::EmptyQuestion) => eprintln!("{} {}", warn(), QaError::EmptyQuestion),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn print_answer(answer: &QaAnswer) {
    println!("\n{} {}", style("Q:").bold(), answer.question);
    if answer.failed {
        eprintln!("{} {}", error(), answer.answer);
    } else {
        println!("{} {}", style("Answer:").green().bold(), answer.answer);
    }
}
