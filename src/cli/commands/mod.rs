//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod abbreviations;
mod ask;
mod config_cmd;
mod extract;
mod models;
mod serve;
mod tools;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::documents::PdfBackend;

use ask::AskArgs;
use extract::LayoutChoice;

#[derive(Parser)]
#[command(name = "docq")]
#[command(about = "Ask questions about documents and index their abbreviations")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// PDF text backend (overrides config)
    #[arg(long, global = true, value_enum)]
    pdf_backend: Option<PdfBackend>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Ask questions about documents (reads questions from stdin when none is given)
    Ask(AskArgs),

    /// Find abbreviations defined in each document
    Abbreviations {
        /// PDF or text files, one article each
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the local LLM configuration and installed models
    Models,

    /// Print the text that would be sent as context
    Extract {
        /// PDF or text files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Concatenation layout
        #[arg(short, long, value_enum, default_value = "local")]
        layout: LayoutChoice,
        /// Print only the context preview
        #[arg(long)]
        preview: bool,
    },

    /// Check if the Poppler tools used by the pdftotext backend are installed
    CheckTools,

    /// Start the web interface
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default from config: 127.0.0.1:8501)
        bind: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration (API key redacted)
    Show,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).await;
    if let Some(backend) = cli.pdf_backend {
        config.extraction.pdf_backend = backend;
    }

    match cli.command {
        Commands::Ask(args) => ask::cmd_ask(&config, args).await,
        Commands::Abbreviations { files, json } => {
            abbreviations::cmd_abbreviations(&config, &files, json).await
        }
        Commands::Models => models::cmd_models(&config).await,
        Commands::Extract {
            files,
            layout,
            preview,
        } => extract::cmd_extract(&config, &files, layout, preview).await,
        Commands::CheckTools => tools::cmd_check_tools(),
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            serve::cmd_serve(config, &bind).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
        },
    }
}
