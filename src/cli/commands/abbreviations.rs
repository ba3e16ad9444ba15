//! Abbreviation index command.

use std::path::PathBuf;

use console::style;

use crate::abbreviations::{ArticleOutcome, ArticleReport};
use crate::cli::helpers::{read_uploads, spinner};
use crate::cli::icons::{success, warn};
use crate::config::Config;
use crate::documents::TextExtractor;
use crate::services::index_articles;

/// Build an abbreviation index for each file.
pub async fn cmd_abbreviations(
    config: &Config,
    files: &[PathBuf],
    json: bool,
) -> anyhow::Result<()> {
    let uploads = read_uploads(files).await?;
    let extractor = TextExtractor::new().with_backend(config.extraction.pdf_backend);

    let pb = spinner(format!("Indexing {} article(s)...", uploads.len()));
    let reports = index_articles(&extractor, uploads, &config.context).await;
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &ArticleReport) {
    println!("\n{}", style(report.title()).bold());
    println!("{}", "-".repeat(40));
    match &report.outcome {
        ArticleOutcome::NoText => println!("{} {}", warn(), report.summary()),
        ArticleOutcome::NoAbbreviations { excerpt } => {
            println!("{} {}", warn(), report.summary());
            println!("\n{}", style("Text preview:").dim());
            println!("{}", excerpt);
        }
        ArticleOutcome::Found { abbreviations } => {
            println!("{} {}", success(), report.summary());
            println!("{}", abbreviations.format());
        }
    }
}
