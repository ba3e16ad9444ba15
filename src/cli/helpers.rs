//! Shared helper functions for CLI commands.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::expand_path;
use crate::documents::{ExtractionBatch, UploadedDocument};

use super::icons;

/// Start a spinner with a message; call `finish_and_clear` when done.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.into());
    pb
}

/// Read every file into memory, in argument order.
pub async fn read_uploads(paths: &[PathBuf]) -> anyhow::Result<Vec<UploadedDocument>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        let path = expand_path(path);
        let upload = UploadedDocument::from_path(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        uploads.push(upload);
    }
    Ok(uploads)
}

/// Print one warning line per document that produced no text.
pub fn report_skipped(batch: &ExtractionBatch) {
    for skipped in &batch.skipped {
        eprintln!("{} Skipped {}: {}", icons::warn(), skipped.name, skipped.reason);
    }
}
