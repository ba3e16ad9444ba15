//! Abbreviation indexing over a set of uploaded articles.

use crate::abbreviations::ArticleReport;
use crate::documents::{ContextWindow, TextExtractor, UploadedDocument};

/// Extract each upload and build its abbreviation report, in upload order.
///
/// Uploads that cannot be read still get a report so numbering matches the
/// upload order.
pub async fn index_articles(
    extractor: &TextExtractor,
    uploads: Vec<UploadedDocument>,
    window: &ContextWindow,
) -> Vec<ArticleReport> {
    let extractor = extractor.clone();
    let window = *window;
    let names: Vec<String> = uploads.iter().map(|u| u.name.clone()).collect();
    let task = tokio::task::spawn_blocking(move || {
        uploads
            .iter()
            .enumerate()
            .map(|(i, upload)| report_for(&extractor, i + 1, upload, &window))
            .collect()
    });

    match task.await {
        Ok(reports) => reports,
        Err(e) => {
            tracing::error!("Abbreviation task failed: {}", e);
            unreadable_reports(&names)
        }
    }
}

/// A `NoText` report for every upload, numbered in upload order.
fn unreadable_reports(names: &[String]) -> Vec<ArticleReport> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| ArticleReport::unreadable(i + 1, name))
        .collect()
}

fn report_for(
    extractor: &TextExtractor,
    number: usize,
    upload: &UploadedDocument,
    window: &ContextWindow,
) -> ArticleReport {
    match extractor.extract(upload) {
        Ok(doc) => ArticleReport::from_document(number, &doc, window),
        Err(e) => {
            tracing::warn!("Could not read {}: {}", upload.name, e);
            ArticleReport::unreadable(number, &upload.name)
        }
    }
}
