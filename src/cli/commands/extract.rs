//! Context extraction command.

use std::path::PathBuf;

use crate::cli::helpers::{read_uploads, report_skipped, spinner};
use crate::config::Config;
use crate::documents::{Corpus, CorpusLayout, TextExtractor};

/// How extracted documents are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LayoutChoice {
    /// Layout used with a local model
    Local,
    /// Layout used with a hosted model
    Hosted,
    /// Layout used for abbreviation indexing (one document)
    Article,
}

impl LayoutChoice {
    fn layout(self) -> CorpusLayout {
        match self {
            Self::Local => CorpusLayout::LOCAL_QA,
            Self::Hosted => CorpusLayout::HOSTED_QA,
            Self::Article => CorpusLayout::ARTICLE,
        }
    }
}

/// Print the assembled corpus, or its preview.
pub async fn cmd_extract(
    config: &Config,
    files: &[PathBuf],
    layout: LayoutChoice,
    preview: bool,
) -> anyhow::Result<()> {
    let uploads = read_uploads(files).await?;
    let extractor = TextExtractor::new().with_backend(config.extraction.pdf_backend);

    let pb = spinner(format!("Reading {} document(s)...", uploads.len()));
    let batch = extractor.extract_all_blocking(uploads).await;
    pb.finish_and_clear();
    report_skipped(&batch);

    let corpus = Corpus::build(&batch.documents, layout.layout());
    if preview {
        println!("{}", config.context.preview(corpus.text()));
    } else {
        print!("{}", corpus.text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_choice() {
        assert_eq!(LayoutChoice::Local.layout(), CorpusLayout::LOCAL_QA);
        assert_eq!(LayoutChoice::Hosted.layout(), CorpusLayout::HOSTED_QA);
        assert_eq!(LayoutChoice::Article.layout(), CorpusLayout::ARTICLE);
    }
}
