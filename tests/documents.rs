//! Extraction and abbreviation indexing over real PDF bytes.

use docquery::abbreviations::{AbbreviationIndex, ArticleOutcome};
use docquery::documents::fixtures::{sample_pdf, self_parented_pdf};
use docquery::documents::{
    ContextWindow, Corpus, CorpusLayout, DocumentContent, DocumentKind, TextExtractor,
    UploadedDocument,
};
use docquery::services::index_articles;

fn pdf(pages: &[&str]) -> Vec<u8> {
    sample_pdf(pages).unwrap()
}

#[test]
fn pdf_is_recognized_without_extension() {
    let upload = UploadedDocument::new("scan", pdf(&["Hello"]));
    assert_eq!(upload.kind(), DocumentKind::Pdf);
}

#[test]
fn native_backend_extracts_pages_in_order() {
    let upload = UploadedDocument::new("report.PDF", pdf(&["First page", "Second page"]));
    let doc = TextExtractor::new().extract(&upload).unwrap();

    assert_eq!(doc.page_count(), Some(2));
    let DocumentContent::Pages(pages) = &doc.content else {
        panic!("expected pages");
    };
    assert!(pages[0].contains("First page"));
    assert!(pages[1].contains("Second page"));

    let corpus = Corpus::build(&[doc], CorpusLayout::HOSTED_QA);
    let first = corpus.text().find("First page").unwrap();
    let second = corpus.text().find("Second page").unwrap();
    assert!(first < second);
    assert!(corpus.text().ends_with("\n\n"));
}

#[test]
fn abbreviations_from_pdf_text() {
    let upload = UploadedDocument::new(
        "article.pdf",
        pdf(&[
            "Magnetic Resonance Imaging (MRI) is used widely.",
            "WHO (World Health Organization) publishes guidance.",
        ]),
    );
    let doc = TextExtractor::new().extract(&upload).unwrap();
    let text = CorpusLayout::ARTICLE.render(&doc);
    let index = AbbreviationIndex::from_text(&text);

    assert_eq!(index.get("MRI"), Some("Magnetic Resonance Imaging"));
    assert_eq!(index.get("WHO"), Some("World Health Organization"));
    assert_eq!(
        index.format(),
        "• MRI: Magnetic Resonance Imaging\n• WHO: World Health Organization"
    );
}

#[tokio::test]
async fn index_articles_numbers_every_upload() {
    let uploads = vec![
        UploadedDocument::new("one.pdf", pdf(&["Natural Language Processing (NLP)"])),
        UploadedDocument::new("two.docx", b"unsupported".to_vec()),
        UploadedDocument::new("three.txt", b"No definitions in here at all.".to_vec()),
    ];
    let reports = index_articles(&TextExtractor::new(), uploads, &ContextWindow::base_default()).await;

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].title(), "Article 1: one.pdf");
    assert_eq!(
        reports[0].abbreviations().and_then(|a| a.get("NLP")),
        Some("Natural Language Processing")
    );

    assert_eq!(reports[1].title(), "Article 2: two.docx");
    assert_eq!(reports[1].outcome, ArticleOutcome::NoText);

    assert_eq!(
        reports[2].outcome,
        ArticleOutcome::NoAbbreviations {
            excerpt: "No definitions in here at all.".to_string()
        }
    );
}

#[tokio::test]
async fn cyclic_page_tree_does_not_stop_the_batch() {
    let uploads = vec![
        UploadedDocument::new("first.txt", b"plain words".to_vec()),
        UploadedDocument::new("evil.pdf", self_parented_pdf(&["Loop (LP)"]).unwrap()),
        UploadedDocument::new("last.pdf", pdf(&["Central Processing Unit (CPU)"])),
    ];

    let batch = TextExtractor::new().extract_all_blocking(uploads.clone()).await;
    let names: Vec<_> = batch.documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["first.txt", "last.pdf"]);
    assert_eq!(batch.skipped[0].name, "evil.pdf");

    let reports = index_articles(&TextExtractor::new(), uploads, &ContextWindow::base_default()).await;
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[1].outcome, ArticleOutcome::NoText);
    assert_eq!(
        reports[2].abbreviations().and_then(|a| a.get("CPU")),
        Some("Central Processing Unit")
    );
}
