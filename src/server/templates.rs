//! HTML templates for the web interface.

use crate::abbreviations::{ArticleOutcome, ArticleReport};
use crate::documents::SkippedDocument;
use crate::services::QaAnswer;
use crate::utils::{html_escape, html_paragraphs};

/// Base HTML template.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - docquery</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header>
        <nav>
            <a href="/">docquery</a>
            <a href="/#local">Local Q&amp;A</a>
            <a href="/#hosted">Hosted Q&amp;A</a>
            <a href="/#abbreviations">Abbreviations</a>
        </nav>
    </header>
    <main>
{}
    </main>
</body>
</html>"#,
        html_escape(title),
        content
    )
}

fn notice(kind: &str, message: &str) -> String {
    format!(
        r#"<div class="notice {}">{}</div>"#,
        kind,
        html_escape(message)
    )
}

/// Home page with the question and abbreviation forms.
pub fn index_page(hosted_name: &str, hosted_key_configured: bool) -> String {
    let key_hint = if hosted_key_configured {
        "A key is configured on the server; leave blank to use it."
    } else {
        "Required unless the server has a key configured."
    };

    let content = format!(
        r#"<section id="local">
    <h2>Ask a local model</h2>
    <p class="muted">Answers come from a model served by Ollama on the server.</p>
    <form action="/ask" method="post" enctype="multipart/form-data">
        <input type="hidden" name="provider" value="local">
        <label for="local-files">Documents (PDF or text)</label>
        <input id="local-files" type="file" name="files" accept=".pdf,.txt" multiple>
        <label for="local-model">Model</label>
        <input id="local-model" type="text" name="model" list="local-models" placeholder="first installed model">
        <datalist id="local-models"></datalist>
        <label for="local-question">Question</label>
        <input id="local-question" type="text" name="question" placeholder="Ask a question about your documents">
        <button type="submit">Ask</button>
    </form>
</section>
<section id="hosted">
    <h2>Ask {name}</h2>
    <p class="muted">Answers come from the hosted {name} API.</p>
    <form action="/ask" method="post" enctype="multipart/form-data">
        <input type="hidden" name="provider" value="hosted">
        <label for="hosted-key">{name} API key</label>
        <input id="hosted-key" type="password" name="api_key" autocomplete="off">
        <p class="muted">{key_hint}</p>
        <label for="hosted-files">Documents (PDF or text)</label>
        <input id="hosted-files" type="file" name="files" accept=".pdf,.txt" multiple>
        <label for="hosted-question">Question</label>
        <input id="hosted-question" type="text" name="question" placeholder="Ask anything about your documents">
        <button type="submit">Ask</button>
    </form>
</section>
<section id="abbreviations">
    <h2>Abbreviation index</h2>
    <p class="muted">One index per uploaded article.</p>
    <form action="/abbreviations" method="post" enctype="multipart/form-data">
        <label for="article-files">Articles (PDF)</label>
        <input id="article-files" type="file" name="files" accept=".pdf,.txt" multiple>
        <button type="submit">Generate</button>
    </form>
</section>
<script>
fetch("/api/models").then(r => r.json()).then(models => {{
    const list = document.getElementById("local-models");
    for (const name of models) {{
        const option = document.createElement("option");
        option.value = name;
        list.appendChild(option);
    }}
}}).catch(() => {{}});
</script>"#,
        name = html_escape(hosted_name),
        key_hint = key_hint,
    );

    base_template("Home", &content)
}

/// Answer to a single question.
pub fn answer_page(answer: &QaAnswer, documents: usize, skipped: &[SkippedDocument]) -> String {
    let mut content = String::new();

    if documents > 0 {
        content.push_str(&notice(
            "success",
            &format!("Loaded {} document(s)", documents),
        ));
    }
    for doc in skipped {
        content.push_str(&notice(
            "warning",
            &format!("Skipped {}: {}", doc.name, doc.reason),
        ));
    }

    content.push_str(&format!(
        r#"<section>
    <h2>Question</h2>
    <p>{}</p>
    <p class="muted">{} ({})</p>
"#,
        html_escape(&answer.question),
        html_escape(&answer.provider),
        html_escape(&answer.model),
    ));

    if answer.failed {
        content.push_str(&notice("error", &answer.answer));
    } else {
        content.push_str(&format!(
            "    <h2>Answer:</h2>\n    <div class=\"answer\">{}</div>\n",
            html_paragraphs(&answer.answer)
        ));
    }

    content.push_str(&format!(
        r#"    <details>
        <summary>Document content preview</summary>
        <pre>{}</pre>
    </details>
</section>
<p><a href="/">Ask another question</a></p>"#,
        html_escape(&answer.context_preview)
    ));

    base_template("Answer", &content)
}

/// One section per article.
pub fn abbreviations_page(reports: &[ArticleReport]) -> String {
    let mut content = String::from("<h1>Abbreviation Index</h1>\n");

    if reports.is_empty() {
        content.push_str(&notice("info", "Upload articles to build an index"));
    }

    for report in reports {
        content.push_str(&format!(
            "<section>\n    <h2>{}</h2>\n",
            html_escape(&report.title())
        ));
        match &report.outcome {
            ArticleOutcome::NoText => {
                content.push_str(&notice("warning", &report.summary()));
            }
            ArticleOutcome::NoAbbreviations { excerpt } => {
                content.push_str(&notice("warning", &report.summary()));
                content.push_str(&format!(
                    "    <details open>\n        <summary>Text preview</summary>\n        <pre>{}</pre>\n    </details>\n",
                    html_escape(excerpt)
                ));
            }
            ArticleOutcome::Found { abbreviations } => {
                content.push_str(&notice("success", &report.summary()));
                content.push_str("    <ul class=\"abbreviations\">\n");
                for entry in abbreviations.iter() {
                    content.push_str(&format!(
                        "        <li>• <strong>{}</strong>: {}</li>\n",
                        html_escape(&entry.abbreviation),
                        html_escape(&entry.expansion)
                    ));
                }
                content.push_str("    </ul>\n");
            }
        }
        content.push_str("</section>\n");
    }

    content.push_str(r#"<p><a href="/#abbreviations">Index more articles</a></p>"#);
    base_template("Abbreviations", &content)
}

/// Error page with an optional hint below the message.
pub fn error_page(message: &str, hint: Option<&str>) -> String {
    let mut content = notice("error", message);
    if let Some(hint) = hint {
        content.push_str(&notice("info", hint));
    }
    content.push_str(r#"<p><a href="/">Back</a></p>"#);
    base_template("Error", &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::ContextWindow;

    fn answer(text: &str, failed: bool) -> QaAnswer {
        QaAnswer {
            question: "What is <b>?".to_string(),
            answer: text.to_string(),
            failed,
            provider: "Ollama".to_string(),
            model: "llama2".to_string(),
            context_preview: "Context & more...".to_string(),
        }
    }

    #[test]
    fn test_answer_page_escapes() {
        let html = answer_page(&answer("Use <code>", false), 2, &[]);
        assert!(html.contains("What is &lt;b&gt;?"));
        assert!(html.contains("<p>Use &lt;code&gt;</p>"));
        assert!(html.contains("Context &amp; more..."));
        assert!(html.contains("Loaded 2 document(s)"));
    }

    #[test]
    fn test_failed_answer_is_error_notice() {
        let html = answer_page(&answer("API Error: 401", true), 0, &[]);
        assert!(html.contains(r#"<div class="notice error">API Error: 401</div>"#));
        assert!(!html.contains("Answer:</h2>"));
    }

    #[test]
    fn test_abbreviations_page() {
        let window = ContextWindow::base_default();
        let reports = vec![
            ArticleReport::build(1, "a.pdf", "Central Processing Unit (CPU)", &window),
            ArticleReport::build(2, "b.pdf", "", &window),
        ];
        let html = abbreviations_page(&reports);
        assert!(html.contains("Article 1: a.pdf"));
        assert!(html.contains("<strong>CPU</strong>: Central Processing Unit"));
        assert!(html.contains("No text extracted from b.pdf"));
    }

    #[test]
    fn test_error_page_hint() {
        let html = error_page("Please enter Groq API key", Some("Get free key"));
        assert!(html.contains("Please enter Groq API key"));
        assert!(html.contains(r#"<div class="notice info">Get free key</div>"#));
    }
}
