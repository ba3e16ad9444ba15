//! Prompt templates for document question answering.

/// Prompt sent to the local model. `{context}` and `{question}` are substituted.
pub const LOCAL_QA_PROMPT: &str = "You are an AI assistant. Use the following context to answer the question.
    
Context:
{context}

Question: {question}

Answer based on the context:";

/// Prompt sent to the hosted model.
pub const HOSTED_QA_PROMPT: &str = "Context: {context}\n\nQuestion: {question}\n\nAnswer:";

/// Fill a template with the context window and the question.
///
/// The question is substituted last so that braces inside the context are never
/// treated as placeholders.
pub fn render(template: &str, question: &str, context: &str) -> String {
    let (head, tail) = match template.split_once("{context}") {
        Some(parts) => parts,
        None => return template.replace("{question}", question),
    };
    format!(
        "{}{}{}",
        head.replace("{question}", question),
        context,
        tail.replace("{question}", question)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_prompt_layout() {
        let prompt = render(LOCAL_QA_PROMPT, "Who wrote it?", "Alice wrote the report.");
        assert_eq!(
            prompt,
            "You are an AI assistant. Use the following context to answer the question.\n    \n\
             Context:\nAlice wrote the report.\n\nQuestion: Who wrote it?\n\nAnswer based on the context:"
        );
    }

    #[test]
    fn test_hosted_prompt_layout() {
        let prompt = render(HOSTED_QA_PROMPT, "What year?", "It was 1999.");
        assert_eq!(prompt, "Context: It was 1999.\n\nQuestion: What year?\n\nAnswer:");
    }

    #[test]
    fn test_placeholders_in_context_are_literal() {
        let prompt = render(HOSTED_QA_PROMPT, "q", "literal {question} text");
        assert_eq!(prompt, "Context: literal {question} text\n\nQuestion: q\n\nAnswer:");
    }

    #[test]
    fn test_empty_context() {
        let prompt = render(HOSTED_QA_PROMPT, "Anything?", "");
        assert_eq!(prompt, "Context: \n\nQuestion: Anything?\n\nAnswer:");
    }
}
