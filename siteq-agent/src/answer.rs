//! Final answer composition.
//!
//! The composer never sees the raw user input alone: it always phrases
//! from a resolved context, and a generation failure degrades to a fixed
//! sentinel rather than aborting the query. The reference list is
//! appended deterministically after whatever the generator returned.

use std::sync::Arc;

use tracing::error;

use siteq_core::{GenerateRequest, Llm};

use crate::policy::{Reference, ResolvedContext};

/// Fixed message when neither the store nor the fallback produced content.
pub const NO_CONTENT_MESSAGE: &str = "No relevant content found.";

/// Fixed sentinel substituted when answer generation fails.
pub const ANSWER_UNAVAILABLE: &str =
    "We could not generate an answer at this time. Please try again later.";

/// Phrases answers through the generator and appends references.
pub struct AnswerComposer {
    llm: Arc<dyn Llm>,
    system_prompt: String,
    max_tokens: u32,
}

impl AnswerComposer {
    /// Create a composer with the given persona and token cap.
    pub fn new(llm: Arc<dyn Llm>, system_prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self { llm, system_prompt: system_prompt.into(), max_tokens }
    }

    /// Generate the final answer text for `query` from a resolved context.
    ///
    /// Never fails: a generator error substitutes [`ANSWER_UNAVAILABLE`]
    /// and the reference list is still appended.
    pub async fn compose(&self, query: &str, resolved: &ResolvedContext) -> String {
        let request =
            GenerateRequest::new(format!("Question: {query}\n\nContext:\n{}", resolved.context))
                .with_system(self.system_prompt.clone())
                .with_max_tokens(self.max_tokens);

        let answer = match self.llm.generate(request).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "answer generation failed, substituting sentinel");
                ANSWER_UNAVAILABLE.to_string()
            }
        };

        append_references(answer, &resolved.references)
    }
}

/// Append the numbered reference list to an answer.
///
/// Rendered as `[index. title](url)` per reference, in order; an answer
/// with no references is returned unchanged.
pub fn append_references(answer: String, references: &[Reference]) -> String {
    if references.is_empty() {
        return answer;
    }
    let list = references
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[{}. {}]({})", i + 1, r.title, r.url))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{answer}\n\n**Reference Links:**\n{list}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(n: usize) -> Vec<Reference> {
        (1..=n)
            .map(|i| Reference { title: format!("Page {i}"), url: format!("https://x.com/p{i}") })
            .collect()
    }

    #[test]
    fn reference_list_is_numbered_in_order() {
        let out = append_references("Answer.".to_string(), &refs(2));
        assert_eq!(
            out,
            "Answer.\n\n**Reference Links:**\n[1. Page 1](https://x.com/p1)\n[2. Page 2](https://x.com/p2)"
        );
    }

    #[test]
    fn no_references_leaves_answer_untouched() {
        assert_eq!(append_references("Answer.".to_string(), &[]), "Answer.");
    }
}
