//! Fallback page discovery and summarization.

use async_trait::async_trait;
use tracing::{debug, warn};

use siteq_core::{GenerateRequest, Llm};
use siteq_search::{FallbackSearcher, FetchedPage};

/// Token cap for fallback summaries; they feed straight into the store.
const SUMMARY_MAX_TOKENS: u32 = 3000;

/// Minimum length of a usable summary.
const MIN_SUMMARY_LEN: usize = 20;

/// The fallback page source: domain-scoped search plus fetch-and-extract.
///
/// An injected capability so the whole query pipeline runs on fakes in
/// tests; production uses [`FallbackSearcher`].
#[async_trait]
pub trait PageFinder: Send + Sync {
    /// Discover and fetch pages for `query` within `domain`.
    ///
    /// An empty result is the total-miss signal, never an error.
    async fn find_pages(&self, query: &str, domain: &str) -> Vec<FetchedPage>;
}

#[async_trait]
impl PageFinder for FallbackSearcher {
    async fn find_pages(&self, query: &str, domain: &str) -> Vec<FetchedPage> {
        FallbackSearcher::find_pages(self, query, domain).await
    }
}

/// Summarize fetched page text through the generator.
///
/// Returns `None` on generation failure or when the summary is unusable
/// (shorter than 20 characters or containing no letters); callers drop
/// the page rather than store it.
pub(crate) async fn summarize(llm: &dyn Llm, text: &str) -> Option<String> {
    let request = GenerateRequest::new(format!(
        "Please summarize the following content concisely:\n\n{text}"
    ))
    .with_max_tokens(SUMMARY_MAX_TOKENS);

    let summary = match llm.generate(request).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(error = %e, "summarization failed");
            return None;
        }
    };

    let summary = summary.trim();
    if summary.len() < MIN_SUMMARY_LEN || !summary.chars().any(|c| c.is_ascii_alphabetic()) {
        debug!(len = summary.len(), "rejecting unusable summary");
        return None;
    }
    Some(summary.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteq_model::MockLlm;

    #[tokio::test]
    async fn valid_summary_passes() {
        let llm = MockLlm::with_responses(["  A concise summary of the page.  "]);
        let summary = summarize(&llm, "long page text").await;
        assert_eq!(summary.as_deref(), Some("A concise summary of the page."));
    }

    #[tokio::test]
    async fn short_or_letterless_summaries_are_rejected() {
        let llm = MockLlm::with_responses(["ok", "1234567890 1234567890 99"]);
        assert_eq!(summarize(&llm, "text").await, None);
        assert_eq!(summarize(&llm, "text").await, None);
    }

    #[tokio::test]
    async fn generation_failure_yields_none() {
        let llm = MockLlm::failing();
        assert_eq!(summarize(&llm, "text").await, None);
    }
}
