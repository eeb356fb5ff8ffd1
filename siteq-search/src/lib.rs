//! # siteq-search
//!
//! The fallback side of SiteQ: when local retrieval misses, a
//! domain-scoped web search discovers candidate pages, each page is
//! fetched under a short timeout, and its visible text extracted.
//!
//! Per-URL failures are typed ([`FetchError`]) and logged, never fatal:
//! the caller proceeds with whatever subset of fetches succeeded, and an
//! empty subset signals a total miss.

pub mod error;
pub mod extract;
pub mod fetch;
pub mod websearch;

use std::sync::Arc;

use tracing::{info, warn};

pub use error::{FetchError, SearchError};
pub use extract::{extract_text, extract_title};
pub use fetch::PageFetcher;
pub use websearch::{DuckDuckGoSearch, WebSearch};

/// A fetched-and-extracted page produced by the fallback path.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Absolute URL the page was fetched from.
    pub url: String,
    /// Page title, when the document had one.
    pub title: Option<String>,
    /// Extracted visible text.
    pub content: String,
}

/// Searches the web within a domain and fetches the results.
///
/// # Example
///
/// ```rust,ignore
/// let searcher = FallbackSearcher::new(Arc::new(DuckDuckGoSearch::new()?), PageFetcher::new()?, 2);
/// let pages = searcher.find_pages("capsule machines", "acg-world.com").await;
/// ```
pub struct FallbackSearcher {
    search: Arc<dyn WebSearch>,
    fetcher: PageFetcher,
    max_results: usize,
}

impl FallbackSearcher {
    /// Create a searcher that fetches at most `max_results` result pages.
    pub fn new(search: Arc<dyn WebSearch>, fetcher: PageFetcher, max_results: usize) -> Self {
        Self { search, fetcher, max_results }
    }

    /// Search `domain` for `query` and fetch the result pages.
    ///
    /// Every per-URL failure is logged and skipped; pages whose extracted
    /// text is empty contribute nothing. The returned list may be empty;
    /// that is the total-miss signal, not an error.
    pub async fn find_pages(&self, query: &str, domain: &str) -> Vec<FetchedPage> {
        let urls = match self.search.search(query, domain, self.max_results).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(error = %e, domain, "web search failed");
                return Vec::new();
            }
        };
        info!(found = urls.len(), domain, "web search returned result urls");

        let mut pages = Vec::new();
        for url in urls {
            let html = match self.fetcher.fetch_html(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(%url, error = %e, "skipping result page");
                    continue;
                }
            };
            let content = extract_text(&html);
            if content.is_empty() {
                warn!(%url, "result page had no visible text");
                continue;
            }
            pages.push(FetchedPage { url, title: extract_title(&html), content });
        }
        pages
    }
}
