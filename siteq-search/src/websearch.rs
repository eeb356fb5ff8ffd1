//! Domain-scoped web search.
//!
//! The production backend scrapes DuckDuckGo's HTML endpoint (no API key
//! required) and restricts results with a `site:` operator. Only absolute
//! HTTP(S) result URLs are kept.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::SearchError;

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A web-search backend returning result URLs for a domain-scoped query.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Search `domain` for `query`, returning at most `count` absolute
    /// HTTP(S) result URLs.
    async fn search(
        &self,
        query: &str,
        domain: &str,
        count: usize,
    ) -> Result<Vec<String>, SearchError>;
}

/// [`WebSearch`] backed by DuckDuckGo's keyless HTML endpoint.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    /// Create a search client with the default timeout.
    pub fn new() -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(SEARCH_TIMEOUT)
            .build()
            .map_err(|e| SearchError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        domain: &str,
        count: usize,
    ) -> Result<Vec<String>, SearchError> {
        let scoped = format!("site:{domain} {query}");
        let endpoint = format!("{DDG_HTML_URL}?q={}", urlencoding::encode(&scoped));
        debug!(query = %scoped, "issuing web search");

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Request(format!("search endpoint returned {status}")));
        }
        let html = response.text().await.map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(parse_result_urls(&html, count))
    }
}

/// Pull result-link URLs out of a DuckDuckGo HTML result page.
///
/// Redirect links (`//duckduckgo.com/l/?uddg=...`) are unwrapped to their
/// target; anything that is not an absolute HTTP(S) URL is dropped.
fn parse_result_urls(html: &str, count: usize) -> Vec<String> {
    let Ok(selector) = Selector::parse("a.result__a") else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);
    doc.select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(resolve_result_href)
        .take(count)
        .collect()
}

/// Normalize one result href to an absolute HTTP(S) URL, or drop it.
fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") { format!("https:{href}") } else { href.to_string() };
    let parsed = Url::parse(&absolute).ok()?;

    // DuckDuckGo wraps results in a redirect carrying the target in `uddg`.
    if parsed.domain().is_some_and(|d| d.ends_with("duckduckgo.com")) {
        let target = parsed.query_pairs().find(|(k, _)| k == "uddg").map(|(_, v)| v.into_owned())?;
        let target_url = Url::parse(&target).ok()?;
        return matches!(target_url.scheme(), "http" | "https").then_some(target);
    }

    matches!(parsed.scheme(), "http" | "https").then_some(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"<html><body>
        <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Facg-world.com%2Fcapsules&rut=abc">Capsules</a>
        <a class="result__a" href="https://acg-world.com/machines">Machines</a>
        <a class="result__a" href="ftp://acg-world.com/archive">Archive</a>
        <a class="result__a" href="/relative/path">Relative</a>
        <a class="other" href="https://elsewhere.com/ignored">Ignored</a>
    </body></html>"#;

    #[test]
    fn unwraps_redirects_and_keeps_absolute_http_only() {
        let urls = parse_result_urls(RESULTS, 10);
        assert_eq!(
            urls,
            vec![
                "https://acg-world.com/capsules".to_string(),
                "https://acg-world.com/machines".to_string(),
            ]
        );
    }

    #[test]
    fn result_count_is_capped() {
        assert_eq!(parse_result_urls(RESULTS, 1).len(), 1);
    }

    #[test]
    fn no_results_yields_empty_list() {
        assert!(parse_result_urls("<html><body>nothing here</body></html>", 5).is_empty());
    }
}
