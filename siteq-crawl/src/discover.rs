//! Same-domain link discovery.
//!
//! A plain breadth-first walk from the sitemap seeds: fetch a page, pull
//! its anchors, keep absolute same-domain HTML links, and stop at the
//! page cap. Used to find pages the published sitemap misses.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use siteq_search::PageFetcher;

/// File extensions that never lead to indexable page text.
const SKIP_EXTENSIONS: &[&str] = &[".pdf", ".jpg", ".jpeg", ".png", ".gif", ".zip", ".svg"];

/// Limits for a discovery run.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryConfig {
    /// Stop once this many URLs are known.
    pub max_pages: usize,
    /// Pause between page fetches, to stay polite.
    pub delay: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { max_pages: 1000, delay: Duration::from_secs(1) }
    }
}

/// Breadth-first, same-domain URL discovery.
pub struct LinkDiscoverer {
    fetcher: PageFetcher,
    config: DiscoveryConfig,
}

impl LinkDiscoverer {
    /// Create a discoverer fetching through `fetcher`.
    pub fn new(fetcher: PageFetcher, config: DiscoveryConfig) -> Self {
        Self { fetcher, config }
    }

    /// Walk outward from `seeds`, returning every discovered same-domain
    /// URL (seeds included), capped at `max_pages`.
    ///
    /// Fetch failures are logged and skipped; discovery never fails as a
    /// whole.
    pub async fn discover(&self, seeds: &[String], domain: &str) -> Vec<String> {
        let mut discovered: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();

        for seed in seeds {
            if is_crawlable(seed, domain) && seen.insert(seed.clone()) {
                discovered.push(seed.clone());
                queue.push_back(seed.clone());
            }
        }

        while let Some(current) = queue.pop_front() {
            if discovered.len() >= self.config.max_pages {
                break;
            }
            debug!(url = %current, total = discovered.len(), "crawling");
            let html = match self.fetcher.fetch_html(&current).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(url = %current, error = %e, "skipping page");
                    continue;
                }
            };

            for link in extract_links(&html, &current) {
                if discovered.len() >= self.config.max_pages {
                    break;
                }
                if is_crawlable(&link, domain) && seen.insert(link.clone()) {
                    discovered.push(link.clone());
                    queue.push_back(link);
                }
            }

            tokio::time::sleep(self.config.delay).await;
        }

        info!(domain, discovered = discovered.len(), "link discovery finished");
        discovered
    }
}

/// Absolute anchor targets of a page, resolved against its URL.
fn extract_links(html: &str, base: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base) else {
        return Vec::new();
    };
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);
    doc.select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|mut url| {
            // Fragments alias the same document.
            url.set_fragment(None);
            url.to_string()
        })
        .collect()
}

/// True for absolute HTTP(S) URLs on `domain` that look like HTML pages.
fn is_crawlable(url: &str, domain: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let on_domain = parsed
        .host_str()
        .is_some_and(|host| host == domain || host.ends_with(&format!(".{domain}")));
    if !on_domain {
        return false;
    }
    let lowered = url.to_lowercase();
    !SKIP_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawlable_requires_same_domain_http() {
        assert!(is_crawlable("https://acg-world.com/products", "acg-world.com"));
        assert!(is_crawlable("https://www.acg-world.com/products", "acg-world.com"));
        assert!(!is_crawlable("https://elsewhere.com/products", "acg-world.com"));
        assert!(!is_crawlable("ftp://acg-world.com/products", "acg-world.com"));
        assert!(!is_crawlable("not a url", "acg-world.com"));
    }

    #[test]
    fn binary_extensions_are_skipped() {
        assert!(!is_crawlable("https://acg-world.com/brochure.pdf", "acg-world.com"));
        assert!(!is_crawlable("https://acg-world.com/logo.PNG", "acg-world.com"));
    }

    #[test]
    fn links_resolve_against_base_and_drop_fragments() {
        let html = r#"<a href="/about#team">About</a> <a href="https://x.com/full">Full</a>"#;
        let links = extract_links(html, "https://acg-world.com/home");
        assert_eq!(
            links,
            vec!["https://acg-world.com/about".to_string(), "https://x.com/full".to_string()]
        );
    }
}
