//! Corpus building: URL list in, cleaned page records out.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use siteq_rag::PageRecord;
use siteq_search::{PageFetcher, extract_text, extract_title};

use crate::error::Result;

/// Reduce page text to neat English: drop everything that is not ASCII
/// alphanumeric or whitespace, then collapse whitespace runs.
pub fn clean_text(text: &str) -> String {
    let kept: String =
        text.chars().filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace()).collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fetches every corpus URL and turns it into a [`PageRecord`].
pub struct CorpusBuilder {
    fetcher: PageFetcher,
    delay: Duration,
}

impl CorpusBuilder {
    /// Create a builder pausing `delay` between fetches.
    pub fn new(fetcher: PageFetcher, delay: Duration) -> Self {
        Self { fetcher, delay }
    }

    /// Fetch, extract, and clean every URL into a record.
    ///
    /// Failed fetches and pages with no remaining text are dropped with a
    /// warning; progress is logged per page.
    pub async fn build(&self, urls: &[String]) -> Vec<PageRecord> {
        let total = urls.len();
        let mut records = Vec::new();

        for (done, url) in urls.iter().enumerate() {
            info!(progress = format!("{}/{total}", done + 1), %url, "fetching corpus page");
            let html = match self.fetcher.fetch_html(url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(%url, error = %e, "dropping corpus page");
                    continue;
                }
            };
            let content = clean_text(&extract_text(&html));
            if content.is_empty() {
                warn!(%url, "page had no usable text");
                continue;
            }
            let mut record = PageRecord::new(url.clone(), content);
            if let Some(title) = extract_title(&html) {
                record = record.with_title(title);
            }
            records.push(record);
            tokio::time::sleep(self.delay).await;
        }

        info!(kept = records.len(), total, "corpus built");
        records
    }
}

/// Write a corpus to `path` as pretty-printed JSON.
pub fn save_corpus(records: &[PageRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, serde_json::to_string_pretty(records)?)?;
    info!(path = %path.display(), records = records.len(), "corpus saved");
    Ok(())
}

/// Load a corpus from `path`, dropping records with empty content.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<PageRecord>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let records: Vec<PageRecord> = serde_json::from_str(&raw)?;
    let total = records.len();
    let kept: Vec<PageRecord> =
        records.into_iter().filter(|r| !r.content.trim().is_empty()).collect();
    if kept.len() < total {
        info!(dropped = total - kept.len(), "dropped empty corpus records");
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_punctuation_and_collapses() {
        assert_eq!(clean_text("Founded, in 1961; by   two\tbrothers!"), "Founded in 1961 by two brothers");
    }

    #[test]
    fn corpus_round_trip_drops_empty_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let records = vec![
            PageRecord::new("https://x.com/a", "alpha").with_title("A"),
            PageRecord::new("https://x.com/empty", "   "),
        ];
        save_corpus(&records, &path).unwrap();
        let loaded = load_corpus(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].url, "https://x.com/a");
        assert_eq!(loaded[0].title.as_deref(), Some("A"));
    }
}
