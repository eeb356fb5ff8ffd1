//! Error types for the offline crawl stage.

use thiserror::Error;

/// Errors raised while preparing the corpus.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// A sitemap could not be read or parsed.
    #[error("Sitemap error: {0}")]
    Sitemap(String),

    /// Reading or writing a corpus file failed.
    #[error("Corpus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A corpus file could not be decoded.
    #[error("Corpus decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A convenience result type for crawl operations.
pub type Result<T> = std::result::Result<T, CrawlError>;
