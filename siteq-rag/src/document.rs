//! Data types for stored pages and retrieval results.

use serde::{Deserialize, Serialize};

/// One crawled page: URL, optional title, and cleaned text content.
///
/// The URL acts as the record's key by convention; uniqueness is the
/// caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageRecord {
    /// Canonical URL of the page.
    pub url: String,
    /// Page title, when the source document had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Cleaned visible text of the page.
    pub content: String,
}

impl PageRecord {
    /// Create a record without a title.
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self { url: url.into(), title: None, content: content.into() }
    }

    /// Attach a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title when present, otherwise the URL.
    pub fn title_or_url(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }
}

/// A retrieved page paired with its similarity score.
///
/// Ephemeral: ranked, handed to the context builder, never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredPage {
    /// Index of the record inside the store at scoring time.
    pub index: usize,
    /// URL of the matching record.
    pub url: String,
    /// Title of the matching record, when present.
    pub title: Option<String>,
    /// Full content of the matching record.
    pub content: String,
    /// Cosine similarity against the query vector.
    pub score: f32,
}

impl ScoredPage {
    /// Title when present, otherwise the URL.
    pub fn title_or_url(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }
}
