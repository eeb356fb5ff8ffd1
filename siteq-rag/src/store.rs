//! The persisted document store.
//!
//! An ordered collection of [`PageRecord`]s with an index-aligned vector
//! matrix, serialized wholesale to a single JSON file. Mutation is
//! append-only, except for the maintenance amend path which edits record
//! content in place without touching vectors. Callers persist after every
//! mutation; a single active writer is assumed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::{PageRecord, ScoredPage};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// An embedded corpus of pages, aligned index-for-index with its vectors.
///
/// Invariants, checked on load and on append:
/// - `vectors.len() == records.len()`
/// - every vector has length `dimension`
///
/// # Example
///
/// ```rust,ignore
/// let mut store = DocumentStore::new("text-embedding-3-small", 1536);
/// store.append_pages(pages, vectors)?;
/// store.save("store.json")?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentStore {
    embedding_model: String,
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    records: Vec<PageRecord>,
}

impl DocumentStore {
    /// Create an empty store bound to an embedding model and dimension.
    pub fn new(embedding_model: impl Into<String>, dimension: usize) -> Self {
        Self {
            embedding_model: embedding_model.into(),
            dimension,
            vectors: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Identifier of the embedding model the vectors were produced with.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Shared embedding dimension of every stored vector.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All stored records, in insertion order.
    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    /// The vector matrix, index-aligned with [`records`](Self::records).
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// The record at `index`, if any.
    pub fn record(&self, index: usize) -> Option<&PageRecord> {
        self.records.get(index)
    }

    /// Materialize a retrieval result from a record index and its score.
    pub fn scored_page(&self, index: usize, score: f32) -> Option<ScoredPage> {
        self.records.get(index).map(|record| ScoredPage {
            index,
            url: record.url.clone(),
            title: record.title.clone(),
            content: record.content.clone(),
            score,
        })
    }

    /// Append records with their pre-computed vectors.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Store`] when counts differ and
    /// [`RagError::Dimension`] when any vector has the wrong length; the
    /// store is unchanged on error.
    pub fn append_pages(&mut self, pages: Vec<PageRecord>, vectors: Vec<Vec<f32>>) -> Result<()> {
        if pages.len() != vectors.len() {
            return Err(RagError::Store(format!(
                "{} records offered with {} vectors",
                pages.len(),
                vectors.len()
            )));
        }
        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(RagError::Dimension { expected: self.dimension, found: vector.len() });
            }
        }
        self.records.extend(pages);
        self.vectors.extend(vectors);
        Ok(())
    }

    /// Records whose URL contains `substring`, in insertion order.
    pub fn find_by_url_substring(&self, substring: &str) -> Vec<&PageRecord> {
        self.records.iter().filter(|r| r.url.contains(substring)).collect()
    }

    /// Append `text` to the content of every record whose URL contains
    /// `substring`, skipping records that already contain the exact text.
    /// Returns the number of records changed.
    ///
    /// The stored vectors are NOT re-embedded: the amended content drifts
    /// from its vector, an accepted tradeoff for small manual corrections.
    pub fn amend_where_url_contains(&mut self, substring: &str, text: &str) -> usize {
        let text = text.trim();
        let mut updated = 0;
        for record in self.records.iter_mut().filter(|r| r.url.contains(substring)) {
            if record.content.contains(text) {
                continue;
            }
            record.content = format!("{}\n\n{text}", record.content.trim_end());
            updated += 1;
        }
        updated
    }

    /// Write the whole store to `path` as JSON, replacing any previous file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let encoded = serde_json::to_string(self)?;
        fs::write(path, encoded)?;
        info!(path = %path.display(), records = self.records.len(), "store saved");
        Ok(())
    }

    /// Load a store from `path`, checking the index-alignment invariants.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let store: DocumentStore = serde_json::from_str(&raw)?;
        if store.vectors.len() != store.records.len() {
            return Err(RagError::Store(format!(
                "corrupt store: {} vectors for {} records",
                store.vectors.len(),
                store.records.len()
            )));
        }
        if let Some(bad) = store.vectors.iter().find(|v| v.len() != store.dimension) {
            return Err(RagError::Dimension { expected: store.dimension, found: bad.len() });
        }
        info!(path = %path.display(), records = store.records.len(), "store loaded");
        Ok(store)
    }

    /// Load a store and verify it was built with `provider`'s model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ModelMismatch`] when the recorded model
    /// identifier differs from the provider's, and [`RagError::Dimension`]
    /// when the dimensions disagree.
    pub fn load_for(path: impl AsRef<Path>, provider: &dyn EmbeddingProvider) -> Result<Self> {
        let store = Self::load(path)?;
        if store.embedding_model != provider.model_id() {
            return Err(RagError::ModelMismatch {
                expected: store.embedding_model.clone(),
                found: provider.model_id().to_string(),
            });
        }
        if store.dimension != provider.dimensions() {
            return Err(RagError::Dimension {
                expected: store.dimension,
                found: provider.dimensions(),
            });
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Minimal provider standing in for a live embedder.
    struct NamedProvider {
        model: &'static str,
        dims: usize,
    }

    #[async_trait]
    impl EmbeddingProvider for NamedProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0; self.dims])
        }

        fn dimensions(&self) -> usize {
            self.dims
        }

        fn model_id(&self) -> &str {
            self.model
        }
    }

    fn sample_store() -> DocumentStore {
        let mut store = DocumentStore::new("test-model", 3);
        store
            .append_pages(
                vec![
                    PageRecord::new("https://x.com/leadership", "Founded 1961"),
                    PageRecord::new("https://x.com/history", "A long history"),
                ],
                vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
            )
            .unwrap();
        store
    }

    #[test]
    fn append_keeps_vectors_and_records_aligned() {
        let store = sample_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.vectors().len(), store.records().len());
    }

    #[test]
    fn append_rejects_mismatched_counts() {
        let mut store = DocumentStore::new("test-model", 3);
        let err = store
            .append_pages(vec![PageRecord::new("u", "c")], vec![])
            .unwrap_err();
        assert!(matches!(err, RagError::Store(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn append_rejects_wrong_dimension() {
        let mut store = DocumentStore::new("test-model", 3);
        let err = store
            .append_pages(vec![PageRecord::new("u", "c")], vec![vec![1.0, 0.0]])
            .unwrap_err();
        assert!(matches!(err, RagError::Dimension { expected: 3, found: 2 }));
    }

    #[test]
    fn amend_appends_once() {
        let mut store = sample_store();
        let first = store.amend_where_url_contains("/leadership", "Founders: A and J.");
        let second = store.amend_where_url_contains("/leadership", "Founders: A and J.");
        assert_eq!(first, 1);
        assert_eq!(second, 0);
        let content = &store.record(0).unwrap().content;
        assert_eq!(content.matches("Founders: A and J.").count(), 1);
        assert!(content.starts_with("Founded 1961"));
    }

    #[test]
    fn amend_skips_non_matching_urls() {
        let mut store = sample_store();
        assert_eq!(store.amend_where_url_contains("/careers", "text"), 0);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = sample_store();
        store.save(&path).unwrap();
        let loaded = DocumentStore::load(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn load_rejects_missing_file() {
        let err = DocumentStore::load("/nonexistent/store.json").unwrap_err();
        assert!(matches!(err, RagError::Io(_)));
    }

    #[test]
    fn load_for_accepts_the_matching_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        sample_store().save(&path).unwrap();

        let provider = NamedProvider { model: "test-model", dims: 3 };
        assert!(DocumentStore::load_for(&path, &provider).is_ok());
    }

    #[test]
    fn load_for_rejects_a_different_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        sample_store().save(&path).unwrap();

        let provider = NamedProvider { model: "other-model", dims: 3 };
        let err = DocumentStore::load_for(&path, &provider).unwrap_err();
        assert!(matches!(err, RagError::ModelMismatch { .. }));
    }

    #[test]
    fn load_for_rejects_a_different_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        sample_store().save(&path).unwrap();

        let provider = NamedProvider { model: "test-model", dims: 8 };
        let err = DocumentStore::load_for(&path, &provider).unwrap_err();
        assert!(matches!(err, RagError::Dimension { expected: 3, found: 8 }));
    }

    #[test]
    fn url_substring_lookup_preserves_order() {
        let store = sample_store();
        let hits = store.find_by_url_substring("x.com");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://x.com/leadership");
        assert!(store.find_by_url_substring("/careers").is_empty());
    }
}
