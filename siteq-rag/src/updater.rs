//! Growing and maintaining the persisted store.
//!
//! [`build_store`] is the offline bulk path: embed a whole corpus and
//! produce a fresh store. [`StoreUpdater`] is the incremental path used
//! after a successful fallback search, plus the maintenance amend path;
//! both persist the store after every successful mutation.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use crate::document::PageRecord;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::store::DocumentStore;

/// Batch-embed a corpus and build a fresh store stamped with the
/// provider's model identifier and dimension.
pub async fn build_store(
    provider: &dyn EmbeddingProvider,
    corpus: Vec<PageRecord>,
) -> Result<DocumentStore> {
    let mut store = DocumentStore::new(provider.model_id(), provider.dimensions());
    if corpus.is_empty() {
        return Ok(store);
    }
    let texts: Vec<&str> = corpus.iter().map(|r| r.content.as_str()).collect();
    let vectors = provider.embed_batch(&texts).await.map_err(|e| {
        error!(error = %e, "bulk embedding failed");
        e
    })?;
    store.append_pages(corpus, vectors)?;
    info!(records = store.len(), model = provider.model_id(), "store built");
    Ok(store)
}

/// Appends newly discovered pages to an existing store and persists it.
///
/// Callers are responsible for URL uniqueness: new pages arrive only via
/// fallback search, which itself only runs on a local miss.
pub struct StoreUpdater {
    provider: Arc<dyn EmbeddingProvider>,
    path: PathBuf,
}

impl StoreUpdater {
    /// Create an updater that embeds with `provider` and persists to `path`.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, path: impl Into<PathBuf>) -> Self {
        Self { provider, path: path.into() }
    }

    /// Where the store is persisted.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Embed `pages`, append them to `store`, and save the store.
    ///
    /// Returns the number of records appended.
    pub async fn append_pages(
        &self,
        store: &mut DocumentStore,
        pages: Vec<PageRecord>,
    ) -> Result<usize> {
        if pages.is_empty() {
            return Ok(0);
        }
        if store.embedding_model() != self.provider.model_id() {
            return Err(RagError::ModelMismatch {
                expected: store.embedding_model().to_string(),
                found: self.provider.model_id().to_string(),
            });
        }
        let texts: Vec<&str> = pages.iter().map(|r| r.content.as_str()).collect();
        let vectors = self.provider.embed_batch(&texts).await?;
        let appended = pages.len();
        store.append_pages(pages, vectors)?;
        store.save(&self.path)?;
        info!(appended, total = store.len(), "store updated");
        Ok(appended)
    }

    /// Run the maintenance amend path and persist when anything changed.
    ///
    /// Vectors are left untouched; see
    /// [`DocumentStore::amend_where_url_contains`].
    pub fn amend_content(
        &self,
        store: &mut DocumentStore,
        url_substring: &str,
        text: &str,
    ) -> Result<usize> {
        let updated = store.amend_where_url_contains(url_substring, text);
        if updated > 0 {
            store.save(&self.path)?;
        }
        info!(updated, url_substring, "amend pass finished");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic embedder: vector derived from content length.
    struct FakeProvider;

    #[async_trait]
    impl EmbeddingProvider for FakeProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn model_id(&self) -> &str {
            "fake-embedder"
        }
    }

    #[tokio::test]
    async fn build_store_embeds_whole_corpus() {
        let corpus = vec![
            PageRecord::new("https://x.com/a", "alpha"),
            PageRecord::new("https://x.com/b", "beta content"),
        ];
        let store = build_store(&FakeProvider, corpus).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.embedding_model(), "fake-embedder");
        assert_eq!(store.vectors()[0], vec![5.0, 1.0]);
    }

    #[tokio::test]
    async fn append_persists_after_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let updater = StoreUpdater::new(Arc::new(FakeProvider), &path);

        let mut store = DocumentStore::new("fake-embedder", 2);
        let appended = updater
            .append_pages(&mut store, vec![PageRecord::new("https://x.com/new", "found it")])
            .await
            .unwrap();
        assert_eq!(appended, 1);

        let reloaded = DocumentStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.record(0).unwrap().url, "https://x.com/new");
    }

    #[tokio::test]
    async fn append_rejects_foreign_store() {
        let dir = tempfile::tempdir().unwrap();
        let updater = StoreUpdater::new(Arc::new(FakeProvider), dir.path().join("s.json"));
        let mut store = DocumentStore::new("other-model", 2);
        let err = updater
            .append_pages(&mut store, vec![PageRecord::new("u", "c")])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::ModelMismatch { .. }));
    }

    #[tokio::test]
    async fn amend_saves_only_when_changed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let updater = StoreUpdater::new(Arc::new(FakeProvider), &path);

        let mut store = DocumentStore::new("fake-embedder", 2);
        updater
            .append_pages(&mut store, vec![PageRecord::new("https://x.com/leadership", "base")])
            .await
            .unwrap();

        assert_eq!(updater.amend_content(&mut store, "/leadership", "extra").unwrap(), 1);
        // Second pass is a no-op.
        assert_eq!(updater.amend_content(&mut store, "/leadership", "extra").unwrap(), 0);
        let reloaded = DocumentStore::load(&path).unwrap();
        assert_eq!(reloaded.record(0).unwrap().content.matches("extra").count(), 1);
    }
}
