//! # siteq-rag
//!
//! Retrieval primitives for site-scoped question answering: the persisted
//! [`DocumentStore`] of embedded pages, cosine [`scorer`] with its two
//! selection policies, the whole-word [`urlfilter`], and the
//! [`StoreUpdater`] that appends newly discovered pages.
//!
//! The embedding backend is opaque: anything implementing
//! [`EmbeddingProvider`] works, and the store records the provider's model
//! identifier so a query-time mismatch is caught at load instead of
//! silently producing meaningless scores.

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
#[cfg(feature = "http-embeddings")]
pub mod http;
pub mod scorer;
pub mod store;
pub mod updater;
pub mod urlfilter;

pub use config::{RetrievalConfig, RetrievalConfigBuilder};
pub use document::{PageRecord, ScoredPage};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
#[cfg(feature = "http-embeddings")]
pub use http::HttpEmbeddingProvider;
pub use scorer::{Selection, SelectionPolicy, cosine_similarity};
pub use store::DocumentStore;
pub use updater::{StoreUpdater, build_store};
pub use urlfilter::filter_by_url_terms;
