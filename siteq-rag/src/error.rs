//! Error types for the `siteq-rag` crate.

use thiserror::Error;

/// Errors that can occur in store and retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An invalid document-store operation.
    #[error("Store error: {0}")]
    Store(String),

    /// The store was built with a different embedding model than the one
    /// about to be used for queries.
    #[error("Embedding model mismatch: store was built with '{expected}', provider is '{found}'")]
    ModelMismatch {
        /// Model identifier recorded in the store.
        expected: String,
        /// Model identifier of the live provider.
        found: String,
    },

    /// A vector with the wrong dimensionality was offered to the store.
    #[error("Dimension mismatch: store holds {expected}-dimensional vectors, got {found}")]
    Dimension {
        /// The store's embedding dimension.
        expected: usize,
        /// The offending vector's length.
        found: usize,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing the persisted store failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted store could not be decoded.
    #[error("Store decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
