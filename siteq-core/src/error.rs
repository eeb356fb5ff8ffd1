//! Error types shared across the SiteQ workspace.

use thiserror::Error;

/// Errors surfaced by SiteQ components.
#[derive(Debug, Error)]
pub enum SiteqError {
    /// A text-generation backend failed.
    #[error("Model error: {0}")]
    Model(String),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience result type used across the SiteQ crates.
pub type Result<T> = std::result::Result<T, SiteqError>;
