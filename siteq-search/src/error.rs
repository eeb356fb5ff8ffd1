//! Error types for search and page fetching.

use thiserror::Error;

/// A page fetch failure, typed so callers can tell a timeout from a bad
/// status from a transport fault.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the fetch timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),

    /// Connection, DNS, or TLS failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded as text.
    #[error("failed to decode body: {0}")]
    Decode(String),
}

/// A web-search failure.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search request itself failed.
    #[error("search request failed: {0}")]
    Request(String),

    /// The result page could not be parsed.
    #[error("failed to parse search results: {0}")]
    Parse(String),
}
