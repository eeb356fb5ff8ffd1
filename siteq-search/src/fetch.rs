//! Page fetching with a short fixed timeout.

use std::time::Duration;

use tracing::debug;

use crate::error::FetchError;

/// Timeout applied to every page fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Some sites answer bots with an error page; a browser user agent keeps
/// the crawl honest about what readers would see.
const USER_AGENT: &str = "Mozilla/5.0";

/// Fetches a single page as HTML under a 10-second timeout.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Create a fetcher with the default timeout and user agent.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Fetch `url` and return the raw HTML body.
    ///
    /// # Errors
    ///
    /// [`FetchError::Timeout`] when the deadline passes,
    /// [`FetchError::Status`] on a non-2xx answer,
    /// [`FetchError::Transport`]/[`FetchError::Decode`] otherwise.
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        debug!(%url, "fetching page");
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Decode(e.to_string())
            }
        })
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = e.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Transport(e.to_string())
    }
}
