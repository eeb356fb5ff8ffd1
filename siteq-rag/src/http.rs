//! HTTP-backed embedding provider for OpenAI-compatible `/embeddings`
//! endpoints.
//!
//! Only available when the `http-embeddings` feature is enabled. Works
//! against api.openai.com as well as any compatible server reachable at a
//! custom base URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_DIMENSIONS: usize = 1536;

/// An [`EmbeddingProvider`] that POSTs to `{base_url}/embeddings`.
///
/// # Example
///
/// ```rust,ignore
/// let provider = HttpEmbeddingProvider::openai(api_key)?;
/// let vector = provider.embed("hello world").await?;
/// assert_eq!(vector.len(), provider.dimensions());
/// ```
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl HttpEmbeddingProvider {
    /// Create a provider against an arbitrary OpenAI-compatible endpoint.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Embedding {
                provider: "http".into(),
                message: "API key must not be empty".into(),
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            dimensions,
        })
    }

    /// Create a provider against api.openai.com with the default model.
    pub fn openai(api_key: impl Into<String>) -> Result<Self> {
        Self::new(OPENAI_BASE_URL, api_key, DEFAULT_MODEL, DEFAULT_DIMENSIONS)
    }

    /// Create a provider from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| RagError::Embedding {
            provider: "http".into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
        })?;
        Self::openai(api_key)
    }

    /// Override the model and its output dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        if vectors.is_empty() {
            return Err(RagError::Embedding {
                provider: "http".into(),
                message: "endpoint returned no embeddings".into(),
            });
        }
        Ok(vectors.swap_remove(0))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(model = %self.model, batch_size = texts.len(), "embedding batch");

        let body = EmbeddingsRequest { model: &self.model, input: texts.to_vec() };
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "embeddings request failed");
                RagError::Embedding { provider: "http".into(), message: format!("request failed: {e}") }
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ApiErrorBody>(&raw).map(|b| b.error.message).unwrap_or(raw);
            error!(%status, "embeddings endpoint returned an error");
            return Err(RagError::Embedding {
                provider: "http".into(),
                message: format!("endpoint returned {status}: {detail}"),
            });
        }

        let decoded: EmbeddingsResponse = response.json().await.map_err(|e| {
            RagError::Embedding {
                provider: "http".into(),
                message: format!("failed to decode response: {e}"),
            }
        })?;

        Ok(decoded.data.into_iter().map(|row| row.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
