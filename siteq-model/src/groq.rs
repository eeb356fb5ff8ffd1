//! Groq chat-completion client.
//!
//! Groq serves an OpenAI-compatible `/chat/completions` endpoint, so the
//! same client works against any compatible server via a custom base URL.
//! Requests are single-shot: no streaming, no retries. Callers treat a
//! failure as a degraded answer, not a fatal error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use siteq_core::{GenerateRequest, Llm, Result, SiteqError};

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Chat-completion client for Groq and OpenAI-compatible endpoints.
///
/// # Example
///
/// ```rust,ignore
/// let llm = GroqClient::from_env()?;
/// let answer = llm.generate(GenerateRequest::new("Say hello")).await?;
/// ```
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    /// Create a client for the Groq API with the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(SiteqError::Model("API key must not be empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: GROQ_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Create a client from the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| SiteqError::Model("GROQ_API_KEY environment variable not set".into()))?;
        Self::new(api_key)
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_completion_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
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
impl Llm for GroqClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage { role: "system", content: system });
        }
        messages.push(ChatMessage { role: "user", content: &request.prompt });

        debug!(model = %self.model, prompt_len = request.prompt.len(), "chat completion request");

        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_completion_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "chat completion request failed");
                SiteqError::Model(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ApiErrorBody>(&raw).map(|b| b.error.message).unwrap_or(raw);
            error!(%status, "chat endpoint returned an error");
            return Err(SiteqError::Model(format!("endpoint returned {status}: {detail}")));
        }

        let decoded: ChatResponse = response
            .json()
            .await
            .map_err(|e| SiteqError::Model(format!("failed to decode response: {e}")))?;

        decoded
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SiteqError::Model("endpoint returned no choices".into()))
    }
}
