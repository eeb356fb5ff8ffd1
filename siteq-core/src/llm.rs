//! The text-generation capability trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single-shot generation request: optional system persona plus the
/// user prompt and sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    /// Optional system message prepended to the conversation.
    pub system: Option<String>,
    /// The user prompt.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl GenerateRequest {
    /// Create a request with the given prompt and conservative defaults
    /// (temperature 0.1, 3000-token cap).
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { system: None, prompt: prompt.into(), temperature: 0.1, max_tokens: 3000 }
    }

    /// Set the system message.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the generated-token cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A text-generation backend (prompt in, text out).
///
/// Implementations wrap a concrete chat API; callers never retry through
/// this trait and treat any error as a degraded-but-answered query.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Identifier of the underlying model, for logging.
    fn name(&self) -> &str;

    /// Generate a completion for the request.
    async fn generate(&self, request: GenerateRequest) -> Result<String>;
}
