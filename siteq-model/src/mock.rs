//! Scripted fake LLM for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use siteq_core::{GenerateRequest, Llm, Result, SiteqError};

/// A fake [`Llm`] that replays scripted responses and records every
/// request it receives.
///
/// Responses are consumed front-to-back; once the script runs out, every
/// further call fails. An empty script therefore models a broken backend.
///
/// # Example
///
/// ```rust,ignore
/// let llm = MockLlm::with_responses(["first answer", "second answer"]);
/// let out = llm.generate(GenerateRequest::new("q")).await?;
/// assert_eq!(out, "first answer");
/// ```
pub struct MockLlm {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockLlm {
    /// A mock that replays `responses` in order.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A mock whose every call fails, for exercising degraded paths.
    pub fn failing() -> Self {
        Self::with_responses(Vec::<String>::new())
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().expect("mock requests lock").clone()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        "mock-llm"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String> {
        self.requests.lock().expect("mock requests lock").push(request);
        self.responses
            .lock()
            .expect("mock responses lock")
            .pop_front()
            .ok_or_else(|| SiteqError::Model("mock script exhausted".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_fails() {
        let llm = MockLlm::with_responses(["a", "b"]);
        assert_eq!(llm.generate(GenerateRequest::new("1")).await.unwrap(), "a");
        assert_eq!(llm.generate(GenerateRequest::new("2")).await.unwrap(), "b");
        assert!(llm.generate(GenerateRequest::new("3")).await.is_err());
        assert_eq!(llm.requests().len(), 3);
    }
}
