//! Agent configuration.

use siteq_core::SiteqError;
use siteq_rag::RetrievalConfig;

/// Default persona used when phrasing answers.
const DEFAULT_SYSTEM_PROMPT: &str = "You are an official representative of this website. \
Answer questions in a clear, professional, and confident tone using only the provided context. \
If the context does not cover the query in detail, instruct the user to ask a more \
topic-specific question.";

/// Everything the query pipeline needs to know up front.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Domain the fallback search is scoped to (e.g. `acg-world.com`).
    pub domain: String,
    /// How the local store is queried.
    pub retrieval: RetrievalConfig,
    /// Cap on the rendered reference list.
    pub max_references: usize,
    /// Cap on documents included in a condensed (ambiguous) context.
    pub context_doc_limit: usize,
    /// Word limit per summary inside a condensed context.
    pub ambiguous_summary_words: usize,
    /// Result pages fetched by the fallback search.
    pub fallback_results: usize,
    /// System persona handed to the generator.
    pub system_prompt: String,
    /// Token cap for generated answers.
    pub answer_max_tokens: u32,
}

impl AgentConfig {
    /// Start building a config for the given search domain.
    pub fn builder(domain: impl Into<String>) -> AgentConfigBuilder {
        AgentConfigBuilder {
            config: AgentConfig {
                domain: domain.into(),
                retrieval: RetrievalConfig::default(),
                max_references: 5,
                context_doc_limit: 5,
                ambiguous_summary_words: 50,
                fallback_results: 2,
                system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
                answer_max_tokens: 3000,
            },
        }
    }
}

/// Builder for a validated [`AgentConfig`].
#[derive(Debug, Clone)]
pub struct AgentConfigBuilder {
    config: AgentConfig,
}

impl AgentConfigBuilder {
    /// Set the retrieval configuration.
    pub fn retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.config.retrieval = retrieval;
        self
    }

    /// Cap the rendered reference list (2 and 5 are the common choices).
    pub fn max_references(mut self, max: usize) -> Self {
        self.config.max_references = max;
        self
    }

    /// Cap the documents included in a condensed context.
    pub fn context_doc_limit(mut self, limit: usize) -> Self {
        self.config.context_doc_limit = limit;
        self
    }

    /// Word limit per summary inside a condensed context.
    pub fn ambiguous_summary_words(mut self, words: usize) -> Self {
        self.config.ambiguous_summary_words = words;
        self
    }

    /// Result pages fetched by the fallback search.
    pub fn fallback_results(mut self, count: usize) -> Self {
        self.config.fallback_results = count;
        self
    }

    /// Replace the default persona.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Token cap for generated answers.
    pub fn answer_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.answer_max_tokens = max_tokens;
        self
    }

    /// Build the config, validating the caps.
    ///
    /// # Errors
    ///
    /// Returns [`SiteqError::Config`] when the domain is empty, a cap is
    /// zero, or `context_doc_limit` exceeds 5.
    pub fn build(self) -> Result<AgentConfig, SiteqError> {
        let config = self.config;
        if config.domain.trim().is_empty() {
            return Err(SiteqError::Config("domain must not be empty".into()));
        }
        if config.max_references == 0 {
            return Err(SiteqError::Config("max_references must be at least 1".into()));
        }
        if !(1..=5).contains(&config.context_doc_limit) {
            return Err(SiteqError::Config("context_doc_limit must lie in 1..=5".into()));
        }
        if config.fallback_results == 0 {
            return Err(SiteqError::Config("fallback_results must be at least 1".into()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AgentConfig::builder("acg-world.com").build().unwrap();
        assert_eq!(config.max_references, 5);
        assert_eq!(config.context_doc_limit, 5);
        assert_eq!(config.fallback_results, 2);
    }

    #[test]
    fn oversized_doc_limit_is_rejected() {
        assert!(AgentConfig::builder("x.com").context_doc_limit(6).build().is_err());
    }

    #[test]
    fn empty_domain_is_rejected() {
        assert!(AgentConfig::builder("  ").build().is_err());
    }
}
