//! Configuration for local retrieval.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::scorer::SelectionPolicy;

/// Parameters governing how the store is queried.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// How scored records are admitted into the candidate list.
    pub policy: SelectionPolicy,
    /// Narrow the selected candidates to records whose URL contains every
    /// query term as a whole word.
    pub narrow_by_url_terms: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            policy: SelectionPolicy::MaxGate { threshold: 0.5, top_n: 5 },
            narrow_by_url_terms: false,
        }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the selection policy.
    pub fn policy(mut self, policy: SelectionPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Enable or disable URL-term narrowing of selected candidates.
    pub fn narrow_by_url_terms(mut self, narrow: bool) -> Self {
        self.config.narrow_by_url_terms = narrow;
        self
    }

    /// Build the [`RetrievalConfig`], validating the policy parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `top_n` is zero or the threshold
    /// falls outside `[0.0, 1.0]`.
    pub fn build(self) -> Result<RetrievalConfig> {
        let (threshold, top_n) = match self.config.policy {
            SelectionPolicy::MaxGate { threshold, top_n }
            | SelectionPolicy::PerRecord { threshold, top_n } => (threshold, top_n),
        };
        if top_n == 0 {
            return Err(RagError::Config("top_n must be greater than zero".to_string()));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RagError::Config(format!(
                "similarity threshold {threshold} must lie in [0.0, 1.0]"
            )));
        }
        Ok(self.config)
    }
}
