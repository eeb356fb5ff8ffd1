//! The end-to-end query pipeline.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use siteq_core::Llm;
use siteq_rag::{DocumentStore, EmbeddingProvider, PageRecord, RagError, StoreUpdater};

use crate::answer::{AnswerComposer, NO_CONTENT_MESSAGE};
use crate::config::AgentConfig;
use crate::fallback::{PageFinder, summarize};
use crate::policy::{
    LocalRetrieval, Reference, RetrievalPolicy, SourceLabel, resolve_ambiguous, resolve_fallback,
    resolve_hit,
};

/// Errors that abort a single query (the session itself continues).
#[derive(Debug, Error)]
pub enum AgentError {
    /// Embedding the query or touching the store failed.
    #[error(transparent)]
    Retrieval(#[from] RagError),
}

/// A fully resolved answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentAnswer {
    /// Answer text with the reference list already appended.
    pub text: String,
    /// The references used, in context order.
    pub references: Vec<Reference>,
    /// Provenance, `None` when nothing was found anywhere.
    pub source: Option<SourceLabel>,
}

/// One query at a time: retrieve locally, fall back to web search on a
/// miss (persisting anything learned), and phrase the final answer.
pub struct SiteAgent {
    config: AgentConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn Llm>,
    finder: Arc<dyn PageFinder>,
    updater: StoreUpdater,
    policy: RetrievalPolicy,
    composer: AnswerComposer,
}

impl SiteAgent {
    /// Wire up the pipeline from its collaborators.
    pub fn new(
        config: AgentConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn Llm>,
        finder: Arc<dyn PageFinder>,
        updater: StoreUpdater,
    ) -> Self {
        let policy = RetrievalPolicy::new(config.retrieval);
        let composer =
            AnswerComposer::new(llm.clone(), config.system_prompt.clone(), config.answer_max_tokens);
        Self { config, embedder, llm, finder, updater, policy, composer }
    }

    /// Resolve one query against the store, mutating and persisting it
    /// when the fallback path learns new content.
    ///
    /// # Errors
    ///
    /// Only embedding/store failures abort the query; fallback and
    /// generation failures degrade per the error-handling design.
    pub async fn ask(
        &self,
        store: &mut DocumentStore,
        query: &str,
    ) -> Result<AgentAnswer, AgentError> {
        let query_vector = self.embedder.embed(query).await?;

        let resolved = match self.policy.evaluate(store, query, &query_vector) {
            LocalRetrieval::Hit(candidates) => {
                info!(candidates = candidates.len(), "local hit");
                resolve_hit(&candidates, self.config.max_references)
            }
            LocalRetrieval::Ambiguous(candidates) => {
                info!(candidates = candidates.len(), "local retrieval ambiguous");
                resolve_ambiguous(
                    &candidates,
                    self.config.context_doc_limit,
                    self.config.ambiguous_summary_words,
                    self.config.max_references,
                )
            }
            LocalRetrieval::Miss { max_score } => {
                info!(max_score, "local miss, invoking fallback search");
                match self.resolve_by_fallback(store, query).await {
                    Some(resolved) => resolved,
                    None => {
                        return Ok(AgentAnswer {
                            text: NO_CONTENT_MESSAGE.to_string(),
                            references: Vec::new(),
                            source: None,
                        });
                    }
                }
            }
        };

        let text = self.composer.compose(query, &resolved).await;
        Ok(AgentAnswer { text, references: resolved.references, source: Some(resolved.source) })
    }

    /// Run the fallback path: search, summarize, persist, resolve.
    ///
    /// `None` means a total miss: nothing searchable, fetchable, or
    /// summarizable.
    async fn resolve_by_fallback(
        &self,
        store: &mut DocumentStore,
        query: &str,
    ) -> Option<crate::policy::ResolvedContext> {
        let mut pages = self.finder.find_pages(query, &self.config.domain).await;
        pages.truncate(self.config.fallback_results);
        if pages.is_empty() {
            return None;
        }

        let mut summarized: Vec<(String, Option<String>, String)> = Vec::new();
        let mut new_records: Vec<PageRecord> = Vec::new();
        for page in pages {
            let Some(summary) = summarize(self.llm.as_ref(), &page.content).await else {
                continue;
            };
            let mut record = PageRecord::new(page.url.clone(), summary.clone());
            if let Some(title) = &page.title {
                record = record.with_title(title.clone());
            }
            new_records.push(record);
            summarized.push((page.url, page.title, summary));
        }
        if summarized.is_empty() {
            return None;
        }

        // Persist what the fallback learned; the answer still goes out if
        // the write fails.
        if let Err(e) = self.updater.append_pages(store, new_records).await {
            warn!(error = %e, "failed to persist fallback results");
        }

        Some(resolve_fallback(&summarized, self.config.max_references))
    }
}
