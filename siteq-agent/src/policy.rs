//! The retrieval policy state machine.
//!
//! `START → {LOCAL_HIT, LOCAL_AMBIGUOUS, LOCAL_MISS} → RESOLVED`
//!
//! Local retrieval classifies a query against the store; resolution then
//! turns candidates into a context string plus an ordered, capped
//! reference list. Up to [`AMBIGUITY_CUTOFF`] candidates contribute their
//! full content; beyond it the context is condensed to titles, URLs, and
//! short summaries, plus an explicit nudge toward a more specific
//! question.

use tracing::{debug, info};

use siteq_rag::{DocumentStore, RetrievalConfig, ScoredPage, Selection};
use siteq_rag::{filter_by_url_terms, scorer};

use crate::summary::first_words;

/// Candidate counts at or below this resolve as a hit with full content.
pub const AMBIGUITY_CUTOFF: usize = 2;

/// Sentence appended to every condensed context.
pub const SPECIFICITY_HINT: &str = "For more details, please ask a more topic-specific question.";

/// Where the resolved context came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLabel {
    /// Local vector store.
    Retrieved,
    /// Live fallback web search.
    Searched,
}

/// One entry of the rendered reference list.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Display title (the URL when the page had no title).
    pub title: String,
    /// Target URL.
    pub url: String,
}

/// A context string with its ordered reference list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    /// Text handed to the answer generator.
    pub context: String,
    /// References, in context order, already capped.
    pub references: Vec<Reference>,
    /// Provenance of the context.
    pub source: SourceLabel,
}

/// Outcome of local retrieval, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalRetrieval {
    /// Few enough candidates to use verbatim.
    Hit(Vec<ScoredPage>),
    /// Too many candidates; the context must be condensed.
    Ambiguous(Vec<ScoredPage>),
    /// Nothing usable locally; fall back to web search.
    Miss {
        /// Best similarity observed, for logging.
        max_score: f32,
    },
}

/// Classifies queries against the document store.
#[derive(Debug, Clone)]
pub struct RetrievalPolicy {
    config: RetrievalConfig,
}

impl RetrievalPolicy {
    /// Create a policy from a retrieval configuration.
    pub fn new(config: RetrievalConfig) -> Self {
        Self { config }
    }

    /// Score the store against the query vector and classify the result.
    ///
    /// The query text itself is only consulted when URL-term narrowing is
    /// enabled.
    pub fn evaluate(
        &self,
        store: &DocumentStore,
        query: &str,
        query_vector: &[f32],
    ) -> LocalRetrieval {
        let scores = scorer::score_all(query_vector, store.vectors());
        let selected = match self.config.policy.select(&scores) {
            Selection::NoMatch { max_score } => {
                info!(max_score, "local retrieval gated off");
                return LocalRetrieval::Miss { max_score };
            }
            Selection::Matches(matches) => matches,
        };

        let max_score = selected.first().map(|m| m.score).unwrap_or(0.0);
        let candidates: Vec<ScoredPage> = selected
            .into_iter()
            .filter_map(|m| store.scored_page(m.index, m.score))
            .collect();

        let candidates = if self.config.narrow_by_url_terms {
            filter_by_url_terms(candidates, query)
        } else {
            candidates
        };

        debug!(candidates = candidates.len(), max_score, "local retrieval classified");
        match candidates.len() {
            0 => LocalRetrieval::Miss { max_score },
            n if n <= AMBIGUITY_CUTOFF => LocalRetrieval::Hit(candidates),
            _ => LocalRetrieval::Ambiguous(candidates),
        }
    }
}

/// Resolve a hit: every candidate contributes its full content.
pub fn resolve_hit(candidates: &[ScoredPage], max_references: usize) -> ResolvedContext {
    let mut context = String::new();
    let mut references = Vec::new();
    for candidate in candidates {
        context.push_str(&format!(
            "Title: {}\nURL: {}\nContent: {}\n\n",
            candidate.title_or_url(),
            candidate.url,
            candidate.content
        ));
        references.push(Reference {
            title: candidate.title_or_url().to_string(),
            url: candidate.url.clone(),
        });
    }
    references.truncate(max_references);
    ResolvedContext { context, references, source: SourceLabel::Retrieved }
}

/// Resolve an ambiguous pile: a numbered digest of at most `doc_limit`
/// candidates (title, URL, and a short summary each, never full content),
/// closed with the ask-a-more-specific-question sentence.
pub fn resolve_ambiguous(
    candidates: &[ScoredPage],
    doc_limit: usize,
    summary_words: usize,
    max_references: usize,
) -> ResolvedContext {
    let mut context = String::from("We found multiple documents on this topic:\n");
    let mut references = Vec::new();
    for (i, candidate) in candidates.iter().take(doc_limit).enumerate() {
        context.push_str(&format!(
            "{}. Title: {}\nURL: {}\nSummary: {}\n",
            i + 1,
            candidate.title_or_url(),
            candidate.url,
            first_words(&candidate.content, summary_words)
        ));
        references.push(Reference {
            title: candidate.title_or_url().to_string(),
            url: candidate.url.clone(),
        });
    }
    context.push_str(&format!("\n{SPECIFICITY_HINT}\n"));
    references.truncate(max_references);
    ResolvedContext { context, references, source: SourceLabel::Retrieved }
}

/// Resolve from fallback search results: URL plus summary per page.
pub fn resolve_fallback(
    pages: &[(String, Option<String>, String)],
    max_references: usize,
) -> ResolvedContext {
    let mut context = String::new();
    let mut references = Vec::new();
    for (url, title, summary) in pages {
        let title = title.clone().unwrap_or_else(|| url.clone());
        context.push_str(&format!("Title: {title}\nURL: {url}\nSummary: {summary}\n\n"));
        references.push(Reference { title, url: url.clone() });
    }
    references.truncate(max_references);
    ResolvedContext { context, references, source: SourceLabel::Searched }
}
