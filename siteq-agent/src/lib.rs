//! # siteq-agent
//!
//! The query pipeline that ties SiteQ together. Per query:
//!
//! 1. The [`RetrievalPolicy`] embeds the query and classifies local
//!    retrieval as a hit, an ambiguous pile, or a miss.
//! 2. A miss invokes the fallback [`PageFinder`]; fetched pages are
//!    summarized, appended to the store, and persisted.
//! 3. The [`AnswerComposer`] phrases the final answer and appends the
//!    numbered reference list.
//!
//! Everything external (embedder, generator, web search) is an
//! injected capability so tests can run the whole pipeline on fakes.

pub mod agent;
pub mod answer;
pub mod config;
pub mod fallback;
pub mod policy;
pub mod summary;

pub use agent::{AgentAnswer, AgentError, SiteAgent};
pub use answer::{ANSWER_UNAVAILABLE, AnswerComposer, NO_CONTENT_MESSAGE};
pub use config::{AgentConfig, AgentConfigBuilder};
pub use fallback::PageFinder;
pub use policy::{
    AMBIGUITY_CUTOFF, LocalRetrieval, Reference, ResolvedContext, RetrievalPolicy, SourceLabel,
};
pub use summary::first_words;
