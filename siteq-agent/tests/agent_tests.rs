//! End-to-end pipeline tests on fake collaborators.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use siteq_agent::policy::SPECIFICITY_HINT;
use siteq_agent::{
    ANSWER_UNAVAILABLE, AgentConfig, NO_CONTENT_MESSAGE, PageFinder, SiteAgent, SourceLabel,
};
use siteq_model::MockLlm;
use siteq_rag::{
    DocumentStore, EmbeddingProvider, PageRecord, RetrievalConfig, SelectionPolicy, StoreUpdater,
};
use siteq_search::FetchedPage;

/// Two-dimensional fake embedder: anything mentioning "leadership" lands
/// on the first axis, everything else on the second.
struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> siteq_rag::Result<Vec<f32>> {
        if text.to_lowercase().contains("leadership") {
            Ok(vec![1.0, 0.0])
        } else {
            Ok(vec![0.0, 1.0])
        }
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn model_id(&self) -> &str {
        "fake-embedder"
    }
}

/// Scripted page finder that counts its invocations.
struct ScriptedFinder {
    pages: Vec<FetchedPage>,
    calls: AtomicUsize,
}

impl ScriptedFinder {
    fn returning(pages: Vec<FetchedPage>) -> Arc<Self> {
        Arc::new(Self { pages, calls: AtomicUsize::new(0) })
    }

    fn empty() -> Arc<Self> {
        Self::returning(Vec::new())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFinder for ScriptedFinder {
    async fn find_pages(&self, _query: &str, _domain: &str) -> Vec<FetchedPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.clone()
    }
}

fn leadership_store() -> DocumentStore {
    let mut store = DocumentStore::new("fake-embedder", 2);
    store
        .append_pages(
            vec![PageRecord::new("https://x.com/leadership", "Founded 1961")],
            vec![vec![1.0, 0.0]],
        )
        .unwrap();
    store
}

fn config() -> AgentConfig {
    AgentConfig::builder("x.com")
        .retrieval(
            RetrievalConfig::builder()
                .policy(SelectionPolicy::MaxGate { threshold: 0.5, top_n: 5 })
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

fn agent_with(
    config: AgentConfig,
    llm: MockLlm,
    finder: Arc<ScriptedFinder>,
    store_path: PathBuf,
) -> SiteAgent {
    SiteAgent::new(
        config,
        Arc::new(KeywordEmbedder),
        Arc::new(llm),
        finder,
        StoreUpdater::new(Arc::new(KeywordEmbedder), store_path),
    )
}

#[tokio::test]
async fn local_hit_answers_from_the_single_matching_record() {
    let dir = tempfile::tempdir().unwrap();
    let llm = MockLlm::with_responses(["The company was founded in 1961."]);
    let finder = ScriptedFinder::empty();
    let agent = agent_with(config(), llm, finder.clone(), dir.path().join("store.json"));

    let mut store = leadership_store();
    let answer = agent.ask(&mut store, "leadership").await.unwrap();

    assert_eq!(answer.source, Some(SourceLabel::Retrieved));
    assert_eq!(answer.references.len(), 1);
    assert_eq!(answer.references[0].url, "https://x.com/leadership");
    assert!(answer.text.starts_with("The company was founded in 1961."));
    assert!(answer.text.contains("[1. https://x.com/leadership](https://x.com/leadership)"));
    // No fallback on a hit.
    assert_eq!(finder.calls(), 0);
}

#[tokio::test]
async fn below_threshold_miss_invokes_fallback_and_reports_no_content() {
    let dir = tempfile::tempdir().unwrap();
    let llm = MockLlm::with_responses(Vec::<String>::new());
    let finder = ScriptedFinder::empty();
    let agent = agent_with(config(), llm, finder.clone(), dir.path().join("store.json"));

    let mut store = leadership_store();
    let answer = agent.ask(&mut store, "unrelated topic").await.unwrap();

    // The miss reached the fallback; zero search results mean the fixed
    // no-content message with an empty reference list.
    assert_eq!(finder.calls(), 1);
    assert_eq!(answer.text, NO_CONTENT_MESSAGE);
    assert!(answer.references.is_empty());
    assert_eq!(answer.source, None);
}

#[tokio::test]
async fn fallback_success_persists_the_summary_and_cites_it() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("store.json");
    // First response summarizes the fetched page, second phrases the answer.
    let llm = MockLlm::with_responses([
        "A sufficiently long summary of the new page.",
        "Here is what we found on our site.",
    ]);
    let finder = ScriptedFinder::returning(vec![FetchedPage {
        url: "https://x.com/new-product".into(),
        title: Some("New Product".into()),
        content: "Very long page text about a brand new product line.".into(),
    }]);
    let agent = agent_with(config(), llm, finder, store_path.clone());

    let mut store = leadership_store();
    let answer = agent.ask(&mut store, "unrelated topic").await.unwrap();

    assert_eq!(answer.source, Some(SourceLabel::Searched));
    assert_eq!(answer.references.len(), 1);
    assert_eq!(answer.references[0].title, "New Product");
    assert!(answer.text.contains("[1. New Product](https://x.com/new-product)"));

    // The store grew and was persisted with the summary as content.
    assert_eq!(store.len(), 2);
    let persisted = DocumentStore::load(&store_path).unwrap();
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted.record(1).unwrap().content, "A sufficiently long summary of the new page.");
}

#[tokio::test]
async fn unusable_summaries_turn_fallback_success_into_no_content() {
    let dir = tempfile::tempdir().unwrap();
    // Summary is too short to be usable; no further responses needed.
    let llm = MockLlm::with_responses(["ok"]);
    let finder = ScriptedFinder::returning(vec![FetchedPage {
        url: "https://x.com/thin".into(),
        title: None,
        content: "thin page".into(),
    }]);
    let agent = agent_with(config(), llm, finder, dir.path().join("store.json"));

    let mut store = leadership_store();
    let answer = agent.ask(&mut store, "unrelated topic").await.unwrap();

    assert_eq!(answer.text, NO_CONTENT_MESSAGE);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn three_candidates_produce_a_condensed_context() {
    let dir = tempfile::tempdir().unwrap();
    let llm = Arc::new(MockLlm::with_responses(["Several pages cover this."]));
    let finder = ScriptedFinder::empty();
    let config = config();
    let agent = SiteAgent::new(
        config,
        Arc::new(KeywordEmbedder),
        llm.clone(),
        finder,
        StoreUpdater::new(Arc::new(KeywordEmbedder), dir.path().join("store.json")),
    );

    let mut store = DocumentStore::new("fake-embedder", 2);
    store
        .append_pages(
            vec![
                PageRecord::new("https://x.com/leadership", "Full leadership body text"),
                PageRecord::new("https://x.com/leadership/team", "Full team body text"),
                PageRecord::new("https://x.com/leadership/history", "Full history body text"),
            ],
            vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.9, 0.2]],
        )
        .unwrap();

    let answer = agent.ask(&mut store, "leadership").await.unwrap();
    assert_eq!(answer.source, Some(SourceLabel::Retrieved));
    assert_eq!(answer.references.len(), 3);

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].prompt;
    assert!(prompt.contains("We found multiple documents on this topic:"));
    assert!(prompt.contains("1. Title:"));
    assert!(prompt.contains(SPECIFICITY_HINT));
    // Summaries only; the full bodies stay out of the prompt.
    assert!(!prompt.contains("Content: Full leadership body text"));
}

#[tokio::test]
async fn reference_cap_holds_however_many_candidates_match() {
    let dir = tempfile::tempdir().unwrap();
    let llm = MockLlm::with_responses(["Answer."]);
    let finder = ScriptedFinder::empty();
    let capped = AgentConfig::builder("x.com")
        .retrieval(
            RetrievalConfig::builder()
                .policy(SelectionPolicy::MaxGate { threshold: 0.5, top_n: 5 })
                .build()
                .unwrap(),
        )
        .max_references(2)
        .build()
        .unwrap();
    let agent = agent_with(capped, llm, finder, dir.path().join("store.json"));

    let mut store = DocumentStore::new("fake-embedder", 2);
    let records: Vec<PageRecord> = (0..5)
        .map(|i| PageRecord::new(format!("https://x.com/leadership/{i}"), format!("body {i}")))
        .collect();
    let vectors: Vec<Vec<f32>> = (0..5).map(|i| vec![1.0 - (i as f32) * 0.01, 0.1]).collect();
    store.append_pages(records, vectors).unwrap();

    let answer = agent.ask(&mut store, "leadership").await.unwrap();
    assert_eq!(answer.references.len(), 2);
}

#[tokio::test]
async fn generation_failure_degrades_to_the_sentinel_with_references() {
    let dir = tempfile::tempdir().unwrap();
    let llm = MockLlm::failing();
    let finder = ScriptedFinder::empty();
    let agent = agent_with(config(), llm, finder, dir.path().join("store.json"));

    let mut store = leadership_store();
    let answer = agent.ask(&mut store, "leadership").await.unwrap();

    assert!(answer.text.starts_with(ANSWER_UNAVAILABLE));
    assert_eq!(answer.references.len(), 1);
}
