//! Subcommand implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use siteq_agent::{AgentConfig, SiteAgent, SourceLabel};
use siteq_crawl::{
    CorpusBuilder, DiscoveryConfig, LinkDiscoverer, load_corpus, parse_sitemap_file, save_corpus,
    write_sitemap_file,
};
use siteq_model::GroqClient;
use siteq_rag::{
    DocumentStore, HttpEmbeddingProvider, RetrievalConfig, SelectionPolicy, StoreUpdater,
    build_store,
};
use siteq_search::{DuckDuckGoSearch, FallbackSearcher, PageFetcher};

use crate::session::ChatSession;

/// Arguments for the interactive chat loop.
#[derive(Args)]
pub struct ChatArgs {
    /// Path to the embedded store
    #[arg(long, default_value = "store.json")]
    store: PathBuf,

    /// Domain the fallback search is scoped to
    #[arg(long)]
    domain: String,

    /// Similarity threshold
    #[arg(long, default_value_t = 0.5)]
    threshold: f32,

    /// Candidates considered per query
    #[arg(long, default_value_t = 5)]
    top_n: usize,

    /// Gate every record on the threshold instead of only the best match
    #[arg(long)]
    per_record: bool,

    /// Keep only candidates whose URL contains every query term
    #[arg(long)]
    narrow_url_terms: bool,

    /// Cap on rendered reference links
    #[arg(long, default_value_t = 5)]
    max_references: usize,

    /// Pages fetched when falling back to web search
    #[arg(long, default_value_t = 2)]
    fallback_results: usize,
}

/// Run the chat REPL.
pub async fn chat(args: ChatArgs) -> Result<()> {
    let embedder =
        Arc::new(HttpEmbeddingProvider::from_env().context("embedding provider setup failed")?);
    let llm = Arc::new(GroqClient::from_env().context("chat model setup failed")?);

    let mut store = DocumentStore::load_for(&args.store, embedder.as_ref())
        .with_context(|| format!("failed to load store {}", args.store.display()))?;
    println!("Loaded {} documents from {}.", store.len(), args.store.display());

    let policy = if args.per_record {
        SelectionPolicy::PerRecord { threshold: args.threshold, top_n: args.top_n }
    } else {
        SelectionPolicy::MaxGate { threshold: args.threshold, top_n: args.top_n }
    };
    let retrieval = RetrievalConfig::builder()
        .policy(policy)
        .narrow_by_url_terms(args.narrow_url_terms)
        .build()?;
    let config = AgentConfig::builder(args.domain.clone())
        .retrieval(retrieval)
        .max_references(args.max_references)
        .fallback_results(args.fallback_results)
        .build()?;

    let searcher = FallbackSearcher::new(
        Arc::new(DuckDuckGoSearch::new()?),
        PageFetcher::new()?,
        args.fallback_results,
    );
    let updater = StoreUpdater::new(embedder.clone(), args.store.clone());
    let agent = SiteAgent::new(config, embedder, llm, Arc::new(searcher), updater);

    let mut session = ChatSession::new();
    let mut editor = DefaultEditor::new()?;
    println!("Ask a question (:history to review the session, Ctrl-D to exit).");

    loop {
        match editor.readline("query> ") {
            Ok(line) => {
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(query);

                if query == ":history" {
                    for (i, turn) in session.turns().iter().enumerate() {
                        println!("{}. Q: {}\n   A: {}\n", i + 1, turn.query, turn.answer);
                    }
                    continue;
                }

                match agent.ask(&mut store, query).await {
                    Ok(answer) => {
                        println!("\n{}\n", answer.text);
                        if let Some(source) = answer.source {
                            let label = match source {
                                SourceLabel::Retrieved => "retrieved",
                                SourceLabel::Searched => "searched",
                            };
                            println!("({label})\n");
                        }
                        session.record(query, answer.text);
                    }
                    // One bad query never ends the session.
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    println!("Goodbye!");
    Ok(())
}

/// Arguments for link discovery.
#[derive(Args)]
pub struct CrawlArgs {
    /// Seed sitemap file
    #[arg(long)]
    sitemap: PathBuf,

    /// Domain to stay within
    #[arg(long)]
    domain: String,

    /// Output path for the expanded sitemap
    #[arg(long, default_value = "expanded_sitemap.xml")]
    output: PathBuf,

    /// Stop after this many URLs
    #[arg(long, default_value_t = 1000)]
    max_pages: usize,

    /// Delay between fetches, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
}

/// Discover same-domain URLs and write the expanded sitemap.
pub async fn crawl(args: CrawlArgs) -> Result<()> {
    let seeds = parse_sitemap_file(&args.sitemap)?;
    info!(seeds = seeds.len(), domain = %args.domain, "starting link discovery");

    let discoverer = LinkDiscoverer::new(
        PageFetcher::new()?,
        DiscoveryConfig {
            max_pages: args.max_pages,
            delay: Duration::from_millis(args.delay_ms),
        },
    );
    let urls = discoverer.discover(&seeds, &args.domain).await;
    write_sitemap_file(&urls, &args.output)?;
    println!("Discovered {} URLs -> {}", urls.len(), args.output.display());
    Ok(())
}

/// Arguments for corpus and store building.
#[derive(Args)]
pub struct BuildArgs {
    /// Sitemap of pages to fetch
    #[arg(long, conflicts_with = "from_corpus")]
    sitemap: Option<PathBuf>,

    /// Reuse an already-fetched corpus file instead of crawling
    #[arg(long)]
    from_corpus: Option<PathBuf>,

    /// Where to write the fetched corpus
    #[arg(long, default_value = "corpus.json")]
    corpus: PathBuf,

    /// Where to write the embedded store
    #[arg(long, default_value = "store.json")]
    store: PathBuf,

    /// Delay between fetches, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
}

/// Fetch (or reuse) the corpus, embed it, and persist the store.
pub async fn build(args: BuildArgs) -> Result<()> {
    let records = if let Some(path) = &args.from_corpus {
        load_corpus(path)?
    } else {
        let sitemap =
            args.sitemap.as_ref().context("either --sitemap or --from-corpus is required")?;
        let urls = parse_sitemap_file(sitemap)?;
        let builder =
            CorpusBuilder::new(PageFetcher::new()?, Duration::from_millis(args.delay_ms));
        let records = builder.build(&urls).await;
        save_corpus(&records, &args.corpus)?;
        records
    };
    anyhow::ensure!(!records.is_empty(), "corpus is empty, nothing to embed");

    let embedder = HttpEmbeddingProvider::from_env().context("embedding provider setup failed")?;
    let store = build_store(&embedder, records).await?;
    store.save(&args.store)?;
    println!(
        "Embedded {} documents with {} -> {}",
        store.len(),
        store.embedding_model(),
        args.store.display()
    );
    Ok(())
}

/// Arguments for the maintenance amend path.
#[derive(Args)]
pub struct AmendArgs {
    /// Path to the embedded store
    #[arg(long, default_value = "store.json")]
    store: PathBuf,

    /// Records whose URL contains this substring are amended
    #[arg(long)]
    url_contains: String,

    /// Text to append to each matching record
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the text to append from a file
    #[arg(long)]
    text_file: Option<PathBuf>,
}

/// Append correction text to matching records.
///
/// Works without an embedding provider: vectors are left as they are, the
/// accepted tradeoff of the amend path.
pub fn amend(args: AmendArgs) -> Result<()> {
    let text = match (args.text, args.text_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either --text or --text-file is required"),
    };

    let mut store = DocumentStore::load(&args.store)
        .with_context(|| format!("failed to load store {}", args.store.display()))?;
    for record in store.find_by_url_substring(&args.url_contains) {
        println!("Matching record: {}", record.url);
    }
    let updated = store.amend_where_url_contains(&args.url_contains, &text);
    if updated > 0 {
        store.save(&args.store)?;
        println!("Updated {updated} record(s).");
    } else {
        println!("No record required updating.");
    }
    Ok(())
}
