//! `siteq`: site-scoped question answering from the command line.
//!
//! Offline stages (`crawl`, `build`, `amend`) prepare and maintain the
//! embedded store; `chat` answers questions against it.

mod commands;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AmendArgs, BuildArgs, ChatArgs, CrawlArgs};

#[derive(Parser)]
#[command(name = "siteq", version, about = "Site-scoped question answering")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat against the embedded store, with live search fallback
    Chat(ChatArgs),
    /// Discover site URLs from a sitemap and write the expanded list
    Crawl(CrawlArgs),
    /// Fetch the corpus, embed it, and write the store
    Build(BuildArgs),
    /// Append correction text to records whose URL matches
    Amend(AmendArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match Cli::parse().command {
        Command::Chat(args) => commands::chat(args).await,
        Command::Crawl(args) => commands::crawl(args).await,
        Command::Build(args) => commands::build(args).await,
        Command::Amend(args) => commands::amend(args),
    }
}
