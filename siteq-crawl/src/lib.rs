//! # siteq-crawl
//!
//! The offline stage that feeds the document store: parse a sitemap into
//! a seed URL list, widen it by same-domain link discovery, then fetch
//! and clean every page into the `{url, title, content}` corpus the
//! `build` step embeds.
//!
//! Nothing here runs at query time.

pub mod corpus;
pub mod discover;
pub mod error;
pub mod sitemap;

pub use corpus::{CorpusBuilder, clean_text, load_corpus, save_corpus};
pub use discover::{DiscoveryConfig, LinkDiscoverer};
pub use error::CrawlError;
pub use sitemap::{parse_sitemap, parse_sitemap_file, write_sitemap, write_sitemap_file};
