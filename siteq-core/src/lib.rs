//! # siteq-core
//!
//! Shared building blocks for the SiteQ crates: the [`SiteqError`] type
//! used across the workspace and the [`Llm`] trait behind which every
//! text-generation backend sits.
//!
//! The answer-phrasing model is an injected capability, not a singleton:
//! components take an `Arc<dyn Llm>` so tests can substitute a scripted
//! fake (see `siteq-model`'s `MockLlm`).

mod error;
mod llm;

pub use error::{Result, SiteqError};
pub use llm::{GenerateRequest, Llm};
