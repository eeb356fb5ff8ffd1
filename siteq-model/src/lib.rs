//! # siteq-model
//!
//! Text-generation backends implementing [`siteq_core::Llm`]:
//!
//! - [`GroqClient`]: chat completions against the Groq API or any
//!   OpenAI-compatible endpoint (feature `groq`, on by default)
//! - [`MockLlm`]: scripted fake for tests

#[cfg(feature = "groq")]
pub mod groq;
pub mod mock;

#[cfg(feature = "groq")]
pub use groq::GroqClient;
pub use mock::MockLlm;
