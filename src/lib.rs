//! Public contact lookup for LinkedIn profiles.
//!
//! [`ContactExtractor`] asks an AI provider with web-search grounding for a
//! person's contact fields, pulls the JSON object out of its free-form answer
//! and returns it with the cited sources.

pub mod ai;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod json_span;
pub mod prompts;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use ai::{GeminiClient, GeneratedText, GenerationOptions, GenerationRequest, TextGenerator};
pub use config::ExtractorConfig;
pub use error::{ErrorKind, ExtractionError};
pub use extractor::ContactExtractor;
pub use types::{Citation, ContactQuery, ContactRecord, ExtractionResult};
