// src/ai/mod.rs
//! Text generation capability used by the extractor.
//!
//! The extractor only needs "prompt in, text and sources out", so the provider
//! sits behind [`TextGenerator`] and tests can swap in a stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod gemini_client;
pub mod types;

pub use gemini_client::GeminiClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    /// Ground the answer with the provider's web search and report the sources.
    pub web_search: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            web_search: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: String,
    pub options: GenerationOptions,
}

/// One grounding entry as reported by the provider. The URI may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedText {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation. Transport and provider failures are reported as
    /// [`crate::error::ExtractionError::UpstreamFailure`].
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedText>;
}
