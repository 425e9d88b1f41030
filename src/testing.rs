// src/testing.rs
//! Deterministic stand-in for the AI provider.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::ai::{GeneratedText, GenerationRequest, GroundingSource, TextGenerator};
use crate::error::{ExtractionError, Result};

/// Returns the same canned response for every call and records each request.
pub struct StubGenerator {
    response: Result<GeneratedText>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl StubGenerator {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            response: Ok(GeneratedText {
                text: text.into(),
                sources: Vec::new(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ExtractionError) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_source(mut self, uri: Option<&str>, title: Option<&str>) -> Self {
        if let Ok(generated) = &mut self.response {
            generated.sources.push(GroundingSource {
                uri: uri.map(str::to_string),
                title: title.map(str::to_string),
            });
        }
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedText> {
        self.requests.lock().unwrap().push(request.clone());
        self.response.clone()
    }
}
