// src/extractor.rs
use crate::ai::{
    GeminiClient, GeneratedText, GenerationOptions, GenerationRequest, GroundingSource,
    TextGenerator,
};
use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::json_span::{locate_json_object, parse_json_object};
use crate::prompts::{contact_lookup_prompt, CONTACT_SYSTEM_INSTRUCTION};
use crate::types::{Citation, ContactQuery, ContactRecord, ExtractionResult};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Looks up public contact details for a profile URL through an AI provider.
///
/// Holds no per-request state; share it behind an `Arc` to run lookups
/// concurrently.
pub struct ContactExtractor {
    generator: Arc<dyn TextGenerator>,
    dedupe_sources: bool,
}

impl ContactExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            dedupe_sources: false,
        }
    }

    pub fn with_dedupe_sources(mut self, dedupe: bool) -> Self {
        self.dedupe_sources = dedupe;
        self
    }

    /// Build an extractor backed by Gemini.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        let client = GeminiClient::new(config)?;
        Ok(Self::new(Arc::new(client)).with_dedupe_sources(config.dedupe_sources))
    }

    pub async fn extract(&self, profile_url: &str) -> Result<ExtractionResult> {
        let query = ContactQuery::parse(profile_url)?;
        info!("Looking up contact details for {}", query.profile_url());

        let request = GenerationRequest {
            prompt: contact_lookup_prompt(query.profile_url()),
            system_instruction: CONTACT_SYSTEM_INSTRUCTION.to_string(),
            options: GenerationOptions::default(),
        };

        let generated = self.generator.generate(&request).await.map_err(|e| {
            error!("AI call failed for {}: {}", query.profile_url(), e);
            e
        })?;

        let result = self.build_result(&query, generated)?;
        info!(
            "Extracted contact for {} with {} sources",
            query.profile_url(),
            result.sources.len()
        );

        Ok(result)
    }

    fn build_result(
        &self,
        query: &ContactQuery,
        generated: GeneratedText,
    ) -> Result<ExtractionResult> {
        let contact_info = parse_contact_record(&generated.text, query)?;
        let sources = collect_citations(generated.sources, self.dedupe_sources);

        Ok(ExtractionResult {
            contact_info,
            sources,
        })
    }
}

/// Turn the model's text into a record. `linkedin_url` always echoes the query.
pub fn parse_contact_record(text: &str, query: &ContactQuery) -> Result<ContactRecord> {
    let span = locate_json_object(text).map_err(|e| {
        warn!("No JSON object in AI response for {}", query.profile_url());
        debug!("AI response text: {}", text);
        e
    })?;

    let object = parse_json_object(&span).map_err(|e| {
        warn!("Invalid JSON in AI response for {}: {}", query.profile_url(), e);
        debug!("Candidate JSON span: {}", span.text);
        e
    })?;

    Ok(coerce_contact_record(&object, query))
}

fn coerce_contact_record(object: &Map<String, Value>, query: &ContactQuery) -> ContactRecord {
    if let Some(reported) = object.get("linkedinUrl").and_then(Value::as_str) {
        if reported != query.profile_url() {
            debug!(
                "AI reported linkedinUrl {} for query {}, keeping the query URL",
                reported,
                query.profile_url()
            );
        }
    }

    ContactRecord {
        name: text_field(object, "name"),
        email: text_field(object, "email"),
        phone: text_field(object, "phone"),
        website: text_field(object, "website"),
        linkedin_url: Some(query.profile_url().to_string()),
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        // Phone numbers sometimes come back unquoted
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Keep grounding entries that carry a URI, in reported order.
pub fn collect_citations(sources: Vec<GroundingSource>, dedupe: bool) -> Vec<Citation> {
    let mut seen = HashSet::new();

    sources
        .into_iter()
        .filter_map(|source| {
            let uri = source.uri?.trim().to_string();
            if uri.is_empty() {
                return None;
            }
            let title = source
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
            Some(Citation { uri, title })
        })
        .filter(|citation| !dedupe || seen.insert(citation.uri.clone()))
        .collect()
}

impl std::fmt::Debug for ContactExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactExtractor")
            .field("dedupe_sources", &self.dedupe_sources)
            .finish_non_exhaustive()
    }
}
