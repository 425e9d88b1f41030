// src/json_span.rs
//! Locating a JSON object inside free-form model output.
//!
//! Models asked for "only the JSON object" still wrap it in markdown fences or
//! prose. Location is a pure string operation so it can be tested without a
//! live service.

use crate::error::{ExtractionError, Result};
use serde_json::{Map, Value};

const JSON_FENCE_OPEN: &str = "```json";
const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanSource {
    /// Content of a ```json fenced block.
    FencedBlock,
    /// First `{` through last `}` of the text.
    BraceRange,
}

/// A candidate object span borrowed from the response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonSpan<'a> {
    pub text: &'a str,
    pub source: SpanSource,
}

/// Find the candidate JSON object in `text`.
///
/// A non-empty ```json fenced block wins; otherwise the span from the first
/// `{` to the last `}` is used, provided the closing brace comes after the
/// opening one.
pub fn locate_json_object(text: &str) -> Result<JsonSpan<'_>> {
    let trimmed = text.trim();

    if let Some(fenced) = fenced_json_block(trimmed) {
        return Ok(JsonSpan {
            text: fenced,
            source: SpanSource::FencedBlock,
        });
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(JsonSpan {
            text: &trimmed[start..=end],
            source: SpanSource::BraceRange,
        }),
        _ => Err(ExtractionError::NoJsonFound),
    }
}

fn fenced_json_block(text: &str) -> Option<&str> {
    let open = text.find(JSON_FENCE_OPEN)?;
    let body_start = open + JSON_FENCE_OPEN.len();
    let body_len = text[body_start..].find(FENCE)?;
    let body = text[body_start..body_start + body_len].trim();

    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

/// Parse a located span, requiring a JSON object at the top level.
pub fn parse_json_object(span: &JsonSpan<'_>) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(span.text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ExtractionError::InvalidJson(format!(
            "expected a JSON object, found {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(ExtractionError::InvalidJson(e.to_string())),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
