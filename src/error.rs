// src/error.rs
//! Typed errors for contact extraction.
//!
//! Every variant renders a message meant to be shown to the user as-is.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// Missing credential or unreadable configuration. Fatal to the deployment.
    #[error("Server configuration error: {0}")]
    Configuration(String),

    /// The profile URL is empty or not a well-formed URL.
    #[error("Invalid profile URL: {0}")]
    InvalidQuery(String),

    /// Network or service failure while calling the AI provider.
    #[error("Failed to get contact information from AI. Reason: {0}")]
    UpstreamFailure(String),

    /// The response text contains no object span.
    #[error("The AI response did not contain a valid JSON object.")]
    NoJsonFound,

    /// An object span was found but does not parse.
    #[error("The AI returned a response that was not valid JSON: {0}")]
    InvalidJson(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidQuery,
    UpstreamFailure,
    NoJsonFound,
    InvalidJson,
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidQuery(_) => ErrorKind::InvalidQuery,
            Self::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
            Self::NoJsonFound => ErrorKind::NoJsonFound,
            Self::InvalidJson(_) => ErrorKind::InvalidJson,
        }
    }

    /// Short machine-readable code, used in logs and JSON error output.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::InvalidQuery => "INVALID_QUERY",
            ErrorKind::UpstreamFailure => "UPSTREAM_FAILURE",
            ErrorKind::NoJsonFound => "NO_JSON_FOUND",
            ErrorKind::InvalidJson => "INVALID_JSON",
        }
    }
}
