// src/types/contact.rs
//! Contact lookup inputs and the record extracted for them

use crate::error::{ExtractionError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// A validated profile URL to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactQuery {
    profile_url: String,
}

impl ContactQuery {
    /// Accepts any non-empty, well-formed absolute URL. The string is kept
    /// exactly as given so it can be echoed back verbatim.
    pub fn parse(profile_url: &str) -> Result<Self> {
        if profile_url.trim().is_empty() {
            return Err(ExtractionError::InvalidQuery(
                "profileUrl is required".to_string(),
            ));
        }

        Url::parse(profile_url.trim())
            .map_err(|e| ExtractionError::InvalidQuery(format!("{}: {}", profile_url, e)))?;

        Ok(Self {
            profile_url: profile_url.to_string(),
        })
    }

    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }
}

/// Public contact fields for one person. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub linkedin_url: Option<String>,
}

impl ContactRecord {
    /// True when at least one contact field besides the echoed profile URL was found.
    pub fn has_contact_details(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.phone.is_some()
            || self.website.is_some()
    }
}

/// One web source the AI consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Returns true for `linkedin.com/in/<handle>` style URLs.
///
/// The extractor itself accepts any URL; front ends use this to decide
/// whether a URL is worth submitting.
pub fn is_linkedin_profile_url(candidate: &str) -> bool {
    let Ok(url) = Url::parse(candidate.trim()) else {
        return false;
    };

    let host_matches = url
        .host_str()
        .map(|host| host == "linkedin.com" || host.ends_with(".linkedin.com"))
        .unwrap_or(false);

    host_matches && url.path().starts_with("/in/") && url.path().len() > "/in/".len()
}
