// src/config.rs
use anyhow::{Context, Result as AnyResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ExtractionError, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Everything the extractor and its Gemini client need.
#[derive(Clone, Serialize)]
pub struct ExtractorConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Per-request timeout for the upstream call. `None` waits indefinitely.
    pub timeout_seconds: Option<u64>,
    /// Drop repeated citation URIs, keeping the first occurrence.
    pub dedupe_sources: bool,
}

impl std::fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("dedupe_sources", &self.dedupe_sources)
            .finish()
    }
}

/// Optional settings read from `config.yaml`. The API key is never read from a file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSettings {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub dedupe_sources: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: FileSettings,
    #[serde(default)]
    production: FileSettings,
}

impl ExtractorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: None,
            dedupe_sources: false,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_dedupe_sources(mut self, dedupe: bool) -> Self {
        self.dedupe_sources = dedupe;
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Load from the config file (explicit path, or `config.yaml` when present)
    /// and the process environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let settings = read_file_settings(config_path)?;
        Self::from_sources(settings, |key| std::env::var(key).ok())
    }

    /// Same sources as [`ExtractorConfig::load`], but a missing API key is
    /// left empty instead of failing. For reporting settings only.
    pub fn load_without_credential(config_path: Option<&Path>) -> Result<Self> {
        let settings = read_file_settings(config_path)?;
        Self::resolve(settings, |key| std::env::var(key).ok())
    }

    /// Build from already-loaded file settings and a variable lookup.
    /// Environment variables override the file.
    pub fn from_sources<F>(settings: FileSettings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::resolve(settings, lookup)?;
        if !config.has_api_key() {
            return Err(ExtractionError::Configuration(
                "API_KEY is missing.".to_string(),
            ));
        }
        Ok(config)
    }

    fn resolve<F>(settings: FileSettings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|&key| lookup(key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .unwrap_or_default();

        let mut config = Self::new(api_key);

        if let Some(model) = lookup("GEMINI_MODEL").or(settings.model) {
            config.model = model;
        }

        if let Some(base_url) = lookup("GEMINI_API_URL").or(settings.base_url) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }

        config.timeout_seconds = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                ExtractionError::Configuration(format!(
                    "GEMINI_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?),
            None => settings.timeout_seconds,
        };

        config.dedupe_sources = match lookup("CONTACT_FINDER_DEDUPE_SOURCES") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ExtractionError::Configuration(format!(
                    "CONTACT_FINDER_DEDUPE_SOURCES must be true or false, got '{}'",
                    raw
                ))
            })?,
            None => settings.dedupe_sources.unwrap_or(false),
        };

        // A zero timeout would fail every request
        if config.timeout_seconds == Some(0) {
            config.timeout_seconds = None;
        }

        Ok(config)
    }
}

fn read_file_settings(config_path: Option<&Path>) -> Result<FileSettings> {
    let environment = get_environment();
    info!("Loading configuration for environment: {}", environment);

    load_file_settings(config_path, &environment)
        .map_err(|e| ExtractionError::Configuration(format!("{:#}", e)))
}

fn get_environment() -> String {
    std::env::var("CONTACT_FINDER_ENV")
        .or_else(|_| std::env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "local".to_string())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read the settings section for `environment`. A missing default file is not
/// an error; a missing explicit file is.
fn load_file_settings(config_path: Option<&Path>, environment: &str) -> AnyResult<FileSettings> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default_path.exists() {
                return Ok(FileSettings::default());
            }
            default_path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_settings(&content, environment)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_settings(content: &str, environment: &str) -> AnyResult<FileSettings> {
    let config_file: ConfigFile = serde_yaml::from_str(content)?;

    Ok(match environment {
        "production" => config_file.production,
        _ => config_file.local,
    })
}
