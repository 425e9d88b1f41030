// src/cli.rs
use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::export::{export_contacts_csv, export_file_name};
use crate::extractor::ContactExtractor;
use crate::types::{is_linkedin_profile_url, ErrorResponse, ExtractionResult};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "contact-finder")]
#[command(about = "Find public contact details for LinkedIn profiles using AI web search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// YAML config file (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write JSON logs to this file, truncated on startup
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look up contact details for one or more profile URLs
    Extract {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Print results as JSON instead of contact cards
        #[arg(long)]
        json: bool,
        /// Write successful results to this CSV file
        #[arg(long, conflicts_with = "csv_dir")]
        csv: Option<PathBuf>,
        /// Write a CSV named after the first contact into this directory
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        /// Accept URLs that are not linkedin.com/in/ profiles
        #[arg(long)]
        allow_any_url: bool,
    },
    /// Print the effective configuration (API key redacted)
    Config,
}

/// Outcome of one URL, in input order.
pub struct Lookup {
    pub profile_url: String,
    pub outcome: std::result::Result<ExtractionResult, ExtractionError>,
}

/// Returns false when a lookup failed, or when `config` finds no API key.
pub async fn handle_command(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Config => {
            let config = ExtractorConfig::load_without_credential(cli.config.as_deref())?;
            println!("{}", render_config(&config)?);
            if !config.has_api_key() {
                warn!("API_KEY is missing; extract will fail until it is set");
            }
            Ok(config.has_api_key())
        }
        Command::Extract {
            urls,
            json,
            csv,
            csv_dir,
            allow_any_url,
        } => {
            let config = ExtractorConfig::load(cli.config.as_deref())?;
            let extractor = Arc::new(ContactExtractor::from_config(&config)?);
            let lookups = run_lookups(extractor, urls, allow_any_url).await;

            if json {
                println!("{}", render_json(&lookups)?);
            } else {
                for lookup in &lookups {
                    println!("{}", render_card(lookup));
                }
            }

            let records: Vec<_> = lookups
                .iter()
                .filter_map(|l| l.outcome.as_ref().ok())
                .map(|r| r.contact_info.clone())
                .collect();

            let csv_path = match (csv, csv_dir) {
                (Some(path), _) => Some(path),
                (None, Some(dir)) => Some(dir.join(export_file_name(&records))),
                (None, None) => None,
            };

            if let Some(path) = csv_path {
                if records.is_empty() {
                    warn!("No successful lookups, skipping CSV export");
                } else {
                    export_contacts_csv(&path, &records)?;
                    info!("Exported {} contacts to {}", records.len(), path.display());
                }
            }

            Ok(lookups.iter().all(|l| l.outcome.is_ok()))
        }
    }
}

/// Run every lookup concurrently on one shared extractor.
pub async fn run_lookups(
    extractor: Arc<ContactExtractor>,
    urls: Vec<String>,
    allow_any_url: bool,
) -> Vec<Lookup> {
    let mut outcomes: Vec<Option<Lookup>> = urls.iter().map(|_| None).collect();
    let profile_urls = urls.clone();
    let mut set = JoinSet::new();

    for (index, url) in urls.into_iter().enumerate() {
        if !allow_any_url && !is_linkedin_profile_url(&url) {
            outcomes[index] = Some(Lookup {
                outcome: Err(ExtractionError::InvalidQuery(format!(
                    "{} is not a LinkedIn profile URL (expected linkedin.com/in/...)",
                    url
                ))),
                profile_url: url,
            });
            continue;
        }

        let extractor = extractor.clone();
        set.spawn(async move {
            let outcome = extractor.extract(&url).await;
            (
                index,
                Lookup {
                    profile_url: url,
                    outcome,
                },
            )
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, lookup)) => outcomes[index] = Some(lookup),
            Err(e) => error!("Lookup task failed: {}", e),
        }
    }

    outcomes
        .into_iter()
        .zip(profile_urls)
        .map(|(lookup, profile_url)| {
            lookup.unwrap_or_else(|| Lookup {
                profile_url,
                outcome: Err(ExtractionError::UpstreamFailure(
                    "lookup task did not complete".to_string(),
                )),
            })
        })
        .collect()
}

/// Effective settings as JSON, the API key shown only as set or missing.
fn render_config(config: &ExtractorConfig) -> Result<String> {
    let mut value = serde_json::to_value(config).context("Failed to serialize configuration")?;
    value["api_key"] = serde_json::Value::String(
        if config.has_api_key() {
            "<redacted>"
        } else {
            "<missing>"
        }
        .to_string(),
    );
    serde_json::to_string_pretty(&value).context("Failed to serialize configuration")
}

fn render_json(lookups: &[Lookup]) -> Result<String> {
    let entries: Vec<serde_json::Value> = lookups
        .iter()
        .map(|lookup| match &lookup.outcome {
            Ok(result) => serde_json::json!({
                "profileUrl": lookup.profile_url,
                "contactInfo": result.contact_info,
                "sources": result.sources,
            }),
            Err(e) => serde_json::json!({
                "profileUrl": lookup.profile_url,
                "error": ErrorResponse::from(e),
            }),
        })
        .collect();

    serde_json::to_string_pretty(&entries).context("Failed to serialize results")
}

pub fn render_card(lookup: &Lookup) -> String {
    let result = match &lookup.outcome {
        Ok(result) => result,
        Err(e) => return format!("✗ {}\n  {}\n", lookup.profile_url, e),
    };

    let contact = &result.contact_info;
    if !contact.has_contact_details() {
        return format!(
            "• {}\n  No contact information could be extracted.\n",
            lookup.profile_url
        );
    }

    let mut out = format!(
        "✓ {}\n",
        contact.name.as_deref().unwrap_or("Extracted Contact")
    );

    for (label, value) in [
        ("LinkedIn", &contact.linkedin_url),
        ("Email", &contact.email),
        ("Phone", &contact.phone),
        ("Website", &contact.website),
    ] {
        if let Some(value) = value {
            out.push_str(&format!("  {:<10}{}\n", format!("{}:", label), value));
        }
    }

    if !result.sources.is_empty() {
        out.push_str("  Sources:\n");
        for source in &result.sources {
            match &source.title {
                Some(title) => out.push_str(&format!("    - {} ({})\n", title, source.uri)),
                None => out.push_str(&format!("    - {}\n", source.uri)),
            }
        }
    }

    out
}
