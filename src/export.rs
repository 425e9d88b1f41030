// src/export.rs
//! CSV export of extracted contacts

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;
use std::path::Path;

use crate::types::ContactRecord;

pub const CSV_COLUMNS: [&str; 5] = ["name", "email", "phone", "website", "linkedinUrl"];

/// Write a header row and one row per record, every field quoted.
pub fn write_contacts_csv<W: Write>(writer: W, records: &[ContactRecord]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    csv_writer
        .write_record(CSV_COLUMNS)
        .context("Failed to write CSV header")?;

    for record in records {
        csv_writer
            .write_record(csv_row(record))
            .context("Failed to write CSV row")?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn export_contacts_csv(path: &Path, records: &[ContactRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_contacts_csv(file, records)
        .with_context(|| format!("Failed to export contacts to {}", path.display()))
}

fn csv_row(record: &ContactRecord) -> [&str; 5] {
    [
        record.name.as_deref().unwrap_or(""),
        record.email.as_deref().unwrap_or(""),
        record.phone.as_deref().unwrap_or(""),
        record.website.as_deref().unwrap_or(""),
        record.linkedin_url.as_deref().unwrap_or(""),
    ]
}

/// `Jane_Doe_contact.csv` for a named first record, `contacts.csv` otherwise.
pub fn export_file_name(records: &[ContactRecord]) -> String {
    match records.first().and_then(|r| r.name.as_deref()) {
        Some(name) if !name.trim().is_empty() => {
            let stem = name.split_whitespace().collect::<Vec<_>>().join("_");
            format!("{}_contact.csv", sanitize_file_stem(&stem))
        }
        _ => "contacts.csv".to_string(),
    }
}

fn sanitize_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect()
}
