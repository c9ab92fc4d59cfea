//! Bulk import and export of saved URLs.

use prettytable::csv::ReaderBuilder;
use std::collections::HashSet;
use tracing::debug;

use super::types::{SavedUrlEntry, StoreError};
use super::TARGET_STORE;
use crate::web::is_valid_url;

/// Parse one URL per line. Blank lines, `#` comments, invalid URLs and repeats
/// are skipped.
pub fn import_lines(text: &str, description: &str, added_at: &str) -> Vec<SavedUrlEntry> {
    collect_urls(text.lines(), description, added_at)
}

/// Take URLs from the first column of CSV data. Rows whose first cell is not a
/// URL (such as a header row) are skipped.
pub fn import_csv_first_column(
    data: &str,
    description: &str,
    added_at: &str,
) -> Result<Vec<SavedUrlEntry>, StoreError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StoreError::Csv(e.to_string()))?;
        if let Some(first) = record.get(0) {
            cells.push(first.to_string());
        }
    }
    Ok(collect_urls(cells.iter().map(String::as_str), description, added_at))
}

fn collect_urls<'a>(
    candidates: impl Iterator<Item = &'a str>,
    description: &str,
    added_at: &str,
) -> Vec<SavedUrlEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for candidate in candidates {
        let url = candidate.trim();
        if url.is_empty() || url.starts_with('#') {
            continue;
        }
        if !is_valid_url(url) {
            debug!(target: TARGET_STORE, "Skipping invalid URL during import: {}", url);
            continue;
        }
        if seen.insert(url.to_string()) {
            entries.push(SavedUrlEntry::with_added_at(url, description, added_at));
        }
    }
    entries
}

/// Serialize saved entries as a JSON array.
pub fn export_json(entries: &[SavedUrlEntry]) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(entries)?)
}
