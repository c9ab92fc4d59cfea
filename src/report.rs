//! Presentation of extracted contract records: console tables, CSV and JSON
//! export, summary statistics and date-range filtering.

use chrono::{DateTime, NaiveDate, TimeZone};
use prettytable::{Cell, Row, Table};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

use crate::contract::date::parse_date_candidate;
use crate::contract::{ContractRecord, TARGET_EXTRACT};

/// Column headers of the CSV export, in order.
pub const EXPORT_HEADERS: [&str; 9] = [
    "URL",
    "Title",
    "Announcement Date",
    "Summary",
    "Estimated Value (USD Millions)",
    "Vendor",
    "Client",
    "Contract Duration (Months)",
    "Service Type",
];

const UNVERIFIED_SUFFIX: &str = " (unverified)";
const TITLE_COLUMN_WIDTH: usize = 50;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV: {0}")]
    Csv(String),

    #[error("failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),
}

fn optional_cell<T: ToString>(value: &Option<T>) -> Cell {
    Cell::new(&value.as_ref().map(|v| v.to_string()).unwrap_or_default())
}

fn export_row(record: &ContractRecord) -> Row {
    Row::new(vec![
        Cell::new(&record.url),
        Cell::new(&record.title),
        Cell::new(&record.publication_date),
        Cell::new(&record.summary),
        optional_cell(&record.estimated_value_usd_millions),
        optional_cell(&record.vendor),
        optional_cell(&record.client),
        optional_cell(&record.duration_months),
        optional_cell(&record.service_type),
    ])
}

/// Render records as CSV with a header row. Absent values become empty cells.
pub fn export_csv(records: &[ContractRecord]) -> Result<String, ReportError> {
    let mut table = Table::new();
    table.set_titles(Row::new(EXPORT_HEADERS.iter().map(|h| Cell::new(h)).collect()));
    for record in records {
        table.add_row(export_row(record));
    }

    let mut buffer = Vec::new();
    table
        .to_csv(&mut buffer)
        .map_err(|e| ReportError::Csv(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| ReportError::Csv(e.to_string()))
}

/// Render records as a JSON array.
pub fn export_records_json(records: &[ContractRecord]) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Default export file name, stamped with the given time.
pub fn default_csv_filename<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("it_contracts_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${:.2}M", v),
        None => "N/A".to_string(),
    }
}

pub fn format_duration(months: Option<u32>) -> String {
    match months {
        Some(m) => format!("{} months", m),
        None => "N/A".to_string(),
    }
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}

/// Build the console table of records.
pub fn build_table(records: &[ContractRecord]) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Title"),
        Cell::new("Date"),
        Cell::new("Value"),
        Cell::new("Duration"),
        Cell::new("Vendor"),
        Cell::new("Client"),
        Cell::new("Service"),
    ]));

    for record in records {
        table.add_row(Row::new(vec![
            Cell::new(&shorten(&record.title, TITLE_COLUMN_WIDTH)),
            Cell::new(&record.publication_date),
            Cell::new(&format_value(record.estimated_value_usd_millions)),
            Cell::new(&format_duration(record.duration_months)),
            Cell::new(record.vendor.as_deref().unwrap_or("N/A")),
            Cell::new(record.client.as_deref().unwrap_or("N/A")),
            Cell::new(record.service_type.as_deref().unwrap_or("N/A")),
        ]));
    }

    table
}

pub fn print_table(records: &[ContractRecord]) {
    build_table(records).printstd();
}

/// Aggregate figures over a set of records.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractStats {
    pub contracts: usize,
    pub total_value_usd_millions: f64,
    pub average_duration_months: Option<f64>,
    pub service_types: usize,
    pub vendors: usize,
}

impl ContractStats {
    pub fn from_records(records: &[ContractRecord]) -> Self {
        let total_value_usd_millions = records
            .iter()
            .filter_map(|r| r.estimated_value_usd_millions)
            .sum();

        let durations: Vec<u32> = records.iter().filter_map(|r| r.duration_months).collect();
        let average_duration_months = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().map(|&d| f64::from(d)).sum::<f64>() / durations.len() as f64)
        };

        let service_types: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.service_type.as_deref())
            .collect();
        let vendors: BTreeSet<&str> = records.iter().filter_map(|r| r.vendor.as_deref()).collect();

        ContractStats {
            contracts: records.len(),
            total_value_usd_millions,
            average_duration_months,
            service_types: service_types.len(),
            vendors: vendors.len(),
        }
    }

    pub fn total_value_display(&self) -> String {
        if self.total_value_usd_millions > 0.0 {
            format!("${:.1}M", self.total_value_usd_millions)
        } else {
            "N/A".to_string()
        }
    }

    pub fn average_duration_display(&self) -> String {
        match self.average_duration_months {
            Some(avg) => format!("{:.0} months", avg),
            None => "N/A".to_string(),
        }
    }
}

/// Count records per service type, most common first. Ties are ordered by
/// label.
pub fn service_type_breakdown(records: &[ContractRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for service in records.iter().filter_map(|r| r.service_type.as_deref()) {
        *counts.entry(service).or_insert(0) += 1;
    }

    let mut breakdown: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(service, count)| (service.to_string(), count))
        .collect();
    breakdown.sort_by(|a, b| b.1.cmp(&a.1));
    breakdown
}

fn parse_record_date(value: &str) -> Option<NaiveDate> {
    parse_date_candidate(value)
        .or_else(|| NaiveDate::parse_from_str(value.trim(), "%m/%d/%Y").ok())
}

/// Keep records published within `[from, to]`.
///
/// Records whose date cannot be read are kept, with the date marked as
/// unverified. Without bounds the records pass through untouched.
pub fn filter_by_date_range(
    records: Vec<ContractRecord>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<ContractRecord> {
    if from.is_none() && to.is_none() {
        return records;
    }

    records
        .into_iter()
        .filter_map(|mut record| match parse_record_date(&record.publication_date) {
            Some(date) => {
                let after_start = from.map_or(true, |f| date >= f);
                let before_end = to.map_or(true, |t| date <= t);
                if after_start && before_end {
                    Some(record)
                } else {
                    debug!(target: TARGET_EXTRACT, "Filtered out {} dated {}", record.url, date);
                    None
                }
            }
            None => {
                if !record.publication_date.ends_with(UNVERIFIED_SUFFIX) {
                    record.publication_date.push_str(UNVERIFIED_SUFFIX);
                }
                Some(record)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn record(url: &str, date: &str) -> ContractRecord {
        ContractRecord {
            url: url.to_string(),
            title: "Award".to_string(),
            publication_date: date.to_string(),
            summary: "A contract was awarded".to_string(),
            estimated_value_usd_millions: None,
            vendor: None,
            client: None,
            duration_months: None,
            service_type: None,
        }
    }

    fn sample() -> Vec<ContractRecord> {
        let mut a = record("https://a.example", "2024-03-18");
        a.estimated_value_usd_millions = Some(5.0);
        a.duration_months = Some(12);
        a.vendor = Some("Acme Corp".to_string());
        a.client = Some("Beta Inc".to_string());
        a.service_type = Some("cloud".to_string());

        let mut b = record("https://b.example", "2024-04-02");
        b.estimated_value_usd_millions = Some(2.5);
        b.duration_months = Some(24);
        b.vendor = Some("Acme Corp".to_string());
        b.service_type = Some("data".to_string());

        let mut c = record("https://c.example", "yesterday");
        c.service_type = Some("cloud".to_string());

        vec![a, b, c]
    }

    #[test]
    fn test_export_csv() {
        let csv = export_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "URL,Title,Announcement Date,Summary,Estimated Value (USD Millions),Vendor,Client,Contract Duration (Months),Service Type"
        );
        assert_eq!(
            lines[1],
            "https://a.example,Award,2024-03-18,A contract was awarded,5,Acme Corp,Beta Inc,12,cloud"
        );
        assert_eq!(
            lines[3],
            "https://c.example,Award,yesterday,A contract was awarded,,,,,cloud"
        );
    }

    #[test]
    fn test_export_records_json_omits_absent_fields() {
        let json = export_records_json(&sample()[2..]).unwrap();
        assert!(json.contains("\"service_type\": \"cloud\""));
        assert!(!json.contains("vendor"));
    }

    #[test]
    fn test_stats() {
        let stats = ContractStats::from_records(&sample());
        assert_eq!(stats.contracts, 3);
        assert_eq!(stats.total_value_usd_millions, 7.5);
        assert_eq!(stats.average_duration_months, Some(18.0));
        assert_eq!(stats.service_types, 2);
        assert_eq!(stats.vendors, 1);
        assert_eq!(stats.total_value_display(), "$7.5M");
        assert_eq!(stats.average_duration_display(), "18 months");

        let empty = ContractStats::from_records(&[]);
        assert_eq!(empty.total_value_display(), "N/A");
        assert_eq!(empty.average_duration_display(), "N/A");
    }

    #[test]
    fn test_service_type_breakdown() {
        assert_eq!(
            service_type_breakdown(&sample()),
            vec![("cloud".to_string(), 2), ("data".to_string(), 1)]
        );
    }

    #[test]
    fn test_filter_by_date_range_fails_open() {
        let from = NaiveDate::from_ymd_opt(2024, 3, 1);
        let to = NaiveDate::from_ymd_opt(2024, 3, 31);
        let kept = filter_by_date_range(sample(), from, to);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].url, "https://a.example");
        assert_eq!(kept[1].url, "https://c.example");
        assert_eq!(kept[1].publication_date, "yesterday (unverified)");
    }

    #[test]
    fn test_filter_without_bounds_is_identity() {
        let kept = filter_by_date_range(sample(), None, None);
        assert_eq!(kept, sample());
    }

    #[test]
    fn test_filter_reads_text_dates() {
        let records = vec![
            record("https://d.example", "March 18, 2024"),
            record("https://e.example", "4/2/2024"),
        ];
        let kept = filter_by_date_range(records, NaiveDate::from_ymd_opt(2024, 4, 1), None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "https://e.example");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_value(Some(2.5)), "$2.50M");
        assert_eq!(format_value(None), "N/A");
        assert_eq!(format_duration(Some(12)), "12 months");
        assert_eq!(build_table(&sample()).len(), 4);

        let name = default_csv_filename(&Utc::now());
        assert!(name.starts_with("it_contracts_") && name.ends_with(".csv"));
    }
}
