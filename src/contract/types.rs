use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed service-category vocabulary. Classification returns the first label
/// in this order that occurs in the page text.
pub const SERVICE_TAXONOMY: &[&str] = &[
    "modernization",
    "cloud",
    "migration",
    "cybersecurity",
    "AI",
    "data",
    "infrastructure",
    "application development",
    "testing",
    "BPO",
    "managed services",
    "consulting",
    "network",
];

pub const NO_TITLE: &str = "No title found";
pub const NO_SUMMARY: &str = "No summary available.";

/// Raw page bytes as handed over by a fetcher.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub source_url: String,
    pub html: Vec<u8>,
    // Content-Type header, used to pick a charset when decoding
    pub content_type: Option<String>,
}

impl RawPage {
    pub fn new(source_url: &str, html: impl Into<Vec<u8>>) -> Self {
        RawPage {
            source_url: source_url.to_string(),
            html: html.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }
}

/// Cleaned page text in both case forms, plus title and publication date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub lowercase: String,
    pub original: String,
    pub title: String,
    pub publication_date: String,
}

/// Structured facts about one contract announcement page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub url: String,
    pub title: String,
    pub publication_date: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value_usd_millions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
}

/// Why a page did not produce a record.
#[derive(Debug)]
pub enum RejectReason {
    Unreachable(crate::web::FetchError),
    NoContent,
    Unqualified,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Unreachable(err) => write!(f, "unreachable: {}", err),
            RejectReason::NoContent => write!(f, "no text content"),
            RejectReason::Unqualified => write!(f, "no mention of \"contract\""),
        }
    }
}

/// Terminal state of processing a single page.
#[derive(Debug)]
pub enum PageOutcome {
    Extracted(ContractRecord),
    Rejected(RejectReason),
}

impl PageOutcome {
    pub fn into_record(self) -> Option<ContractRecord> {
        match self {
            PageOutcome::Extracted(record) => Some(record),
            PageOutcome::Rejected(_) => None,
        }
    }
}
