use tracing::{debug, info};

use super::currency::extract_currency;
use super::duration::extract_duration;
use super::normalizer::normalize_page;
use super::organization::{assign_parties, extract_organizations};
use super::service_type::classify_service_type;
use super::summary::{summarize, DEFAULT_SUMMARY_SENTENCES};
use super::types::{ContractRecord, NormalizedText, PageOutcome, RawPage, RejectReason};
use super::TARGET_EXTRACT;
use crate::web::HtmlFetcher;

/// The literal every qualifying page must mention.
pub const QUALIFYING_TERM: &str = "contract";

/// Turns pages into contract records.
///
/// A page moves from fetched to normalized to qualified to extracted, and is
/// rejected at the first step it cannot pass.
#[derive(Debug, Clone)]
pub struct ContractPageProcessor {
    summary_sentences: usize,
}

impl Default for ContractPageProcessor {
    fn default() -> Self {
        Self {
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
        }
    }
}

impl ContractPageProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary_sentences(mut self, sentences: usize) -> Self {
        self.summary_sentences = sentences;
        self
    }

    /// Fetch `url` and run it through the pipeline.
    pub async fn evaluate<F: HtmlFetcher>(&self, url: &str, fetcher: &F) -> PageOutcome {
        match fetcher.fetch(url).await {
            Ok(page) => self.evaluate_page(url, &page),
            Err(err) => {
                debug!(target: TARGET_EXTRACT, "Rejected {}: fetch failed: {}", url, err);
                PageOutcome::Rejected(RejectReason::Unreachable(err))
            }
        }
    }

    /// Run an already fetched page through the pipeline.
    pub fn evaluate_page(&self, url: &str, page: &RawPage) -> PageOutcome {
        match normalize_page(page) {
            Some(text) => self.evaluate_text(url, text),
            None => {
                debug!(target: TARGET_EXTRACT, "Rejected {}: no text content", url);
                PageOutcome::Rejected(RejectReason::NoContent)
            }
        }
    }

    /// Apply the qualifying gate and the extractors to normalized text.
    pub fn evaluate_text(&self, url: &str, text: NormalizedText) -> PageOutcome {
        if !text.lowercase.contains(QUALIFYING_TERM) {
            debug!(target: TARGET_EXTRACT, "Rejected {}: no mention of '{}'", url, QUALIFYING_TERM);
            return PageOutcome::Rejected(RejectReason::Unqualified);
        }

        let organizations = extract_organizations(&text.original);
        let (vendor, client) = assign_parties(&organizations);

        let record = ContractRecord {
            url: url.to_string(),
            summary: summarize(&text.original, self.summary_sentences),
            estimated_value_usd_millions: extract_currency(&text.lowercase),
            vendor,
            client,
            duration_months: extract_duration(&text.lowercase),
            service_type: classify_service_type(&text.lowercase).map(str::to_string),
            title: text.title,
            publication_date: text.publication_date,
        };

        info!(target: TARGET_EXTRACT, "Extracted contract record from {}", url);
        PageOutcome::Extracted(record)
    }
}

/// Fetch and process one page. `None` covers both unreachable pages and pages
/// that never mention a contract.
pub async fn process_page<F: HtmlFetcher>(url: &str, fetcher: &F) -> Option<ContractRecord> {
    ContractPageProcessor::default()
        .evaluate(url, fetcher)
        .await
        .into_record()
}

/// Process a page that has already been retrieved.
pub fn process_html(url: &str, page: &RawPage) -> Option<ContractRecord> {
    ContractPageProcessor::default()
        .evaluate_page(url, page)
        .into_record()
}
