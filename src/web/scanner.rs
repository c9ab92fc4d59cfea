//! Sequential page scanning.
//!
//! Pages are fetched and processed one at a time with a fixed pause between
//! fetches. A cancellation signal is only looked at between pages.

use std::collections::HashSet;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use super::client::HtmlFetcher;
use super::types::REQUEST_DELAY;
use super::util::truncate_url;
use crate::contract::{ContractPageProcessor, ContractRecord, PageOutcome, RejectReason};
use crate::TARGET_WEB_REQUEST;

/// Counters and records collected over one scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub records: Vec<ContractRecord>,
    pub attempted: usize,
    pub unreachable: usize,
    pub empty: usize,
    pub unqualified: usize,
    pub duplicates: usize,
    pub cancelled: bool,
}

impl ScanReport {
    pub fn extracted(&self) -> usize {
        self.records.len()
    }

    fn record(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Extracted(record) => self.records.push(record),
            PageOutcome::Rejected(RejectReason::Unreachable(_)) => self.unreachable += 1,
            PageOutcome::Rejected(RejectReason::NoContent) => self.empty += 1,
            PageOutcome::Rejected(RejectReason::Unqualified) => self.unqualified += 1,
        }
    }
}

pub struct Scanner<'a, F: HtmlFetcher> {
    fetcher: &'a F,
    processor: ContractPageProcessor,
    request_delay: Duration,
}

impl<'a, F: HtmlFetcher> Scanner<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Scanner {
            fetcher,
            processor: ContractPageProcessor::default(),
            request_delay: REQUEST_DELAY,
        }
    }

    pub fn with_processor(mut self, processor: ContractPageProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn with_request_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }

    /// Process every URL in order, pausing between fetches, until the list is
    /// exhausted or `cancel_rx` turns true.
    pub async fn scan(&self, urls: &[String], cancel_rx: &watch::Receiver<bool>) -> ScanReport {
        let mut report = ScanReport::default();
        let mut seen: HashSet<&str> = HashSet::new();
        let total = urls.len();

        for (i, url) in urls.iter().enumerate() {
            if *cancel_rx.borrow() {
                warn!(target: TARGET_WEB_REQUEST, "Scan cancelled after {} of {} URLs", i, total);
                report.cancelled = true;
                break;
            }

            let url = url.trim();
            if url.is_empty() {
                debug!(target: TARGET_WEB_REQUEST, "Skipping empty URL");
                continue;
            }
            if !seen.insert(url) {
                debug!(target: TARGET_WEB_REQUEST, "Skipping duplicate URL: {}", url);
                report.duplicates += 1;
                continue;
            }

            if report.attempted > 0 && !self.request_delay.is_zero() {
                sleep(self.request_delay).await;
            }

            info!(target: TARGET_WEB_REQUEST, "Processing {}/{}: {}", i + 1, total, truncate_url(url, 60));
            report.attempted += 1;

            let outcome = self.processor.evaluate(url, self.fetcher).await;
            if let PageOutcome::Rejected(reason) = &outcome {
                match reason {
                    RejectReason::Unreachable(err) => {
                        warn!(target: TARGET_WEB_REQUEST, "Could not retrieve {}: {}", url, err)
                    }
                    other => debug!(target: TARGET_WEB_REQUEST, "Skipped {}: {}", url, other),
                }
            }
            report.record(outcome);
        }

        info!(
            target: TARGET_WEB_REQUEST,
            "Scan finished: {} attempted, {} extracted, {} unreachable, {} empty, {} without contract mention",
            report.attempted,
            report.extracted(),
            report.unreachable,
            report.empty,
            report.unqualified
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::RawPage;
    use crate::web::FetchError;
    use std::cell::RefCell;

    const QUALIFYING: &str =
        "<html><body><p>Gamma Systems wins a $2 million contract for network upgrades</p></body></html>";
    const UNQUALIFIED: &str = "<html><body><p>Weather report for the weekend ahead</p></body></html>";

    /// Serves fixed pages and remembers which URLs were requested.
    struct RecordingFetcher {
        requested: RefCell<Vec<String>>,
        cancel_after: Option<(usize, watch::Sender<bool>)>,
    }

    impl RecordingFetcher {
        fn new() -> Self {
            RecordingFetcher {
                requested: RefCell::new(Vec::new()),
                cancel_after: None,
            }
        }
    }

    impl HtmlFetcher for RecordingFetcher {
        async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            if let Some((limit, tx)) = &self.cancel_after {
                if self.requested.borrow().len() >= *limit {
                    let _ = tx.send(true);
                }
            }
            match url {
                u if u.contains("qualifying") => Ok(RawPage::new(url, QUALIFYING)),
                u if u.contains("weather") => Ok(RawPage::new(url, UNQUALIFIED)),
                u if u.contains("blank") => Ok(RawPage::new(url, "")),
                _ => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_scan_counts_outcomes() {
        let fetcher = RecordingFetcher::new();
        let (_tx, rx) = watch::channel(false);
        let scanner = Scanner::new(&fetcher).with_request_delay(Duration::ZERO);

        let report = scanner
            .scan(
                &urls(&[
                    "https://a.example/qualifying",
                    "https://a.example/weather",
                    "https://a.example/blank",
                    "https://a.example/missing",
                    "",
                    "https://a.example/qualifying",
                ]),
                &rx,
            )
            .await;

        assert_eq!(report.attempted, 4);
        assert_eq!(report.extracted(), 1);
        assert_eq!(report.unqualified, 1);
        assert_eq!(report.empty, 1);
        assert_eq!(report.unreachable, 1);
        assert_eq!(report.duplicates, 1);
        assert!(!report.cancelled);

        let record = &report.records[0];
        assert_eq!(record.vendor.as_deref(), Some("Gamma Systems"));
        assert_eq!(record.estimated_value_usd_millions, Some(2.0));
        assert_eq!(record.service_type.as_deref(), Some("network"));
    }

    #[tokio::test]
    async fn test_scan_stops_between_pages_when_cancelled() {
        let (tx, rx) = watch::channel(false);
        let mut fetcher = RecordingFetcher::new();
        fetcher.cancel_after = Some((2, tx));
        let scanner = Scanner::new(&fetcher).with_request_delay(Duration::ZERO);

        let report = scanner
            .scan(
                &urls(&[
                    "https://b.example/qualifying",
                    "https://b.example/weather",
                    "https://b.example/qualifying-2",
                ]),
                &rx,
            )
            .await;

        // The page in flight when cancellation arrives still completes
        assert_eq!(fetcher.requested.borrow().len(), 2);
        assert_eq!(report.attempted, 2);
        assert!(report.cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_fetches() {
        let fetcher = RecordingFetcher::new();
        let (_tx, rx) = watch::channel(false);
        let scanner = Scanner::new(&fetcher).with_request_delay(Duration::from_millis(500));

        let started = tokio::time::Instant::now();
        scanner
            .scan(
                &urls(&[
                    "https://c.example/weather",
                    "https://c.example/weather-2",
                    "https://c.example/weather-3",
                ]),
                &rx,
            )
            .await;

        // No pause before the first fetch, one after each of the others
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1500));
    }
}
