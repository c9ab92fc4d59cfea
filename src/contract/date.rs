//! Best-guess publication date for a page.
//!
//! Structured metadata is preferred, then dates written in the page text, then
//! the processing date itself. Resolution never fails.

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::TARGET_EXTRACT;

const OUTPUT_FORMAT: &str = "%Y-%m-%d";

// Metadata carriers, most trusted first
const DATE_CARRIERS: &[&str] = &[
    r#"meta[property="article:published_time"]"#,
    r#"meta[name="publishdate"]"#,
    r#"meta[name="publication-date"]"#,
    r#"meta[name="date"]"#,
    r#"meta[property="og:published_time"]"#,
    "time[datetime]",
];

lazy_static! {
    static ref CARRIER_SELECTORS: Vec<Selector> = DATE_CARRIERS
        .iter()
        .map(|css| Selector::parse(css).expect("date carrier selector"))
        .collect();

    // Free-text date patterns, tried in order; the match is used verbatim
    static ref TEXT_DATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}\b")
            .expect("month-day-year pattern"),
        Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").expect("slash date pattern"),
        Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("iso date pattern"),
    ];
}

/// Resolve the publication date of a parsed page as a string, using `today`
/// when neither the markup nor the text carries a date.
pub fn resolve_publication_date(document: &Html, text: &str, today: NaiveDate) -> String {
    if let Some(date) = date_from_metadata(document) {
        return date.format(OUTPUT_FORMAT).to_string();
    }

    if let Some(date) = date_from_text(text) {
        debug!(target: TARGET_EXTRACT, "Publication date taken from text: {}", date);
        return date;
    }

    debug!(target: TARGET_EXTRACT, "No publication date found, using {}", today);
    today.format(OUTPUT_FORMAT).to_string()
}

/// First metadata carrier, in carrier order, whose value parses as a date.
pub fn date_from_metadata(document: &Html) -> Option<NaiveDate> {
    for (css, selector) in DATE_CARRIERS.iter().zip(CARRIER_SELECTORS.iter()) {
        let Some(element) = document.select(selector).next() else {
            continue;
        };
        let raw = carrier_value(&element);
        match parse_date_candidate(&raw) {
            Some(date) => {
                debug!(target: TARGET_EXTRACT, "Publication date {} from {}", date, css);
                return Some(date);
            }
            None => {
                debug!(target: TARGET_EXTRACT, "Discarding unparseable date '{}' from {}", raw, css);
            }
        }
    }
    None
}

fn carrier_value(element: &ElementRef) -> String {
    let value = element.value();
    value
        .attr("content")
        .or_else(|| value.attr("datetime"))
        .map(str::to_string)
        .unwrap_or_else(|| element.text().collect::<String>())
        .trim()
        .to_string()
}

/// Parse a date-like metadata value. The part before any `T` separator is read
/// as `YYYY-MM-DD`; a handful of other common layouts are accepted as well.
pub fn parse_date_candidate(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let head = raw.split('T').next().unwrap_or(raw).trim();
    let first_token = head.split_whitespace().next().unwrap_or(head);
    for candidate in [head, first_token] {
        for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
                return Some(date);
            }
        }
    }

    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date.date_naive());
    }

    for format in ["%B %d, %Y", "%b %d, %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    None
}

/// First free-text date in the page, verbatim.
pub fn date_from_text(text: &str) -> Option<String> {
    TEXT_DATE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn resolve(html: &str, text: &str) -> String {
        resolve_publication_date(&Html::parse_document(html), text, today())
    }

    #[test]
    fn test_article_published_time() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="2023-11-02T09:30:00Z">
            </head><body></body></html>"#;
        assert_eq!(resolve(html, ""), "2023-11-02");
    }

    #[test]
    fn test_carrier_order_not_document_order() {
        let html = r#"<html><head>
            <meta name="date" content="2020-01-01">
            <meta name="publishdate" content="2021-05-05">
            </head><body></body></html>"#;
        assert_eq!(resolve(html, ""), "2021-05-05");
    }

    #[test]
    fn test_time_element_datetime_attribute() {
        let html = r#"<html><body><time datetime="2022-07-14T12:00">July 14</time></body></html>"#;
        assert_eq!(resolve(html, ""), "2022-07-14");
    }

    #[test]
    fn test_unparseable_carrier_is_skipped() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="sometime last week">
            <meta property="og:published_time" content="2019-03-04">
            </head><body></body></html>"#;
        assert_eq!(resolve(html, ""), "2019-03-04");
    }

    #[test]
    fn test_text_fallback_is_verbatim() {
        let html = "<html><body></body></html>";
        assert_eq!(
            resolve(html, "Posted 3/15/2024. Announced on March 5, 2024 in Boston"),
            "March 5, 2024"
        );
        assert_eq!(resolve(html, "Posted 3/15/2024 and updated 2024-03-20"), "3/15/2024");
        assert_eq!(resolve(html, "updated 2024-03-20"), "2024-03-20");
    }

    #[test]
    fn test_falls_back_to_today() {
        let html = r#"<html><head><meta name="date" content="n/a"></head></html>"#;
        assert_eq!(resolve(html, "no dates in this text"), "2024-06-01");
    }

    #[test]
    fn test_idempotent() {
        let html = r#"<html><head><meta name="date" content="2022/08/09"></head></html>"#;
        let document = Html::parse_document(html);
        let first = resolve_publication_date(&document, "Posted March 5, 2024", today());
        assert_eq!(first, "2022-08-09");
        assert_eq!(first, resolve_publication_date(&document, "Posted March 5, 2024", today()));
    }

    #[test]
    fn test_parse_date_candidate_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29);
        assert_eq!(parse_date_candidate("2024-02-29"), expected);
        assert_eq!(parse_date_candidate("2024-02-29T23:59:59+01:00"), expected);
        assert_eq!(parse_date_candidate("2024/02/29"), expected);
        assert_eq!(parse_date_candidate("20240229"), expected);
        assert_eq!(parse_date_candidate("2024-02-29 08:00:00"), expected);
        assert_eq!(parse_date_candidate("Thu, 29 Feb 2024 10:00:00 +0000"), expected);
        assert_eq!(parse_date_candidate("February 29, 2024"), expected);
        assert_eq!(parse_date_candidate("2023-02-29"), None);
        assert_eq!(parse_date_candidate(""), None);
    }
}
