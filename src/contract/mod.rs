//! Contract announcement extraction.
//!
//! Turns a fetched page into a `ContractRecord`: normalize the HTML, check
//! that the page mentions a contract, then run each field extractor.

pub mod currency;
pub mod date;
pub mod duration;
pub mod normalizer;
pub mod organization;
pub mod patterns;
pub mod processor;
pub mod service_type;
pub mod summary;
pub mod types;

pub use types::*;

pub use self::currency::extract_currency;
pub use self::date::resolve_publication_date;
pub use self::duration::extract_duration;
pub use self::normalizer::{normalize_html, normalize_page};
pub use self::organization::{assign_parties, extract_organizations};
pub use self::processor::{process_html, process_page, ContractPageProcessor};
pub use self::service_type::classify_service_type;
pub use self::summary::summarize;

// Module-level constants
pub const TARGET_EXTRACT: &str = "extract";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use scraper::Html;

    const MAX_SUMMARY_LEN: usize = 503;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    // Mixes arbitrary Unicode with the fragments the extractors look for
    fn page_text() -> impl Strategy<Value = String> {
        let fragment = prop_oneof![
            any::<String>(),
            Just("$2.5 million ".to_string()),
            Just("$1,500,000 ".to_string()),
            Just("3-year ".to_string()),
            Just("term of 18 months ".to_string()),
            Just("Acme Solutions Inc. ".to_string()),
            Just("Ünïcødé Systems ".to_string()),
            Just("cloud contract. ".to_string()),
            Just("March 5, 2024 ".to_string()),
            Just("日本語の契約。".to_string()),
        ];
        prop::collection::vec(fragment, 0..12).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn extractors_are_total_and_idempotent(text in page_text()) {
            let lowercase = text.to_lowercase();

            prop_assert_eq!(extract_currency(&lowercase), extract_currency(&lowercase));
            prop_assert_eq!(extract_duration(&lowercase), extract_duration(&lowercase));
            prop_assert_eq!(classify_service_type(&lowercase), classify_service_type(&lowercase));

            let organizations = extract_organizations(&text);
            prop_assert!(organizations.len() <= organization::MAX_ORGANIZATIONS);
            prop_assert!(organizations.iter().all(|name| name.chars().count() > 5));
            prop_assert_eq!(&organizations, &extract_organizations(&text));
        }

        #[test]
        fn summary_is_capped(text in page_text(), sentences in 0usize..6) {
            let summary = summarize(&text, sentences);
            prop_assert!(
                summary.chars().count() <= MAX_SUMMARY_LEN || summary == NO_SUMMARY,
                "summary too long: {} chars",
                summary.chars().count()
            );
            prop_assert!(!summary.is_empty());
            prop_assert_eq!(summary, summarize(&text, sentences));
        }

        #[test]
        fn normalizing_any_markup_never_panics(text in page_text()) {
            let html = format!("<html><head><title>{}</title></head><body><p>{}</p></body></html>", text, text);
            if let Some(normalized) = normalize_html(&html, today()) {
                prop_assert_eq!(normalized.lowercase, normalized.original.to_lowercase());
            }

            let document = Html::parse_document(&html);
            let first = resolve_publication_date(&document, &text, today());
            prop_assert!(!first.is_empty());
            prop_assert_eq!(first, resolve_publication_date(&document, &text, today()));
        }
    }
}
