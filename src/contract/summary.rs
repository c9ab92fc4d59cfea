use lazy_static::lazy_static;
use regex::Regex;

use super::types::NO_SUMMARY;

pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;

const MIN_SENTENCE_CHARS: usize = 20;
const MAX_SCORED_SENTENCES: usize = 10;
const MAX_SUMMARY_CHARS: usize = 500;
const ELLIPSIS: &str = "...";

const SUMMARY_KEYWORDS: &[&str] = &[
    "contract",
    "agreement",
    "award",
    "million",
    "services",
    "company",
    "announced",
];

lazy_static! {
    static ref SENTENCE_BREAK: Regex = Regex::new(r"[.!?]+").expect("sentence break pattern");
}

/// Number of keyword occurrences in a sentence, case-insensitively.
fn keyword_score(sentence: &str) -> usize {
    let lowered = sentence.to_lowercase();
    SUMMARY_KEYWORDS
        .iter()
        .map(|keyword| lowered.matches(keyword).count())
        .sum()
}

/// Build an extractive summary of at most `max_sentences` sentences from the
/// original-case page text.
pub fn summarize(text: &str, max_sentences: usize) -> String {
    let sentences: Vec<&str> = SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
        .collect();

    if sentences.is_empty() {
        return NO_SUMMARY.to_string();
    }

    let mut scored: Vec<(usize, &str)> = sentences
        .into_iter()
        .take(MAX_SCORED_SENTENCES)
        .map(|s| (keyword_score(s), s))
        .collect();
    // sort_by is stable, so ties keep their order in the page
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let summary = scored
        .iter()
        .take(max_sentences)
        .map(|(_, s)| *s)
        .collect::<Vec<_>>()
        .join(". ");

    if summary.is_empty() {
        return NO_SUMMARY.to_string();
    }

    if summary.chars().count() > MAX_SUMMARY_CHARS {
        let truncated: String = summary.chars().take(MAX_SUMMARY_CHARS).collect();
        return format!("{}{}", truncated, ELLIPSIS);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_sentences_rank_first() {
        let text = "The weather in the city was mild all week. \
                    Acme announced a contract award worth millions today! \
                    Local teams played several games over the weekend. \
                    The agreement covers managed services for the company.";
        let summary = summarize(text, 2);
        assert_eq!(
            summary,
            "Acme announced a contract award worth millions today. \
             The agreement covers managed services for the company"
        );
    }

    #[test]
    fn test_ties_keep_page_order() {
        let text = "First plain sentence without keywords. \
                    Second plain sentence without keywords. \
                    Third plain sentence without keywords.";
        assert_eq!(
            summarize(text, 2),
            "First plain sentence without keywords. Second plain sentence without keywords"
        );
    }

    #[test]
    fn test_short_fragments_dropped() {
        let text = "Home. News. Menu! The agency signed a contract for support?";
        assert_eq!(summarize(text, 3), "The agency signed a contract for support");
    }

    #[test]
    fn test_only_first_ten_sentences_scored() {
        let mut text = String::new();
        for i in 0..10 {
            text.push_str(&format!("Filler sentence number {} of the page. ", i));
        }
        text.push_str("This contract contract contract sentence comes too late.");
        let summary = summarize(&text, 1);
        assert_eq!(summary, "Filler sentence number 0 of the page");
    }

    #[test]
    fn test_no_summary_available() {
        assert_eq!(summarize("", 3), NO_SUMMARY);
        assert_eq!(summarize("Too short. Also short!", 3), NO_SUMMARY);
        assert_eq!(summarize("A sentence that is long enough.", 0), NO_SUMMARY);
    }

    #[test]
    fn test_length_is_capped() {
        let long_sentence = format!("Contract {}", "x".repeat(600));
        let summary = summarize(&long_sentence, 3);
        assert_eq!(summary.chars().count(), MAX_SUMMARY_CHARS + ELLIPSIS.len());
        assert!(summary.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_length_is_capped_for_multibyte_text() {
        let sentence = format!("Le contrat {} signé", "é日".repeat(300));
        let summary = summarize(&format!("{sentence}. {sentence}. {sentence}."), 3);
        assert_eq!(summary.chars().count(), MAX_SUMMARY_CHARS + ELLIPSIS.len());
        assert!(summary.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_idempotent() {
        let text = "The company announced a services contract today. \
                    Nothing else of note happened this week at all.";
        assert_eq!(summarize(text, 3), summarize(text, 3));
    }

    #[test]
    fn test_keyword_score_counts_occurrences() {
        assert_eq!(keyword_score("Contract and CONTRACT plus an Award"), 3);
        assert_eq!(keyword_score("nothing relevant"), 0);
        // "awarded" contains "award"
        assert_eq!(keyword_score("services awarded"), 2);
    }
}
