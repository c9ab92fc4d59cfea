use lazy_static::lazy_static;
use tracing::debug;

use super::patterns::{find_first_match, PatternRule};
use super::TARGET_EXTRACT;

lazy_static! {
    // The generic "N years" / "N months" rules are tried before
    // the "duration of" / "term of" phrasings.
    static ref DURATION_RULES: Vec<PatternRule<u32>> = vec![
        PatternRule::new("years", r"(?i)(\d+)\s*years?", years),
        PatternRule::new("months", r"(?i)(\d+)\s*months?", months),
        PatternRule::new("duration of years", r"(?i)duration\s+of\s+(\d+)\s*years?", years),
        PatternRule::new("duration of months", r"(?i)duration\s+of\s+(\d+)\s*months?", months),
        PatternRule::new("term of years", r"(?i)term\s+of\s+(\d+)\s*years?", years),
        PatternRule::new("term of months", r"(?i)term\s+of\s+(\d+)\s*months?", months),
        PatternRule::new("n-year", r"(?i)(\d+)-year", years),
        PatternRule::new("n-month", r"(?i)(\d+)-month", months),
    ];
}

fn years(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok()?.checked_mul(12)
}

fn months(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok()
}

/// Extract the contract duration in months from lowercase page text.
pub fn extract_duration(text: &str) -> Option<u32> {
    let (rule, months) = find_first_match(&DURATION_RULES, text)?;
    debug!(target: TARGET_EXTRACT, "Duration matched '{}' rule: {} months", rule, months);
    Some(months)
}
