use lazy_static::lazy_static;
use tracing::debug;

use super::patterns::{find_first_match, PatternRule};
use super::TARGET_EXTRACT;

// Dollar sign, optional spacing, then a number with optional comma thousands
// separators and an optional decimal fraction.
const AMOUNT: &str = r"\$\s*(\d+(?:,\d{3})*(?:\.\d+)?)";

// Raw-dollar amounts must end cleanly: whitespace, punctuation or end of text,
// never a letter such as the "bn" in "$1.5bn".
const RAW_END: &str = r"(?:[^\w.,]|[.,](?:\s|$)|$)";

lazy_static! {
    static ref CURRENCY_RULES: Vec<PatternRule<f64>> = vec![
        PatternRule::new("million", &format!(r"(?i){AMOUNT}\s*million"), millions),
        PatternRule::new("m", &format!(r"(?i){AMOUNT}\s*m\b"), millions),
        PatternRule::new("billion", &format!(r"(?i){AMOUNT}\s*billion"), billions),
        PatternRule::new("b", &format!(r"(?i){AMOUNT}\s*b\b"), billions),
        PatternRule::new("thousand", &format!(r"(?i){AMOUNT}\s*thousand"), thousands),
        PatternRule::new("k", &format!(r"(?i){AMOUNT}\s*k\b"), thousands),
        PatternRule::new("worth", &format!(r"(?i)worth\s+{AMOUNT}{RAW_END}"), dollars),
        PatternRule::new("value of", &format!(r"(?i)value\s+of\s+{AMOUNT}{RAW_END}"), dollars),
        PatternRule::new("contract for", &format!(r"(?i)contract\s+for\s+{AMOUNT}{RAW_END}"), dollars),
        // Last resort: a dollar amount with no unit at all is raw dollars
        PatternRule::new("bare dollars", &format!(r"(?i){AMOUNT}{RAW_END}"), dollars),
    ];
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

fn millions(raw: &str) -> Option<f64> {
    parse_amount(raw)
}

fn billions(raw: &str) -> Option<f64> {
    parse_amount(raw).map(|v| v * 1000.0)
}

fn thousands(raw: &str) -> Option<f64> {
    parse_amount(raw).map(|v| v / 1000.0)
}

fn dollars(raw: &str) -> Option<f64> {
    parse_amount(raw).map(|v| v / 1_000_000.0)
}

/// Extract the contract value in USD millions from lowercase page text.
pub fn extract_currency(text: &str) -> Option<f64> {
    let (rule, value) = find_first_match(&CURRENCY_RULES, text)?;
    debug!(target: TARGET_EXTRACT, "Currency matched '{}' rule: {} USD millions", rule, value);
    Some(value)
}
