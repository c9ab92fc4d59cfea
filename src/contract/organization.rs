use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::TARGET_EXTRACT;

pub const MAX_ORGANIZATIONS: usize = 5;
const MIN_NAME_LENGTH: usize = 6;

// Longer suffixes come first so "Corporation" is not cut to "Corp".
const SUFFIXES: &str =
    "Corporation|Corp|Company|Co|Inc|Limited|Ltd|LLC|Group|Solutions|Systems|Technologies|Services";

// One or more capitalized words (or a bare ampersand) before the suffix.
const NAME_WORDS: &str = r"(?:[A-Z][a-zA-Z&]*|&)(?:\s+(?:[A-Z][a-zA-Z&]*|&))*";

lazy_static! {
    static ref ORG_PATTERNS: Vec<Regex> = vec![
        // Suffix with an optional trailing period
        Regex::new(&format!(r"\b({NAME_WORDS}\s+(?:{SUFFIXES})\.?)\b"))
            .expect("organization pattern with period"),
        // Suffix without period
        Regex::new(&format!(r"\b({NAME_WORDS}\s+(?:{SUFFIXES}))\b"))
            .expect("organization pattern"),
    ];
}

/// Extract up to five organization names from original-case text, in order of
/// appearance, without duplicates.
pub fn extract_organizations(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = Vec::new();
    for pattern in ORG_PATTERNS.iter() {
        for captures in pattern.captures_iter(text) {
            if let Some(m) = captures.get(1) {
                found.push((m.start(), m.as_str().trim()));
            }
        }
    }
    // Stable, so equal positions keep pattern order
    found.sort_by_key(|(start, _)| *start);

    let mut organizations: Vec<String> = Vec::new();
    for (_, name) in found {
        if name.chars().count() < MIN_NAME_LENGTH {
            continue;
        }
        if organizations.iter().any(|existing| existing == name) {
            continue;
        }
        organizations.push(name.to_string());
        if organizations.len() == MAX_ORGANIZATIONS {
            break;
        }
    }

    debug!(target: TARGET_EXTRACT, "Found organizations: {:?}", organizations);
    organizations
}

/// Positional vendor/client guess: the first organization mentioned is taken
/// as the vendor, the second as the client.
pub fn assign_parties(organizations: &[String]) -> (Option<String>, Option<String>) {
    (organizations.first().cloned(), organizations.get(1).cloned())
}
