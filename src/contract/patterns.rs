//! Ordered regex cascades.
//!
//! The currency and duration extractors are both a fixed list of patterns
//! tried in priority order, where the first pattern that matches anywhere in
//! the text decides the result. Each rule pairs a compiled pattern with the
//! function that turns its first capture into a value.

use regex::Regex;

pub struct PatternRule<T> {
    pub name: &'static str,
    pub regex: Regex,
    pub convert: fn(&str) -> Option<T>,
}

impl<T> PatternRule<T> {
    /// Compile a rule from a literal pattern.
    ///
    /// Only ever called with patterns written in this crate, so a failure to
    /// compile is a programming error.
    pub fn new(name: &'static str, pattern: &str, convert: fn(&str) -> Option<T>) -> Self {
        PatternRule {
            name,
            regex: Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid pattern for rule '{}': {}", name, e)),
            convert,
        }
    }

    /// Apply the rule to the first match of its pattern in `text`.
    pub fn first_match(&self, text: &str) -> Option<(&'static str, Option<T>)> {
        let captures = self.regex.captures(text)?;
        let group = captures.get(1).or_else(|| captures.get(0))?;
        Some((self.name, (self.convert)(group.as_str())))
    }
}

/// Walk `rules` in order and convert the first match of the first rule that
/// matches anywhere in `text`. Later rules are never consulted once an earlier
/// one matches, even if the conversion of that match fails.
pub fn find_first_match<T>(rules: &[PatternRule<T>], text: &str) -> Option<(&'static str, T)> {
    for rule in rules {
        if let Some((name, value)) = rule.first_match(text) {
            return value.map(|v| (name, v));
        }
    }
    None
}
