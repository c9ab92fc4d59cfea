use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use scraper::{Html, Node, Selector};
use tracing::debug;

use super::date::resolve_publication_date;
use super::types::{NormalizedText, RawPage, NO_TITLE};
use super::TARGET_EXTRACT;

lazy_static! {
    static ref TITLE_SELECTOR: Selector = Selector::parse("title").expect("title selector");
}

// Elements whose content never counts as page text
const HIDDEN_ELEMENTS: &[&str] = &["script", "style"];

/// Decode raw page bytes into a string.
///
/// Uses the charset declared in the Content-Type header when it is known,
/// then UTF-8, then Windows-1252 as a lossy last resort.
pub fn decode_body(page: &RawPage) -> String {
    if let Some(charset) = page
        .content_type
        .as_deref()
        .and_then(|ct| {
            ct.split(';')
                .find(|part| part.trim().to_lowercase().starts_with("charset="))
        })
        .and_then(|part| part.split('=').nth(1))
    {
        let charset = charset.trim().trim_matches('"');
        if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
            let (decoded, _, had_errors) = encoding.decode(&page.html);
            if had_errors {
                debug!(target: TARGET_EXTRACT, "Decoding {} as {} replaced invalid bytes", page.source_url, charset);
            }
            return decoded.into_owned();
        }
        debug!(target: TARGET_EXTRACT, "Unknown charset '{}' for {}", charset, page.source_url);
    }

    match std::str::from_utf8(&page.html) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!(target: TARGET_EXTRACT, "Body of {} is not UTF-8, falling back to windows-1252", page.source_url);
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&page.html);
            decoded.into_owned()
        }
    }
}

/// Normalize a fetched page, dating it today if nothing better is found.
pub fn normalize_page(page: &RawPage) -> Option<NormalizedText> {
    normalize_html(&decode_body(page), Local::now().date_naive())
}

/// Turn an HTML document into cleaned text. Returns `None` when the page has
/// no text at all.
pub fn normalize_html(html: &str, today: NaiveDate) -> Option<NormalizedText> {
    let document = Html::parse_document(html);

    let original = collapse_whitespace(&visible_text(&document));
    if original.is_empty() {
        return None;
    }

    let title = page_title(&document);
    let publication_date = resolve_publication_date(&document, &original, today);

    Some(NormalizedText {
        lowercase: original.to_lowercase(),
        original,
        title,
        publication_date,
    })
}

/// Concatenate every text node that is not inside a script or style element.
fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.tree.root().descendants() {
        if let Node::Text(fragment) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map_or(false, |el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                text.push_str(fragment);
            }
        }
    }
    text
}

fn page_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Trim every line, break lines apart on runs of two or more spaces, drop empty
/// pieces and join what is left with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        // Remaining tabs and single-space runs inside a fragment
        .map(|fragment| fragment.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(" ")
}
