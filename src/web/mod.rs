//! Page retrieval for the contract scanner.
//!
//! This module handles fetching pages over HTTP and walking a list of URLs
//! through the extraction pipeline.

mod client;
mod scanner;
mod types;
mod util;

pub use self::types::*;

pub use self::client::{create_http_client, HtmlFetcher, HttpFetcher};
pub use self::scanner::{ScanReport, Scanner};
pub use self::util::*;
