pub mod contract;
pub mod environment;
pub mod logging;
pub mod report;
pub mod saved_urls;
pub mod web;

pub const TARGET_WEB_REQUEST: &str = "web_request";

pub use contract::{process_html, process_page, ContractPageProcessor, ContractRecord, RawPage};
pub use web::{FetchError, HtmlFetcher, HttpFetcher};
