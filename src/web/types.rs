//! Type definitions for page retrieval.

use thiserror::Error;
use tokio::time::Duration;

/// Why a page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request to {url} timed out after {} seconds", .timeout.as_secs())]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

// Constants
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const REQUEST_DELAY: Duration = Duration::from_millis(500);

pub const STANDARD_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:138.0) Gecko/20100101 Firefox/138.0";
