//! HTTP client creation and request handling for contract pages.

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::cookie::Jar;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

use super::types::{FetchError, BROWSER_USER_AGENT, REQUEST_TIMEOUT, STANDARD_USER_AGENT};
use super::util::is_valid_url;
use crate::contract::RawPage;
use crate::TARGET_WEB_REQUEST;

/// Source of raw page HTML.
///
/// The extraction pipeline only depends on this trait, so pages can come from
/// the network, from disk or from memory.
pub trait HtmlFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<RawPage, FetchError>>;
}

/// Headers sent with every request of a client. Browser emulation adds the
/// navigation headers a desktop Firefox sends.
pub fn default_headers(browser_emulation: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if browser_emulation {
        headers.insert(header::USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
        headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    } else {
        headers.insert(header::USER_AGENT, HeaderValue::from_static(STANDARD_USER_AGENT));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
    }
    headers
}

/// Create a client with either standard or browser emulation settings
pub fn create_http_client(browser_emulation: bool) -> Result<reqwest::Client, FetchError> {
    let cookie_store = Jar::default();
    let builder = reqwest::Client::builder()
        .cookie_store(true)
        .cookie_provider(Arc::new(cookie_store))
        .default_headers(default_headers(browser_emulation))
        .gzip(true)
        .brotli(true)
        .redirect(reqwest::redirect::Policy::default());

    if browser_emulation {
        debug!(target: TARGET_WEB_REQUEST, "Creating browser emulation HTTP client");
    } else {
        debug!(target: TARGET_WEB_REQUEST, "Creating standard HTTP client");
    }

    Ok(builder.build()?)
}

/// Fetches pages over HTTP, retrying once with browser-like headers when the
/// plain request is refused or fails.
pub struct HttpFetcher {
    standard: reqwest::Client,
    browser: reqwest::Client,
    request_timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(HttpFetcher {
            standard: create_http_client(false)?,
            browser: create_http_client(true)?,
            request_timeout: REQUEST_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    async fn send(&self, url: &str, request: reqwest::RequestBuilder) -> Result<RawPage, FetchError> {
        let response = match timeout(self.request_timeout, request.send()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                    timeout: self.request_timeout,
                })
            }
        };

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|s| s.to_lowercase());

        let bytes = match timeout(self.request_timeout, response.bytes()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                    timeout: self.request_timeout,
                })
            }
        };

        debug!(target: TARGET_WEB_REQUEST, "Read {} bytes from {} ({:?})", bytes.len(), url, content_type);

        Ok(RawPage {
            source_url: url.to_string(),
            html: bytes.to_vec(),
            content_type,
        })
    }
}

impl HtmlFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        if !is_valid_url(url) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        debug!(target: TARGET_WEB_REQUEST, "Attempting standard request to {}", url);
        let standard = self.standard.get(url);

        let standard_err = match self.send(url, standard).await {
            Ok(page) => return Ok(page),
            Err(err) => err,
        };

        debug!(target: TARGET_WEB_REQUEST, "Standard request to {} failed ({}), trying browser emulation", url, standard_err);

        let browser = self.browser.get(url);

        let page = self.send(url, browser).await?;
        info!(target: TARGET_WEB_REQUEST, "Browser emulation request to {} succeeded", url);
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_headers() {
        let headers = default_headers(false);
        assert_eq!(headers.get(header::USER_AGENT).unwrap(), STANDARD_USER_AGENT);
        assert!(headers.get(header::ACCEPT_LANGUAGE).is_none());
        assert!(headers.get("Sec-Fetch-Mode").is_none());
    }

    #[test]
    fn test_browser_emulation_headers() {
        let headers = default_headers(true);
        assert_eq!(headers.get(header::USER_AGENT).unwrap(), BROWSER_USER_AGENT);
        assert_eq!(headers.get(header::ACCEPT_LANGUAGE).unwrap(), "en-US,en;q=0.5");
        assert_eq!(headers.get("Sec-Fetch-Mode").unwrap(), "navigate");
        assert_ne!(default_headers(true), default_headers(false));
    }

    #[test]
    fn test_clients_build() {
        assert!(create_http_client(false).is_ok());
        assert!(create_http_client(true).is_ok());
    }
}
