use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// One entry of the saved URL list. Entries are unique by `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedUrlEntry {
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "addedAt")]
    pub added_at: String,
}

impl SavedUrlEntry {
    /// Create an entry stamped with the current UTC time.
    pub fn new(url: &str, description: &str) -> Self {
        Self::with_added_at(url, description, &now_timestamp())
    }

    pub fn with_added_at(url: &str, description: &str, added_at: &str) -> Self {
        SavedUrlEntry {
            url: url.trim().to_string(),
            description: description.trim().to_string(),
            added_at: added_at.to_string(),
        }
    }
}

/// RFC 3339 timestamp used for `addedAt`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed saved URL data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed CSV data: {0}")]
    Csv(String),

    #[error("not a valid http(s) URL: {0}")]
    InvalidUrl(String),
}
