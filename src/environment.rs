use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::time::Duration;
use tracing::warn;

use crate::contract::summary::DEFAULT_SUMMARY_SENTENCES;
use crate::web::{REQUEST_DELAY, REQUEST_TIMEOUT};

/// Retrieves an environment variable and splits it into a vector of strings based on a delimiter.
///
/// Empty entries are dropped, so an unset variable yields an empty vector.
pub fn get_env_var_as_vec(var: &str, delimiter: char) -> Vec<String> {
    env::var(var)
        .unwrap_or_default()
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Reads a numeric environment variable, falling back to `default` when it is
/// unset or cannot be parsed.
pub fn get_env_var_as<T>(var: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => parse_or_default(var, &raw, default),
        Err(_) => default,
    }
}

fn parse_or_default<T>(var: &str, raw: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!("Invalid value '{}' for {}, using default {}", raw, var, default);
            default
        }
    }
}

/// Log directory from `SCOUT_LOG_DIR`. Read on its own so logging can be set
/// up before the rest of the settings are parsed.
pub fn log_dir_from_env() -> String {
    env::var("SCOUT_LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string())
}

const DEFAULT_LOG_DIR: &str = "logs";

/// Runtime settings for the scanner and the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub urls: Vec<String>,
    pub saved_urls_path: PathBuf,
    pub request_delay: Duration,
    pub request_timeout: Duration,
    pub summary_sentences: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            urls: Vec::new(),
            saved_urls_path: PathBuf::from("saved_urls.json"),
            request_delay: REQUEST_DELAY,
            request_timeout: REQUEST_TIMEOUT,
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
        }
    }
}

impl Settings {
    /// Load settings from `SCOUT_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Settings::default();
        Settings {
            urls: get_env_var_as_vec("SCOUT_URLS", ';'),
            saved_urls_path: env::var("SCOUT_SAVED_URLS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.saved_urls_path),
            request_delay: Duration::from_millis(get_env_var_as(
                "SCOUT_REQUEST_DELAY_MS",
                defaults.request_delay.as_millis() as u64,
            )),
            request_timeout: Duration::from_secs(get_env_var_as(
                "SCOUT_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            summary_sentences: get_env_var_as("SCOUT_SUMMARY_SENTENCES", defaults.summary_sentences),
        }
    }
}
