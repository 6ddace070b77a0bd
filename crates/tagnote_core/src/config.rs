//! Client configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve the service base URL and optional request timeout.
//! - Reject malformed values before any request is built.
//!
//! # Invariants
//! - An unset or blank variable falls back to its default.
//! - No timeout is applied unless one is configured explicitly.

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the notes service base URL.
pub const BASE_URL_ENV: &str = "TAGNOTE_API_BASE_URL";
/// Environment variable holding the request timeout in milliseconds.
pub const TIMEOUT_MS_ENV: &str = "TAGNOTE_API_TIMEOUT_MS";
/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base url `{value}`: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
    #[error("invalid timeout `{0}`; expected a positive number of milliseconds")]
    InvalidTimeout(String),
}

/// Connection settings for `HttpNotesClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Builds a config for `base_url` with no timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolves configuration from `TAGNOTE_API_BASE_URL` and
    /// `TAGNOTE_API_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = non_blank(lookup(BASE_URL_ENV)).unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let mut config = Self::new(&base_url)?;
        if let Some(raw) = non_blank(lookup(TIMEOUT_MS_ENV)) {
            config.timeout = Some(parse_timeout(&raw)?);
        }
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value.trim()).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme `{other}`"))),
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be a base".to_string()));
    }
    Ok(url)
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidTimeout(value.to_string())),
        Ok(ms) => Ok(Duration::from_millis(ms)),
    }
}
