//! Client configuration parsed from environment variables.

use std::env;
use std::time::Duration;

use reqwest::Client;

/// Variable holding the backend base URL.
pub const BASE_URL_VAR: &str = "BASE_URL";
/// Variable holding the per-request timeout in seconds.
pub const TIMEOUT_VAR: &str = "TRASHIFY_TIMEOUT_SECS";
/// Timeout applied when [`TIMEOUT_VAR`] is unset or unparsable.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where and how to reach the backend.
pub struct ClientConfig {
    /// Base URL without trailing slash. Empty when unconfigured.
    pub base_url: String,
    /// Upper bound for one request, connect to last body byte.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Configuration for an explicit base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Parse configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Parse configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = normalize_base_url(lookup(BASE_URL_VAR).unwrap_or_default());

        let timeout = lookup(TIMEOUT_VAR)
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Self { base_url, timeout }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_base_url(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

/// Build the shared HTTP client.
///
/// # Errors
///
/// Returns a [`reqwest::Error`] when the TLS backend cannot be initialized.
pub fn http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent("trashify/0.1")
        .timeout(config.timeout)
        .build()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn unset_environment_gives_empty_base_url_and_default_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert!(config.base_url.is_empty());
    }

    #[test]
    fn base_url_loses_trailing_slashes() {
        let config =
            ClientConfig::from_lookup(lookup(&[(BASE_URL_VAR, " https://api.example.org/ ")]));
        assert_eq!(config.base_url, "https://api.example.org");
    }

    #[test]
    fn timeout_is_parsed_or_defaulted() {
        let config = ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "3")]));
        assert_eq!(config.timeout, Duration::from_secs(3));

        for bad in ["0", "soon", "-1"] {
            let config = ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, bad)]));
            assert_eq!(config.timeout, DEFAULT_TIMEOUT, "{bad} should fall back");
        }
    }
}
