//! Client configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default backend base URL.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Default deadline for a recommendation call in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL; endpoint paths are resolved relative to it.
    pub api_base: Url,
    /// Deadline for `POST /recommend`.
    pub timeout: Duration,
    /// Forwarded to the backend so it can remember this session's picks.
    pub session_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: parse_base(DEFAULT_API_BASE).expect("DEFAULT_API_BASE is a valid URL"),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            session_id: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `SMARTDINE_API_BASE`: backend base URL (default: "http://localhost:8000")
    /// - `SMARTDINE_TIMEOUT_MS`: request deadline in ms (default: 20000)
    /// - `SMARTDINE_SESSION_ID`: session key forwarded with each search
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            env::var("SMARTDINE_API_BASE").ok(),
            env::var("SMARTDINE_TIMEOUT_MS").ok(),
            env::var("SMARTDINE_SESSION_ID").ok(),
        )
    }

    /// Build a config from raw string values. Missing or unparsable timeouts
    /// fall back to the default; empty session ids count as unset.
    pub fn from_parts(
        api_base: Option<String>,
        timeout_ms: Option<String>,
        session_id: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_base = parse_base(api_base.as_deref().unwrap_or(DEFAULT_API_BASE))?;

        let timeout_ms = timeout_ms
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let session_id = session_id.filter(|s| !s.trim().is_empty());

        Ok(Self {
            api_base,
            timeout: Duration::from_millis(timeout_ms),
            session_id,
        })
    }

    /// Replace the base URL.
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self, ConfigError> {
        self.api_base = parse_base(api_base)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Resolve an endpoint such as `"recommend"` against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_base.join(path.trim_start_matches('/'))
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins append
/// instead of replacing the last path segment.
fn parse_base(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_parts(None, None, None).unwrap();
        assert_eq!(config.api_base.as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.session_id, None);
    }

    #[test]
    fn test_endpoint_appends_to_base_path() {
        let config =
            ClientConfig::from_parts(Some("https://food.example.com/api".to_string()), None, None)
                .unwrap();
        assert_eq!(
            config.endpoint("/recommend").unwrap().as_str(),
            "https://food.example.com/api/recommend"
        );
        assert_eq!(
            config.endpoint("cities").unwrap().as_str(),
            "https://food.example.com/api/cities"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ClientConfig::from_parts(Some("not a url".to_string()), None, None);
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));

        let result = ClientConfig::from_parts(Some("mailto:chef@example.com".to_string()), None, None);
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_timeout_parsing_falls_back() {
        let config = ClientConfig::from_parts(None, Some("1500".to_string()), None).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(1500));

        let config = ClientConfig::from_parts(None, Some("soon".to_string()), None).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));

        let config = ClientConfig::from_parts(None, Some("0".to_string()), None).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_blank_session_id_is_unset() {
        let config = ClientConfig::from_parts(None, None, Some("  ".to_string())).unwrap();
        assert_eq!(config.session_id, None);

        let config = ClientConfig::from_parts(None, None, Some("s-1".to_string())).unwrap();
        assert_eq!(config.session_id.as_deref(), Some("s-1"));
    }
}
