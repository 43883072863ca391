//! Analyzer configuration
//!
//! Every knob that touches the network lives here and is passed explicitly
//! to the HTTP client and the registry adapter.

use std::time::Duration;

/// Public npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("techlag/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Network configuration injected into the analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Registry base URL, without trailing slash
    pub registry_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Retries for transport errors and HTTP 429
    pub max_retries: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl AnalyzerConfig {
    /// Set the registry base URL
    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.registry_url, "https://registry.npmjs.org");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("techlag/"));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_registry_url_trailing_slash_trimmed() {
        let config = AnalyzerConfig::default().with_registry_url("http://localhost:4873/");
        assert_eq!(config.registry_url, "http://localhost:4873");
    }

    #[test]
    fn test_builder_setters() {
        let config = AnalyzerConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_max_retries(0);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.max_retries, 0);
    }
}
