//! Client configuration

use std::time::Duration;

/// Default interval between poll fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Client configuration for connecting to the platform API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Bearer token for authenticated endpoints
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Interval between poll fetches for live views
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Reads `FOODIE_API_URL`, `FOODIE_API_TOKEN`, `FOODIE_API_TIMEOUT`
    /// (seconds) and `FOODIE_POLL_INTERVAL` (seconds).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("FOODIE_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        let mut config = Self::new(base_url);

        if let Ok(token) = std::env::var("FOODIE_API_TOKEN") {
            config.token = Some(token);
        }
        if let Some(timeout) = std::env::var("FOODIE_API_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Some(secs) = std::env::var("FOODIE_POLL_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.poll_interval = Duration::from_secs(secs);
        }

        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> super::HttpClient {
        super::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}
