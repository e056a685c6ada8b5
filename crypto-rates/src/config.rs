use std::time::Duration;

/// Public CoinGecko API root.
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Upstream request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CoinGecko rejects requests without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Settings for the outbound price request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    /// API root, without trailing slash (e.g. "https://api.coingecko.com/api/v3")
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl UpstreamConfig {
    /// Create config with explicit base URL and timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            ..Self::default()
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
