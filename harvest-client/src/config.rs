//! Client configuration

use crate::{ClientResult, NetworkHttpClient};

/// Default moderation backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:3210";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the moderation backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HARVEST_API_URL | http://localhost:3210 | Backend base URL |
/// | HARVEST_DOCS_URL | same as API URL | Base path of uploaded user documents |
/// | HARVEST_API_TOKEN | unset | Bearer token sent with every request |
/// | HARVEST_TIMEOUT_SECS | 30 | Request timeout |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3210")
    pub base_url: String,

    /// Base path prepended to `user_docs`; falls back to `base_url`
    pub docs_base_url: Option<String>,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            docs_base_url: None,
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from the process environment
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_empty("HARVEST_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            docs_base_url: non_empty("HARVEST_DOCS_URL"),
            token: non_empty("HARVEST_API_TOKEN"),
            timeout: non_empty("HARVEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the document base path
    pub fn with_docs_base_url(mut self, url: impl Into<String>) -> Self {
        self.docs_base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Base path used to resolve user documents
    pub fn docs_base_url(&self) -> &str {
        self.docs_base_url.as_deref().unwrap_or(&self.base_url)
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
