use crate::error::{Error, Result};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Vendor host used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://api.elasticemail.com";

/// API version used when none is configured
pub const DEFAULT_API_VERSION: u32 = 2;

/// Builder for the default HTTP client, pooling and connect timeout set.
///
/// No overall request timeout is configured: a call only gives up when its
/// [`CancelToken`](crate::CancelToken) fires.
pub fn http_client_builder() -> ClientBuilder {
    Client::builder()
        .pool_max_idle_per_host(50)
        .connect_timeout(Duration::from_secs(10))
}

/// Create the default HTTP client for API requests
pub fn create_http_client() -> Result<Client> {
    http_client_builder()
        .build()
        .map_err(|e| Error::Configuration(format!("failed to create HTTP client: {}", e)))
}

/// Configuration for the API client.
///
/// Immutable once handed to [`Client::new`](crate::Client::new).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL, must be https
    pub base_url: String,
    /// Default API key, sent as `apikey`
    pub api_key: String,
    /// Selects the `v{N}` path segment
    pub api_version: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            api_version: DEFAULT_API_VERSION,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl Config {
    /// Create a configuration for the default host with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            ..Config::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API version
    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    /// Check the configuration and fill in defaults for blank values.
    ///
    /// An empty base URL falls back to [`DEFAULT_BASE_URL`], a zero version
    /// to [`DEFAULT_API_VERSION`]. Anything not using https is rejected.
    pub fn validate(mut self) -> Result<Self> {
        if self.base_url.is_empty() {
            self.base_url = DEFAULT_BASE_URL.to_string();
        }
        if self.api_version == 0 {
            self.api_version = DEFAULT_API_VERSION;
        }

        let parsed = Url::parse(&self.base_url)
            .map_err(|e| Error::Configuration(format!("invalid base url {:?}: {}", self.base_url, e)))?;
        if parsed.scheme() != "https" {
            return Err(Error::Configuration("API base url must be https".to_string()));
        }

        let trimmed = self.base_url.trim_end_matches('/').len();
        self.base_url.truncate(trimmed);
        Ok(self)
    }

    /// Get the versioned root every endpoint path is appended to
    pub fn versioned_url(&self) -> String {
        format!("{}/v{}", self.base_url, self.api_version)
    }
}
