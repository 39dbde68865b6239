//! Client configuration

use validator::Validate;

use crate::auth::AuthClient;
use crate::backend::RestTableClient;
use crate::error::{ClientError, ClientResult};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the hosted data service
#[derive(Debug, Clone, Validate)]
pub struct ClientConfig {
    /// Project base URL (e.g., "https://campus.example.org")
    #[validate(url)]
    pub base_url: String,

    /// Public (anon) API key sent with every request
    #[validate(length(min = 1))]
    pub anon_key: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from `CRMS_BACKEND_URL`, `CRMS_ANON_KEY` and `CRMS_TIMEOUT_SECS`
    pub fn from_env() -> ClientResult<Self> {
        let base_url = std::env::var("CRMS_BACKEND_URL")
            .map_err(|_| ClientError::Config("CRMS_BACKEND_URL is not set".into()))?;
        let anon_key = std::env::var("CRMS_ANON_KEY")
            .map_err(|_| ClientError::Config("CRMS_ANON_KEY is not set".into()))?;
        let timeout = std::env::var("CRMS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(base_url, anon_key).with_timeout(timeout).validated()
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Check field constraints, returning the config unchanged when valid
    pub fn validated(self) -> ClientResult<Self> {
        self.validate()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(self)
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Create the table client for this configuration
    pub fn build_table_client(&self) -> ClientResult<RestTableClient> {
        RestTableClient::new(self)
    }

    /// Create the auth client for this configuration
    pub fn build_auth_client(&self) -> ClientResult<AuthClient> {
        AuthClient::new(self)
    }
}
