//! Provisioner client configuration.
//!
//! Configures the base URL and credentials for the remote
//! wallet-provisioning service. Absent configuration is not an error at
//! this layer — the API server treats a missing `PROVISIONER_URL` as
//! "run in-process provisioning".

use url::Url;

/// Configuration for connecting to the wallet-provisioning service.
///
/// Custom `Debug` redacts the `api_token` field to prevent credential
/// leakage in log output.
#[derive(Clone)]
pub struct ProvisionerConfig {
    /// Base URL of the provisioning service.
    pub base_url: Url,
    /// Bearer token for API authentication.
    pub api_token: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProvisionerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionerConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProvisionerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PROVISIONER_URL` (required)
    /// - `PROVISIONER_API_TOKEN` (required)
    /// - `PROVISIONER_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("PROVISIONER_URL").map_err(|_| ConfigError::MissingUrl)?;
        let base_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl("PROVISIONER_URL".to_string(), e.to_string()))?;
        let api_token =
            std::env::var("PROVISIONER_API_TOKEN").map_err(|_| ConfigError::MissingToken)?;

        Ok(Self {
            base_url,
            api_token,
            timeout_secs: std::env::var("PROVISIONER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Create a configuration pointing at a local mock server (for tests).
    pub fn local_mock(base_url: &str, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl("local_mock".to_string(), e.to_string()))?,
            api_token: token.to_string(),
            timeout_secs: 5,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `PROVISIONER_URL` is not set.
    #[error("PROVISIONER_URL environment variable is required")]
    MissingUrl,
    /// `PROVISIONER_API_TOKEN` is not set.
    #[error("PROVISIONER_API_TOKEN environment variable is required")]
    MissingToken,
    /// A URL value could not be parsed.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
