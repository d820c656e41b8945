//! Provisioner client error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors from the wallet-provisioning client.
#[derive(Debug, Error)]
pub enum ProvisionerError {
    /// Client configuration was invalid.
    #[error("provisioner configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid provisioner endpoint {endpoint}: {reason}")]
    InvalidEndpoint {
        /// The endpoint path that failed to resolve.
        endpoint: String,
        /// Why the URL join failed.
        reason: String,
    },

    /// The HTTP request failed before a response arrived.
    #[error("provisioner request to {endpoint} failed: {source}")]
    Http {
        /// The endpoint path that was called.
        endpoint: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The provisioner answered with a non-success status.
    #[error("provisioner returned status {status} for {endpoint}")]
    Status {
        /// The endpoint path that was called.
        endpoint: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("failed to decode provisioner response from {endpoint}: {source}")]
    Decode {
        /// The endpoint path that was called.
        endpoint: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display_names_endpoint() {
        let err = ProvisionerError::Status {
            endpoint: "api/v1/tenants/default/accounts/x/wallets".to_string(),
            status: 503,
        };
        let msg = format!("{err}");
        assert!(msg.contains("503"));
        assert!(msg.contains("wallets"));
    }

    #[test]
    fn config_error_converts() {
        let err = ProvisionerError::from(ConfigError::MissingUrl);
        assert!(format!("{err}").contains("PROVISIONER_URL"));
    }
}
