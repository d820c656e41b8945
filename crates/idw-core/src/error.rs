//! # Error Hierarchy
//!
//! Structured error types for the IDW Stack, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Each subsystem defines specific error variants carrying diagnostic
//! context: the input that failed and the expected shape, so operators can
//! diagnose misconfiguration without guesswork.

use thiserror::Error;

/// Top-level error type for the IDW Stack.
#[derive(Error, Debug)]
pub enum IdwError {
    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Email address does not have the `local@domain.tld` shape.
    #[error("invalid email address: \"{0}\"")]
    InvalidEmail(String),

    /// Wallet address is not `0x` followed by 40 hex characters.
    #[error("invalid wallet address: \"{0}\" (expected 0x-prefixed 40-hex string)")]
    InvalidAddress(String),

    /// DID does not conform to W3C DID syntax (did:method:identifier).
    #[error("invalid DID format: \"{0}\" (expected did:<method>:<identifier>)")]
    InvalidDid(String),

    /// Tenant label contains interior whitespace.
    #[error("invalid tenant label: \"{0}\" (whitespace not permitted)")]
    InvalidTenant(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_invalid_email_display() {
        let err = ValidationError::InvalidEmail("nope".to_string());
        assert!(format!("{err}").contains("nope"));
    }

    #[test]
    fn validation_error_invalid_address_display() {
        let err = ValidationError::InvalidAddress("0x12".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("0x12"));
        assert!(msg.contains("40-hex"));
    }

    #[test]
    fn validation_error_invalid_did_display() {
        let err = ValidationError::InvalidDid("bad:did".to_string());
        assert!(format!("{err}").contains("bad:did"));
    }

    #[test]
    fn idw_error_wraps_validation() {
        let err = IdwError::from(ValidationError::InvalidTenant("a b".to_string()));
        assert!(format!("{err}").contains("validation error"));
    }

    #[test]
    fn idw_error_wraps_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = IdwError::from(json_err);
        assert!(format!("{err}").contains("JSON error"));
    }
}
