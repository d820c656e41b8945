//! Crypto error types.

use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key bytes had the wrong length or encoding.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// Signature bytes had the wrong length or failed verification.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Hex input could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Password hashing or verification failed.
    #[error("password hashing error: {0}")]
    Password(String),
}
