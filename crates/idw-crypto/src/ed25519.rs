//! # Ed25519 Signing and Verification
//!
//! Wraps `ed25519_dalek` with IDW Stack conventions: hex-encoded public
//! keys, 64-byte signatures, and no `Debug` exposure of private key
//! material. This is the key machinery behind locally provisioned
//! `did:key` identifiers and wallet-address ownership proofs.

use ed25519_dalek::{Signer, Verifier};
use rand_core::CryptoRngCore;

use crate::error::CryptoError;

/// An Ed25519 digital signature (64 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl Signature {
    /// Parse a signature from its 64-byte serialization.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 64] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!("expected 64 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(ed25519_dalek::Signature::from_bytes(&arr)))
    }

    /// Parse a signature from its 128-char hex serialization.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex_decode(hex)?;
        Self::from_bytes(&bytes)
    }

    /// Return the 64-byte serialization.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }

    /// Return the hex serialization.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.to_bytes())
    }
}

/// An Ed25519 signing (private) key.
///
/// No `Clone` and no `Debug` of key bytes: private key material is not
/// casually duplicated or logged. The inner dalek key zeroizes on drop.
pub struct SigningKey {
    inner: ed25519_dalek::SigningKey,
}

impl SigningKey {
    /// Generate a fresh signing key from a cryptographic RNG.
    pub fn generate(rng: &mut impl CryptoRngCore) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::generate(rng),
        }
    }

    /// Reconstruct a signing key from its 32 secret bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::from_bytes(bytes),
        }
    }

    /// Return the 32 secret bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.inner.sign(message))
    }

    /// Derive the corresponding verifying (public) key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            inner: self.inner.verifying_key(),
        }
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"[REDACTED]")
            .field("public", &self.verifying_key().to_hex())
            .finish()
    }
}

/// An Ed25519 verifying (public) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    inner: ed25519_dalek::VerifyingKey,
}

impl VerifyingKey {
    /// Parse a verifying key from its 32-byte serialization.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        let inner = ed25519_dalek::VerifyingKey::from_bytes(&arr)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parse a verifying key from its 64-char hex serialization.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex_decode(hex)?;
        Self::from_bytes(&bytes)
    }

    /// Return the 32-byte serialization.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }

    /// Return the hex serialization.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.to_bytes())
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        self.inner
            .verify(message, &signature.0)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Hex codecs
// ---------------------------------------------------------------------------

/// Encode bytes as lowercase hex.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string into bytes.
pub fn hex_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    let s = s.trim();
    if s.len() % 2 != 0 {
        return Err(CryptoError::InvalidHex(format!(
            "odd length: {}",
            s.len()
        )));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|e| CryptoError::InvalidHex(format!("at position {i}: {e}")))
        })
        .collect()
}
