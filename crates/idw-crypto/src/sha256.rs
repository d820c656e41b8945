//! SHA-256 digest helpers.

use sha2::{Digest, Sha256};

use crate::ed25519::hex_encode;

/// Compute the SHA-256 digest of the input, hex-encoded.
pub fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex_encode(&hasher.finalize())
}
