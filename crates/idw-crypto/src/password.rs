//! # Password Hashing
//!
//! Argon2id hashing for email-credential secrets. Hashes are stored in
//! PHC string format, which embeds the salt and parameters, so
//! verification needs only the stored string.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;

use crate::error::CryptoError;

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns the PHC-format hash string (`$argon2id$...`).
pub fn hash_password(password: &str) -> Result<String, CryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| CryptoError::Password(e.to_string()))
}

/// Verify a password against a stored PHC-format hash.
///
/// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch, and `Err`
/// only when the stored hash itself is malformed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, CryptoError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| CryptoError::Password(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CryptoError::Password(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("hunter2-but-longer").unwrap();
        assert!(verify_password("hunter2-but-longer", &hash).unwrap());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(!verify_password("Tr0ub4dor&3", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_uses_argon2id() {
        let hash = hash_password("pw").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-phc-string").is_err());
    }
}
