//! Account request types.
//!
//! Registration and authentication share one closed, tagged request
//! union: the `type` field selects the credential strategy. The variant
//! set is fixed at compile time — adding a strategy means adding a
//! variant here and a matching arm in the orchestrator.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registration or authentication request, tagged by credential kind.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountRequest {
    /// Email + password credentials.
    Email(EmailAccountRequest),
    /// Wallet-address credentials with a signed challenge.
    Address(AddressAccountRequest),
}

impl AccountRequest {
    /// The friendly display name carried by the request, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Email(r) => r.name.as_deref(),
            Self::Address(r) => r.name.as_deref(),
        }
    }

    /// The raw login identifier (email or address) as submitted.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Email(r) => &r.email,
            Self::Address(r) => &r.address,
        }
    }
}

/// Email-credential request payload.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailAccountRequest {
    /// Optional friendly display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Login email address.
    pub email: String,
    /// Plaintext password; hashed before storage, never logged.
    pub password: String,
}

impl std::fmt::Debug for EmailAccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailAccountRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Wallet-address-credential request payload.
///
/// The caller proves control of the address by signing `challenge` with
/// the key behind `public_key`; the address must be derived from that
/// key. No password is involved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressAccountRequest {
    /// Optional friendly display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The wallet address being claimed (`0x` + 40 hex).
    pub address: String,
    /// Hex-encoded Ed25519 public key the address derives from.
    pub public_key: String,
    /// The challenge string that was signed.
    pub challenge: String,
    /// Hex-encoded Ed25519 signature over the challenge bytes.
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_request_deserializes_from_tagged_json() {
        let json = serde_json::json!({
            "type": "email",
            "name": "Holder",
            "email": "holder@example.com",
            "password": "hunter2-but-longer"
        });
        let request: AccountRequest = serde_json::from_value(json).unwrap();
        match &request {
            AccountRequest::Email(r) => {
                assert_eq!(r.email, "holder@example.com");
                assert_eq!(request.name(), Some("Holder"));
            }
            other => panic!("expected email variant, got: {other:?}"),
        }
    }

    #[test]
    fn address_request_deserializes_from_tagged_json() {
        let json = serde_json::json!({
            "type": "address",
            "address": "0x0000000000000000000000000000000000000001",
            "public_key": "aa",
            "challenge": "c",
            "signature": "bb"
        });
        let request: AccountRequest = serde_json::from_value(json).unwrap();
        assert!(matches!(request, AccountRequest::Address(_)));
        assert!(request.name().is_none());
        assert_eq!(
            request.identifier(),
            "0x0000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let json = serde_json::json!({ "type": "oauth", "token": "x" });
        assert!(serde_json::from_value::<AccountRequest>(json).is_err());
    }

    #[test]
    fn email_request_debug_redacts_password() {
        let request = EmailAccountRequest {
            name: None,
            email: "holder@example.com".to_string(),
            password: "super-secret".to_string(),
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}
