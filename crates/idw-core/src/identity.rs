//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the IDW Stack.
//! Each identifier is a distinct type — you cannot pass a [`WalletId`]
//! where an [`AccountId`] is expected.
//!
//! ## Validation
//!
//! String-based primitives ([`EmailAddress`], [`WalletAddress`], [`Did`])
//! validate format at construction time. UUID-based identifiers
//! ([`AccountId`], [`WalletId`], [`EventId`], [`IssuerId`]) are always
//! valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id! {
    /// A unique identifier for an identity-holder account. Accounts are
    /// scoped to a tenant; the id itself is globally unique.
    AccountId
}

uuid_id! {
    /// A unique identifier for a provisioned wallet.
    WalletId
}

uuid_id! {
    /// A unique identifier for an event-log record. Doubles as the opaque
    /// pagination cursor for event-log queries.
    EventId
}

uuid_id! {
    /// A unique identifier for a registered credential issuer.
    IssuerId
}

// ---------------------------------------------------------------------------
// Tenant
// ---------------------------------------------------------------------------

/// The isolation boundary partitioning accounts, wallets, and events for a
/// deployment that serves multiple customers.
///
/// The empty string is the default tenant of a single-customer deployment.
/// Tenant labels are trimmed on construction; interior whitespace is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Tenant(String);

impl Tenant {
    /// Create a tenant label, trimming surrounding whitespace.
    pub fn new(label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidTenant(label));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The default (unnamed) tenant.
    pub fn default_tenant() -> Self {
        Self(String::new())
    }

    /// Access the tenant label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Tenant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("<default>")
        } else {
            f.write_str(&self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// String-based credential primitives (validated at construction)
// ---------------------------------------------------------------------------

/// An email address used as a login identifier.
///
/// Validation is deliberately structural, not RFC-exhaustive: exactly one
/// `@`, non-empty local part, and a domain containing at least one `.`
/// with non-empty labels. The address is lowercased on construction so
/// that lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create an email address, validating shape and normalizing case.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let s = raw.trim().to_ascii_lowercase();
        let Some((local, domain)) = s.split_once('@') else {
            return Err(ValidationError::InvalidEmail(raw));
        };
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && domain.split('.').all(|label| !label.is_empty());
        if local.is_empty() || domain.is_empty() || !domain_ok || s.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidEmail(raw));
        }
        Ok(Self(s))
    }

    /// Access the normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wallet address: `0x` followed by 40 hex characters.
///
/// Addresses are derived from the holder's public key material and are
/// global identifiers — they are not tenant-scoped. Lowercased on
/// construction so comparisons are canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Create a wallet address, validating the `0x` + 40-hex shape.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let s = raw.trim().to_ascii_lowercase();
        let Some(hex) = s.strip_prefix("0x") else {
            return Err(ValidationError::InvalidAddress(raw));
        };
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidAddress(raw));
        }
        Ok(Self(s))
    }

    /// Access the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// W3C Decentralized Identifier (DID).
///
/// Format: `did:<method>:<method-specific-id>` where the method is
/// lowercase alphanumeric and the method-specific id is non-empty.
///
/// Reference: <https://www.w3.org/TR/did-core/#did-syntax>
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Create a DID from a string, validating format.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let Some(rest) = raw.strip_prefix("did:") else {
            return Err(ValidationError::InvalidDid(raw));
        };
        let Some((method, id)) = rest.split_once(':') else {
            return Err(ValidationError::InvalidDid(raw));
        };
        let method_ok = !method.is_empty()
            && method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !method_ok || id.is_empty() {
            return Err(ValidationError::InvalidDid(raw));
        }
        Ok(Self(raw))
    }

    /// The DID method name (e.g. `key`).
    pub fn method(&self) -> &str {
        // Valid by construction: "did:<method>:<id>".
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// Access the full DID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Did {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Did> for String {
    fn from(value: Did) -> Self {
        value.0
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
