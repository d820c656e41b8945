//! Wire types for the wallet-provisioning API.

use chrono::{DateTime, Utc};
use idw_core::{Did, WalletId};
use serde::{Deserialize, Serialize};

/// A wallet created by the provisioning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedWallet {
    /// The wallet's identifier.
    pub id: WalletId,
    /// Human-readable wallet name assigned by the provisioner.
    pub name: String,
    /// When the wallet was created.
    pub created_on: DateTime<Utc>,
}

/// Request body for DID creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDidRequest {
    /// DID method kind (e.g. `key`).
    pub kind: String,
    /// Method-specific creation options (e.g. an `alias`).
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl CreateDidRequest {
    /// Build a request for the given kind with a single `alias` option.
    pub fn with_alias(kind: impl Into<String>, alias: impl Into<String>) -> Self {
        let mut options = serde_json::Map::new();
        options.insert(
            "alias".to_string(),
            serde_json::Value::String(alias.into()),
        );
        Self {
            kind: kind.into(),
            options,
        }
    }
}

/// Response body for DID creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDidResponse {
    /// The provisioned DID.
    pub did: Did,
}

/// Request body for default-DID selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDefaultDidRequest {
    /// The DID to mark as default.
    pub did: Did,
}
