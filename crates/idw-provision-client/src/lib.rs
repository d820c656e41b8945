//! # idw-provision-client — Typed client for the wallet-provisioning service
//!
//! Ergonomic, typed access to the remote wallet-provisioning service:
//! wallet creation, DID provisioning, and default-identifier selection.
//!
//! ## Architecture
//!
//! This crate is the only authorized path for the IDW Stack to talk to a
//! remote provisioner. Deployments without a remote provisioner run the
//! API server's in-process provisioning instead; the server picks at
//! startup based on `PROVISIONER_URL`.
//!
//! ## API Path Convention
//!
//! All provisioner endpoints are tenant-scoped:
//! `{base_url}/api/v1/tenants/{tenant}/accounts/{account}/wallets[...]`.
//! The default (unnamed) tenant is addressed by the literal segment
//! `default`.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigError, ProvisionerConfig};
pub use error::ProvisionerError;
pub use types::{CreateDidRequest, ProvisionedWallet};

use std::time::Duration;

use idw_core::{AccountId, Did, Tenant, WalletId};
use url::Url;

use types::{CreateDidResponse, SetDefaultDidRequest};

/// Path segment for a tenant, with the unnamed tenant spelled `default`.
fn tenant_segment(tenant: &Tenant) -> &str {
    if tenant.as_str().is_empty() {
        "default"
    } else {
        tenant.as_str()
    }
}

/// Typed client for the remote wallet-provisioning service.
#[derive(Debug, Clone)]
pub struct ProvisionerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ProvisionerClient {
    /// Create a new provisioner client from configuration.
    pub fn new(config: ProvisionerConfig) -> Result<Self, ProvisionerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_token
                    ))
                    .map_err(|_| ProvisionerError::Config(ConfigError::MissingToken))?,
                );
                headers
            })
            .build()
            .map_err(|e| ProvisionerError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProvisionerError> {
        self.base_url
            .join(path)
            .map_err(|e| ProvisionerError::InvalidEndpoint {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// Create a wallet for an account.
    ///
    /// `POST /api/v1/tenants/{tenant}/accounts/{account}/wallets`
    pub async fn create_wallet(
        &self,
        tenant: &Tenant,
        account: &AccountId,
    ) -> Result<ProvisionedWallet, ProvisionerError> {
        let path = format!(
            "api/v1/tenants/{}/accounts/{account}/wallets",
            tenant_segment(tenant)
        );
        let url = self.endpoint(&path)?;
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| ProvisionerError::Http {
                endpoint: path.clone(),
                source: e,
            })?;
        Self::check_status(&path, &response)?;
        response
            .json::<ProvisionedWallet>()
            .await
            .map_err(|e| ProvisionerError::Decode {
                endpoint: path,
                source: e,
            })
    }

    /// Create a DID of the given kind inside a wallet.
    ///
    /// `POST /api/v1/tenants/{tenant}/accounts/{account}/wallets/{wallet}/dids`
    pub async fn create_did(
        &self,
        tenant: &Tenant,
        account: &AccountId,
        wallet: &WalletId,
        request: &CreateDidRequest,
    ) -> Result<Did, ProvisionerError> {
        let path = format!(
            "api/v1/tenants/{}/accounts/{account}/wallets/{wallet}/dids",
            tenant_segment(tenant)
        );
        let url = self.endpoint(&path)?;
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProvisionerError::Http {
                endpoint: path.clone(),
                source: e,
            })?;
        Self::check_status(&path, &response)?;
        let body = response
            .json::<CreateDidResponse>()
            .await
            .map_err(|e| ProvisionerError::Decode {
                endpoint: path,
                source: e,
            })?;
        Ok(body.did)
    }

    /// Mark a DID as the wallet's default identifier.
    ///
    /// `POST /api/v1/tenants/{tenant}/accounts/{account}/wallets/{wallet}/dids/default`
    pub async fn set_default_did(
        &self,
        tenant: &Tenant,
        account: &AccountId,
        wallet: &WalletId,
        did: &Did,
    ) -> Result<(), ProvisionerError> {
        let path = format!(
            "api/v1/tenants/{}/accounts/{account}/wallets/{wallet}/dids/default",
            tenant_segment(tenant)
        );
        let url = self.endpoint(&path)?;
        let response = self
            .http
            .post(url)
            .json(&SetDefaultDidRequest { did: did.clone() })
            .send()
            .await
            .map_err(|e| ProvisionerError::Http {
                endpoint: path.clone(),
                source: e,
            })?;
        Self::check_status(&path, &response)?;
        Ok(())
    }

    fn check_status(
        endpoint: &str,
        response: &reqwest::Response,
    ) -> Result<(), ProvisionerError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            tracing::warn!(endpoint, status = %status, "provisioner returned error status");
            Err(ProvisionerError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_segment_defaults_unnamed_tenant() {
        assert_eq!(tenant_segment(&Tenant::default_tenant()), "default");
        assert_eq!(tenant_segment(&Tenant::new("acme").unwrap()), "acme");
    }
}
