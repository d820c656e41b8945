//! # Wallet Provisioning Facade
//!
//! The orchestration workflow provisions wallets and DIDs through this
//! facade, injected into [`AppState`](crate::state::AppState) at
//! construction. Two closed variants:
//!
//! - **Local** — in-process provisioning: wallet records are minted here
//!   and `did:key` material is generated with `idw-crypto`. The default
//!   for deployments without a remote provisioner, and for tests.
//! - **Remote** — delegates to the wallet-provisioning service via
//!   [`idw_provision_client::ProvisionerClient`]. Selected at startup
//!   when `PROVISIONER_URL` is configured.
//!
//! The variant set is fixed, so dispatch is a `match`, not a trait
//! object.

use std::sync::Arc;

use chrono::Utc;
use idw_core::{AccountId, Did, Tenant, WalletId};
use idw_crypto::SigningKey;
use idw_provision_client::{CreateDidRequest, ProvisionerClient, ProvisionerError};
use parking_lot::RwLock;
use rand_core::OsRng;
use thiserror::Error;

use crate::state::{DidRecord, WalletRecord};

/// Errors from wallet/DID provisioning.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The remote provisioning service failed.
    #[error("remote provisioner error: {0}")]
    Remote(#[from] ProvisionerError),

    /// In-process provisioning supports only the `key` DID kind.
    #[error("unsupported DID kind for in-process provisioning: {0}")]
    UnsupportedDidKind(String),

    /// The DID named in a default-selection call does not exist.
    #[error("DID not found in wallet: {0}")]
    DidNotFound(String),
}

/// In-process wallet provisioning backed by the local DID store.
#[derive(Debug, Clone)]
pub struct LocalProvisioner {
    dids: Arc<RwLock<Vec<DidRecord>>>,
}

impl LocalProvisioner {
    fn create_wallet(&self, tenant: &Tenant) -> WalletRecord {
        let id = WalletId::new();
        let short = &id.to_string()[..8];
        WalletRecord {
            id,
            tenant: tenant.clone(),
            name: format!("wallet-{short}"),
            created_at: Utc::now(),
        }
    }

    fn create_did(
        &self,
        wallet: &WalletId,
        request: &CreateDidRequest,
    ) -> Result<Did, ProvisionError> {
        if request.kind != "key" {
            return Err(ProvisionError::UnsupportedDidKind(request.kind.clone()));
        }
        let key = SigningKey::generate(&mut OsRng);
        let did = Did::new(format!("did:key:{}", key.verifying_key().to_hex()))
            .expect("generated did:key is well-formed");
        let alias = request
            .options
            .get("alias")
            .and_then(|v| v.as_str())
            .unwrap_or("default")
            .to_string();
        self.dids.write().push(DidRecord {
            did: did.clone(),
            wallet: *wallet,
            kind: request.kind.clone(),
            alias,
            default: false,
            created_at: Utc::now(),
        });
        Ok(did)
    }

    fn set_default(&self, wallet: &WalletId, did: &Did) -> Result<(), ProvisionError> {
        let mut dids = self.dids.write();
        if !dids.iter().any(|d| d.wallet == *wallet && d.did == *did) {
            return Err(ProvisionError::DidNotFound(did.to_string()));
        }
        for record in dids.iter_mut().filter(|d| d.wallet == *wallet) {
            record.default = record.did == *did;
        }
        Ok(())
    }
}

/// Wallet provisioning facade: in-process or remote.
#[derive(Debug, Clone)]
pub enum Provisioner {
    /// In-process provisioning.
    Local(LocalProvisioner),
    /// Remote provisioning service.
    Remote(ProvisionerClient),
}

impl Provisioner {
    /// Build the in-process variant over the given DID store.
    pub fn local(dids: Arc<RwLock<Vec<DidRecord>>>) -> Self {
        Self::Local(LocalProvisioner { dids })
    }

    /// Build the remote variant over a configured client.
    pub fn remote(client: ProvisionerClient) -> Self {
        Self::Remote(client)
    }

    /// Whether this facade provisions in-process.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Provision a wallet for an account. The caller records the wallet
    /// and its account link in storage.
    pub async fn create_wallet(
        &self,
        tenant: &Tenant,
        account: &AccountId,
    ) -> Result<WalletRecord, ProvisionError> {
        match self {
            Self::Local(local) => Ok(local.create_wallet(tenant)),
            Self::Remote(client) => {
                let provisioned = client.create_wallet(tenant, account).await?;
                Ok(WalletRecord {
                    id: provisioned.id,
                    tenant: tenant.clone(),
                    name: provisioned.name,
                    created_at: provisioned.created_on,
                })
            }
        }
    }

    /// Obtain the service handle for a provisioned wallet.
    pub fn wallet_service(
        &self,
        tenant: Tenant,
        account: AccountId,
        wallet: WalletId,
    ) -> WalletService {
        WalletService {
            provisioner: self.clone(),
            tenant,
            account,
            wallet,
        }
    }
}

/// Handle to one wallet's provisioning operations.
#[derive(Debug, Clone)]
pub struct WalletService {
    provisioner: Provisioner,
    tenant: Tenant,
    account: AccountId,
    wallet: WalletId,
}

impl WalletService {
    /// Create a DID of the given kind inside this wallet.
    pub async fn create_did(&self, request: &CreateDidRequest) -> Result<Did, ProvisionError> {
        match &self.provisioner {
            Provisioner::Local(local) => local.create_did(&self.wallet, request),
            Provisioner::Remote(client) => Ok(client
                .create_did(&self.tenant, &self.account, &self.wallet, request)
                .await?),
        }
    }

    /// Mark a DID as this wallet's default identifier.
    pub async fn set_default(&self, did: &Did) -> Result<(), ProvisionError> {
        match &self.provisioner {
            Provisioner::Local(local) => local.set_default(&self.wallet, did),
            Provisioner::Remote(client) => Ok(client
                .set_default_did(&self.tenant, &self.account, &self.wallet, did)
                .await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_with_store() -> (Provisioner, Arc<RwLock<Vec<DidRecord>>>) {
        let dids: Arc<RwLock<Vec<DidRecord>>> = Arc::new(RwLock::new(Vec::new()));
        (Provisioner::local(Arc::clone(&dids)), dids)
    }

    #[tokio::test]
    async fn local_create_wallet_names_by_id_prefix() {
        let (provisioner, _) = local_with_store();
        let wallet = provisioner
            .create_wallet(&Tenant::default_tenant(), &AccountId::new())
            .await
            .unwrap();
        assert!(wallet.name.starts_with("wallet-"));
        assert!(wallet.id.to_string().starts_with(&wallet.name[7..]));
    }

    #[tokio::test]
    async fn local_create_did_records_key_material() {
        let (provisioner, dids) = local_with_store();
        let wallet = provisioner
            .create_wallet(&Tenant::default_tenant(), &AccountId::new())
            .await
            .unwrap();
        let service =
            provisioner.wallet_service(Tenant::default_tenant(), AccountId::new(), wallet.id);

        let did = service
            .create_did(&CreateDidRequest::with_alias("key", "Onboarding"))
            .await
            .unwrap();

        assert_eq!(did.method(), "key");
        let stored = dids.read();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].alias, "Onboarding");
        assert!(!stored[0].default);
    }

    #[tokio::test]
    async fn local_rejects_unsupported_did_kind() {
        let (provisioner, _) = local_with_store();
        let service = provisioner.wallet_service(
            Tenant::default_tenant(),
            AccountId::new(),
            WalletId::new(),
        );
        let err = service
            .create_did(&CreateDidRequest::with_alias("web", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::UnsupportedDidKind(_)));
    }

    #[tokio::test]
    async fn set_default_flips_exactly_one_did() {
        let (provisioner, dids) = local_with_store();
        let wallet = WalletId::new();
        let service =
            provisioner.wallet_service(Tenant::default_tenant(), AccountId::new(), wallet);

        let first = service
            .create_did(&CreateDidRequest::with_alias("key", "first"))
            .await
            .unwrap();
        let second = service
            .create_did(&CreateDidRequest::with_alias("key", "second"))
            .await
            .unwrap();

        service.set_default(&first).await.unwrap();
        service.set_default(&second).await.unwrap();

        let stored = dids.read();
        let defaults: Vec<&DidRecord> = stored.iter().filter(|d| d.default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].did, second);
    }

    #[tokio::test]
    async fn set_default_unknown_did_fails() {
        let (provisioner, _) = local_with_store();
        let service = provisioner.wallet_service(
            Tenant::default_tenant(),
            AccountId::new(),
            WalletId::new(),
        );
        let did = Did::new("did:key:deadbeef").unwrap();
        let err = service.set_default(&did).await.unwrap_err();
        assert!(matches!(err, ProvisionError::DidNotFound(_)));
    }
}
