//! # Credential Strategies
//!
//! One strategy per credential kind, behind a common interface:
//! registration persists the account row with that strategy's credential
//! material; authentication validates presented credentials against it.
//!
//! Strategy selection is closed dispatch — the orchestrator matches on
//! the [`AccountRequest`](super::requests::AccountRequest) variant. Both
//! duplicate-credential and credential-mismatch failures are typed domain
//! errors, never faults.

use chrono::Utc;
use idw_core::{AccountId, EmailAddress, Tenant, WalletAddress};
use idw_crypto::{hex_decode, sha256_hex, Signature, VerifyingKey};

use crate::accounts::requests::{AddressAccountRequest, EmailAccountRequest};
use crate::accounts::AccountError;
use crate::state::{AccountCredentials, AccountRecord, AppState};

/// An authenticated account, as produced by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The account's identifier.
    pub id: AccountId,
    /// The login identifier used (email or address).
    pub username: String,
}

/// The strategy interface: persist an account with this credential kind,
/// or validate presented credentials against a stored account.
#[allow(async_fn_in_trait)]
pub trait AccountStrategy {
    /// The request payload this strategy consumes.
    type Request;

    /// Persist a new account. Duplicate credentials are a typed error.
    async fn register(
        &self,
        state: &AppState,
        tenant: &Tenant,
        request: &Self::Request,
    ) -> Result<AccountId, AccountError>;

    /// Validate credentials against the stored account.
    async fn authenticate(
        &self,
        state: &AppState,
        tenant: &Tenant,
        request: &Self::Request,
    ) -> Result<AuthenticatedUser, AccountError>;
}

// ---------------------------------------------------------------------------
// Email strategy
// ---------------------------------------------------------------------------

/// Email + Argon2id password strategy.
pub struct EmailAccountStrategy;

impl EmailAccountStrategy {
    fn find_by_email(
        state: &AppState,
        tenant: &Tenant,
        email: &EmailAddress,
    ) -> Option<AccountRecord> {
        state.accounts.find(|a| {
            a.tenant == *tenant
                && matches!(&a.credentials, AccountCredentials::Email { email: e, .. } if e == email)
        })
    }
}

impl AccountStrategy for EmailAccountStrategy {
    type Request = EmailAccountRequest;

    async fn register(
        &self,
        state: &AppState,
        tenant: &Tenant,
        request: &EmailAccountRequest,
    ) -> Result<AccountId, AccountError> {
        let email = EmailAddress::new(&request.email)?;
        if Self::find_by_email(state, tenant, &email).is_some() {
            return Err(AccountError::DuplicateEmail(email.to_string()));
        }

        let password_hash = idw_crypto::password::hash_password(&request.password)
            .map_err(|e| AccountError::Credential(e.to_string()))?;

        let record = AccountRecord {
            id: AccountId::new(),
            tenant: tenant.clone(),
            name: request.name.clone(),
            credentials: AccountCredentials::Email {
                email,
                password_hash,
            },
            created_at: Utc::now(),
        };
        let id = record.id;

        if let Some(pool) = &state.db_pool {
            crate::db::accounts::insert(pool, &record)
                .await
                .map_err(|e| AccountError::Storage(e.to_string()))?;
        }
        state.accounts.insert(*id.as_uuid(), record);

        tracing::info!(account = %id, tenant = %tenant, "registered email account");
        Ok(id)
    }

    async fn authenticate(
        &self,
        state: &AppState,
        tenant: &Tenant,
        request: &EmailAccountRequest,
    ) -> Result<AuthenticatedUser, AccountError> {
        let email = EmailAddress::new(&request.email)?;
        // Unknown email and wrong password collapse into one error so the
        // endpoint does not oracle account existence.
        let account = Self::find_by_email(state, tenant, &email)
            .ok_or(AccountError::InvalidCredentials)?;

        let AccountCredentials::Email { password_hash, .. } = &account.credentials else {
            return Err(AccountError::InvalidCredentials);
        };
        let valid = idw_crypto::password::verify_password(&request.password, password_hash)
            .map_err(|e| AccountError::Credential(e.to_string()))?;
        if !valid {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(AuthenticatedUser {
            id: account.id,
            username: email.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Wallet-address strategy
// ---------------------------------------------------------------------------

/// Wallet-address strategy: signature proof, no password.
pub struct Web3WalletAccountStrategy;

/// Derive the wallet address from an Ed25519 public key: `0x` + the last
/// 20 bytes of the key's SHA-256 digest.
pub fn derive_address(public_key: &VerifyingKey) -> WalletAddress {
    let digest = sha256_hex(&public_key.to_bytes());
    // 64 hex chars; the last 40 are the trailing 20 bytes.
    let tail = &digest[24..];
    WalletAddress::new(format!("0x{tail}")).expect("derived address is well-formed")
}

impl Web3WalletAccountStrategy {
    /// Verify the ownership proof: the address derives from the presented
    /// key, and the signature over the challenge verifies under it.
    fn verify_proof(
        request: &AddressAccountRequest,
        expected: &WalletAddress,
    ) -> Result<(), AccountError> {
        let key = VerifyingKey::from_hex(&request.public_key)
            .map_err(|_| AccountError::InvalidCredentials)?;
        if derive_address(&key) != *expected {
            return Err(AccountError::InvalidCredentials);
        }
        let signature_bytes =
            hex_decode(&request.signature).map_err(|_| AccountError::InvalidCredentials)?;
        let signature = Signature::from_bytes(&signature_bytes)
            .map_err(|_| AccountError::InvalidCredentials)?;
        key.verify(request.challenge.as_bytes(), &signature)
            .map_err(|_| AccountError::InvalidCredentials)
    }

    fn find_by_address(state: &AppState, address: &WalletAddress) -> Option<AccountRecord> {
        // Address lookups are global, not tenant-scoped: an address proves
        // key possession regardless of tenant.
        state.accounts.find(|a| {
            matches!(&a.credentials, AccountCredentials::Web3 { address: stored } if stored == address)
        })
    }
}

impl AccountStrategy for Web3WalletAccountStrategy {
    type Request = AddressAccountRequest;

    async fn register(
        &self,
        state: &AppState,
        tenant: &Tenant,
        request: &AddressAccountRequest,
    ) -> Result<AccountId, AccountError> {
        let address = WalletAddress::new(&request.address)?;
        Self::verify_proof(request, &address)?;

        if Self::find_by_address(state, &address).is_some() {
            return Err(AccountError::DuplicateAddress(address.to_string()));
        }

        let record = AccountRecord {
            id: AccountId::new(),
            tenant: tenant.clone(),
            name: request.name.clone(),
            credentials: AccountCredentials::Web3 { address },
            created_at: Utc::now(),
        };
        let id = record.id;

        if let Some(pool) = &state.db_pool {
            crate::db::accounts::insert(pool, &record)
                .await
                .map_err(|e| AccountError::Storage(e.to_string()))?;
        }
        state.accounts.insert(*id.as_uuid(), record);

        tracing::info!(account = %id, tenant = %tenant, "registered wallet-address account");
        Ok(id)
    }

    async fn authenticate(
        &self,
        state: &AppState,
        _tenant: &Tenant,
        request: &AddressAccountRequest,
    ) -> Result<AuthenticatedUser, AccountError> {
        let address =
            WalletAddress::new(&request.address).map_err(|_| AccountError::InvalidCredentials)?;
        let account =
            Self::find_by_address(state, &address).ok_or(AccountError::InvalidCredentials)?;
        Self::verify_proof(request, &address)?;

        Ok(AuthenticatedUser {
            id: account.id,
            username: address.to_string(),
        })
    }
}
