//! # Account Orchestration
//!
//! The registration and authentication workflows, and the read-side
//! account directory.
//!
//! ## Registration workflow
//!
//! Registration is strictly sequential with no rollback of earlier steps
//! on later failure:
//!
//! 1. Dispatch to the credential strategy, which persists the account.
//!    A strategy error aborts immediately and is returned unchanged.
//! 2. Provision the initial wallet and record the owner link
//!    (transactional when a database is configured).
//! 3. Obtain the wallet's service handle.
//! 4. Emit the `Account.Create` event. This precedes steps 5–6 — it is a
//!    provisioning-started signal, and it is written outside the wallet
//!    transaction, so event and wallet state can diverge under partial
//!    failure.
//! 5. Create the default `key` DID (alias `Onboarding`) and mark it
//!    default.
//! 6. Link the default issuer when the directory has one; absent issuer
//!    is not an error.
//!
//! Any failure in steps 2–6 is wrapped once as
//! [`AccountError::RegistrationFailed`] carrying the cause.

pub mod requests;
pub mod strategy;

use idw_core::{AccountId, EmailAddress, IssuerId, Tenant, WalletAddress, WalletId};
use idw_events::{AccountEventData, Event, EventAction, ORIGINATOR_WALLET};
use idw_provision_client::CreateDidRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth;
use crate::provision::ProvisionError;
use crate::state::{
    AccountIssuerLink, AccountRecord, AccountWalletLink, AppState, WalletPermission,
};
use self::requests::AccountRequest;
use self::strategy::{
    AccountStrategy, AuthenticatedUser, EmailAccountStrategy, Web3WalletAccountStrategy,
};

/// DID kind provisioned for every new account.
pub const DEFAULT_DID_KIND: &str = "key";
/// Alias given to the account's first DID.
pub const DEFAULT_DID_ALIAS: &str = "Onboarding";
/// Issuer linked to new accounts when present in the directory.
pub const DEFAULT_ISSUER_NAME: &str = "walt.id";

// ---------------------------------------------------------------------------
// Errors and results
// ---------------------------------------------------------------------------

/// Account-domain errors.
#[derive(Debug, Error)]
pub enum AccountError {
    /// An account with this email already exists in the tenant.
    #[error("an account with email {0} already exists")]
    DuplicateEmail(String),

    /// An account with this wallet address already exists.
    #[error("an account with address {0} already exists")]
    DuplicateAddress(String),

    /// Presented credentials did not match a stored account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A required account row does not exist.
    #[error("account {0} not found")]
    NotFound(String),

    /// A request field failed domain validation.
    #[error("validation error: {0}")]
    Validation(#[from] idw_core::ValidationError),

    /// Credential material could not be processed (hashing failure).
    #[error("credential processing failed: {0}")]
    Credential(String),

    /// Wallet or DID provisioning failed.
    #[error("provisioning failed: {0}")]
    Provisioning(#[from] ProvisionError),

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Registration started but could not complete. The cause names the
    /// failing step; callers see a single error kind.
    #[error("account registration could not complete")]
    RegistrationFailed {
        /// The underlying failure from steps 2–6 of the workflow.
        #[source]
        source: Box<AccountError>,
    },
}

/// Successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResult {
    /// The new account's identifier.
    #[schema(value_type = String)]
    pub id: AccountId,
}

/// Successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticationResult {
    /// The account's identifier.
    #[schema(value_type = String)]
    pub id: AccountId,
    /// The login identifier used (email or address).
    pub username: String,
    /// Fresh opaque session token, distinct per call.
    pub token: String,
}

/// One wallet row of an account's wallet listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletListing {
    /// The wallet's identifier.
    #[schema(value_type = String)]
    pub id: WalletId,
    /// Human-readable wallet name.
    pub name: String,
    /// When the wallet was created.
    pub created_on: DateTime<Utc>,
    /// When the wallet was linked to the account.
    pub added_on: DateTime<Utc>,
    /// The account's access level on the wallet.
    pub permission: WalletPermission,
}

/// An account's wallets, in storage insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountWalletListing {
    /// The account the listing belongs to.
    #[schema(value_type = String)]
    pub account: AccountId,
    /// Linked wallets, as stored.
    pub wallets: Vec<WalletListing>,
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Register an account and provision its defaults.
pub async fn register(
    state: &AppState,
    tenant: &Tenant,
    request: &AccountRequest,
) -> Result<RegistrationResult, AccountError> {
    // Step 1 — the strategy persists the account; its error passes
    // through unchanged.
    let account = match request {
        AccountRequest::Email(r) => EmailAccountStrategy.register(state, tenant, r).await?,
        AccountRequest::Address(r) => {
            Web3WalletAccountStrategy.register(state, tenant, r).await?
        }
    };

    // Steps 2–6 — any failure is wrapped once; earlier steps are not
    // rolled back.
    match provision_defaults(state, tenant, request, account).await {
        Ok(()) => Ok(RegistrationResult { id: account }),
        Err(cause) => {
            tracing::error!(
                account = %account,
                tenant = %tenant,
                error = %cause,
                "registration could not complete after account creation"
            );
            Err(AccountError::RegistrationFailed {
                source: Box::new(cause),
            })
        }
    }
}

/// Steps 2–6 of the registration workflow.
async fn provision_defaults(
    state: &AppState,
    tenant: &Tenant,
    request: &AccountRequest,
    account: AccountId,
) -> Result<(), AccountError> {
    // Step 2 — initial wallet plus owner link, one transaction when a
    // database is configured.
    let wallet = state.provisioner.create_wallet(tenant, &account).await?;
    let link = AccountWalletLink {
        tenant: tenant.clone(),
        account,
        wallet: wallet.id,
        permission: WalletPermission::Owner,
        added_on: Utc::now(),
    };
    if let Some(pool) = &state.db_pool {
        crate::db::wallets::create_with_link(pool, &wallet, &link)
            .await
            .map_err(|e| AccountError::Storage(e.to_string()))?;
    }
    state.wallets.insert(*wallet.id.as_uuid(), wallet.clone());
    state.wallet_links.write().push(link);

    // Step 3 — wallet service handle.
    let wallet_service = state
        .provisioner
        .wallet_service(tenant.clone(), account, wallet.id);

    // Step 4 — provisioning-started event, deliberately outside the
    // wallet transaction and ahead of DID/issuer setup.
    let display = request
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| request.identifier().to_string());
    let event = state.events.append(Event::new(
        EventAction::AccountCreate,
        tenant.clone(),
        ORIGINATOR_WALLET,
        account,
        Some(wallet.id),
        AccountEventData::new(display).to_value(),
    ));
    if let Some(pool) = &state.db_pool {
        crate::db::events::insert(pool, &event)
            .await
            .map_err(|e| AccountError::Storage(e.to_string()))?;
    }

    // Step 5 — default DID, marked default.
    let did = wallet_service
        .create_did(&CreateDidRequest::with_alias(
            DEFAULT_DID_KIND,
            DEFAULT_DID_ALIAS,
        ))
        .await?;
    wallet_service.set_default(&did).await?;

    // Step 6 — default-issuer link; a missing issuer is not an error.
    let issuer_name = state
        .deployment
        .as_ref()
        .map(|d| d.default_issuer.as_str())
        .unwrap_or(DEFAULT_ISSUER_NAME);
    if let Some(issuer) = find_issuer_id_by_name(state, issuer_name) {
        let link = AccountIssuerLink {
            tenant: tenant.clone(),
            account,
            issuer,
        };
        if let Some(pool) = &state.db_pool {
            crate::db::issuers::insert_account_link(pool, &link)
                .await
                .map_err(|e| AccountError::Storage(e.to_string()))?;
        }
        state.issuer_links.write().push(link);
    } else {
        tracing::debug!(issuer = issuer_name, "default issuer not present, skipping link");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Authenticate an account and issue a session token.
pub async fn authenticate(
    state: &AppState,
    tenant: &Tenant,
    request: &AccountRequest,
) -> Result<AuthenticationResult, AccountError> {
    // Step 1 — strategy validation. Failures of any kind surface as a
    // typed error result.
    let user: AuthenticatedUser = match request {
        AccountRequest::Email(r) => EmailAccountStrategy.authenticate(state, tenant, r).await?,
        AccountRequest::Address(r) => {
            Web3WalletAccountStrategy
                .authenticate(state, tenant, r)
                .await?
        }
    };

    // Step 2 — login event (no wallet).
    let event = state.events.append(Event::new(
        EventAction::AccountLogin,
        tenant.clone(),
        ORIGINATOR_WALLET,
        user.id,
        None,
        AccountEventData::new(&user.username).to_value(),
    ));
    if let Some(pool) = &state.db_pool {
        crate::db::events::insert(pool, &event)
            .await
            .map_err(|e| AccountError::Storage(e.to_string()))?;
    }

    // Step 3 — fresh opaque token.
    let token = auth::create_session(state, tenant, user.id, &user.username);

    Ok(AuthenticationResult {
        id: user.id,
        username: user.username,
        token,
    })
}

// ---------------------------------------------------------------------------
// Account directory (read side)
// ---------------------------------------------------------------------------

/// An account's wallets within a tenant, in storage insertion order.
pub fn account_wallet_listing(
    state: &AppState,
    tenant: &Tenant,
    account: AccountId,
) -> AccountWalletListing {
    let wallets = state
        .wallet_links
        .read()
        .iter()
        .filter(|l| l.tenant == *tenant && l.account == account)
        .filter_map(|l| {
            state.wallets.get(l.wallet.as_uuid()).map(|w| WalletListing {
                id: w.id,
                name: w.name,
                created_on: w.created_at,
                added_on: l.added_on,
                permission: l.permission,
            })
        })
        .collect();
    AccountWalletListing { account, wallets }
}

/// Whether an email is registered in a tenant.
pub fn has_account_email(state: &AppState, tenant: &Tenant, email: &str) -> bool {
    let Ok(email) = EmailAddress::new(email) else {
        return false;
    };
    state
        .accounts
        .find(|a| {
            a.tenant == *tenant
                && matches!(&a.credentials, crate::state::AccountCredentials::Email { email: e, .. } if *e == email)
        })
        .is_some()
}

/// Whether a wallet address is registered. Global — not tenant-scoped.
pub fn has_account_address(state: &AppState, address: &str) -> bool {
    account_by_address(state, address).is_some()
}

/// Look up the account holding a wallet address. Global — not
/// tenant-scoped.
pub fn account_by_address(state: &AppState, address: &str) -> Option<AccountRecord> {
    let address = WalletAddress::new(address).ok()?;
    state.accounts.find(|a| {
        matches!(&a.credentials, crate::state::AccountCredentials::Web3 { address: stored } if *stored == address)
    })
}

/// An account's display identifier. Missing accounts are a hard error —
/// callers treat "not found" as exceptional here.
pub fn account_display_name(state: &AppState, account: AccountId) -> Result<String, AccountError> {
    state
        .accounts
        .get(account.as_uuid())
        .map(|a| a.username())
        .ok_or_else(|| AccountError::NotFound(account.to_string()))
}

/// Find an issuer id by directory name.
pub fn find_issuer_id_by_name(state: &AppState, name: &str) -> Option<IssuerId> {
    state.issuers.find(|i| i.name == name).map(|i| i.id)
}
