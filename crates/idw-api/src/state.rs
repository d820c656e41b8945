//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! `AppState` holds the platform's runtime stores:
//! - **Accounts** — identity-holder records with credential material
//! - **Wallets** and **wallet links** — provisioned wallets and the
//!   account↔wallet relation (insertion-ordered)
//! - **DIDs** — locally provisioned identifiers (in-process mode only)
//! - **Issuers** and **issuer links** — the pre-seeded issuer directory
//!   and per-account associations
//! - **Sessions** — opaque login tokens, keyed by token digest
//! - **Events** — the append-only audit log ([`idw_events::EventLog`])
//!
//! All in-memory stores use `parking_lot` locks and are never held across
//! `.await` points. When a database pool is configured, the stores are a
//! cache hydrated at startup and every write is mirrored to Postgres.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use idw_core::{AccountId, Did, EmailAddress, IssuerId, Tenant, WalletAddress, WalletId};
use idw_events::EventLog;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::bootstrap::DeploymentContext;
use crate::provision::Provisioner;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Find the first record matching a predicate.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.data.read().values().find(|v| predicate(v)).cloned()
    }

    /// Check if a record exists.
    #[allow(dead_code)]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Record Types -------------------------------------------------------------

/// Credential material backing an account. Exactly one variant is
/// populated per account, discriminated by the request that created it.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountCredentials {
    /// Email + Argon2id password hash.
    Email {
        /// Login email address (normalized lowercase).
        email: EmailAddress,
        /// PHC-format Argon2id hash of the password.
        password_hash: String,
    },
    /// Externally-controlled wallet address, proven by signature.
    Web3 {
        /// The verified wallet address.
        address: WalletAddress,
    },
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email { email, .. } => f
                .debug_struct("Email")
                .field("email", email)
                .field("password_hash", &"[REDACTED]")
                .finish(),
            Self::Web3 { address } => {
                f.debug_struct("Web3").field("address", address).finish()
            }
        }
    }
}

/// An identity-holder account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Unique account identifier.
    pub id: AccountId,
    /// Tenant the account belongs to.
    pub tenant: Tenant,
    /// Optional friendly display name chosen at registration.
    pub name: Option<String>,
    /// Credential material (exactly one strategy's data).
    pub credentials: AccountCredentials,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl AccountRecord {
    /// The account's login identifier: email for email accounts, address
    /// for web3 accounts.
    pub fn username(&self) -> String {
        match &self.credentials {
            AccountCredentials::Email { email, .. } => email.to_string(),
            AccountCredentials::Web3 { address } => address.to_string(),
        }
    }
}

/// A provisioned wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    /// Unique wallet identifier.
    pub id: WalletId,
    /// Tenant the wallet belongs to.
    pub tenant: Tenant,
    /// Human-readable wallet name.
    pub name: String,
    /// When the wallet was created.
    pub created_at: DateTime<Utc>,
}

/// Access level an account holds on a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletPermission {
    /// Read-only visibility.
    ReadOnly,
    /// May use the wallet's keys without administering it.
    Use,
    /// Full control. The creating account holds this level.
    Owner,
}

impl WalletPermission {
    /// Return the string representation of this permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadOnly => "READ_ONLY",
            Self::Use => "USE",
            Self::Owner => "OWNER",
        }
    }
}

impl std::fmt::Display for WalletPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The account↔wallet relation. Rows are kept in insertion order — the
/// wallet listing surfaces them as stored, without re-sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountWalletLink {
    /// Tenant the link belongs to.
    pub tenant: Tenant,
    /// The linked account.
    pub account: AccountId,
    /// The linked wallet.
    pub wallet: WalletId,
    /// Access level the account holds.
    pub permission: WalletPermission,
    /// When the wallet was added to the account.
    pub added_on: DateTime<Utc>,
}

/// A locally provisioned DID (in-process provisioning mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DidRecord {
    /// The DID itself.
    pub did: Did,
    /// The wallet that owns the identifier.
    pub wallet: WalletId,
    /// DID method kind (e.g. `key`).
    pub kind: String,
    /// Friendly alias.
    pub alias: String,
    /// Whether this is the wallet's default identifier.
    pub default: bool,
    /// When the DID was provisioned.
    pub created_at: DateTime<Utc>,
}

/// A credential issuer known to the platform. The directory is seeded at
/// bootstrap; issuers are not created through this API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerRecord {
    /// Unique issuer identifier.
    pub id: IssuerId,
    /// Issuer name, unique across the directory.
    pub name: String,
    /// Optional operator-facing description.
    pub description: Option<String>,
}

/// Association between an account and an issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIssuerLink {
    /// Tenant the link belongs to.
    pub tenant: Tenant,
    /// The linked account.
    pub account: AccountId,
    /// The linked issuer.
    pub issuer: IssuerId,
}

/// An authenticated session. Stored keyed by the SHA-256 digest of the
/// opaque token, so raw tokens are never at rest.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// The session's account.
    pub account: AccountId,
    /// Tenant the session belongs to.
    pub tenant: Tenant,
    /// Login identifier captured at authentication time.
    pub username: String,
    /// When the session was issued.
    pub created_at: DateTime<Utc>,
}

// -- Application State --------------------------------------------------------

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals in each store.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Identity-holder accounts.
    pub accounts: Store<AccountRecord>,
    /// Provisioned wallets.
    pub wallets: Store<WalletRecord>,
    /// Account↔wallet relation, insertion-ordered.
    pub wallet_links: Arc<RwLock<Vec<AccountWalletLink>>>,
    /// Locally provisioned DIDs (in-process provisioning mode).
    pub dids: Arc<RwLock<Vec<DidRecord>>>,
    /// Issuer directory, seeded at bootstrap.
    pub issuers: Store<IssuerRecord>,
    /// Account↔issuer relation.
    pub issuer_links: Arc<RwLock<Vec<AccountIssuerLink>>>,
    /// Active sessions, keyed by token digest.
    pub sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
    /// The append-only audit event log.
    pub events: EventLog,

    /// Wallet provisioning facade (in-process or remote), injected at
    /// construction.
    pub provisioner: Provisioner,

    /// PostgreSQL connection pool for durable persistence. When `None`,
    /// the API operates in in-memory-only mode.
    pub db_pool: Option<PgPool>,

    /// Deployment context, if bootstrapped from a manifest.
    pub deployment: Option<DeploymentContext>,

    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration,
    /// in-process provisioning, and no database.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None, None)
    }

    /// Create a new application state with the given configuration, an
    /// optional remote provisioner client, and an optional database pool.
    ///
    /// With no remote client, wallet provisioning runs in-process against
    /// this state's DID store.
    pub fn with_config(
        config: AppConfig,
        remote_provisioner: Option<idw_provision_client::ProvisionerClient>,
        db_pool: Option<PgPool>,
    ) -> Self {
        let dids: Arc<RwLock<Vec<DidRecord>>> = Arc::new(RwLock::new(Vec::new()));
        let provisioner = match remote_provisioner {
            Some(client) => Provisioner::remote(client),
            None => Provisioner::local(Arc::clone(&dids)),
        };

        Self {
            accounts: Store::new(),
            wallets: Store::new(),
            wallet_links: Arc::new(RwLock::new(Vec::new())),
            dids,
            issuers: Store::new(),
            issuer_links: Arc::new(RwLock::new(Vec::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            events: EventLog::new(),
            provisioner,
            db_pool,
            deployment: None,
            config,
        }
    }

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// read operations stay fast and synchronous afterwards.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let accounts = crate::db::accounts::load_all(pool)
            .await
            .map_err(|e| format!("failed to load accounts: {e}"))?;
        let account_count = accounts.len();
        for record in accounts {
            self.accounts.insert(*record.id.as_uuid(), record);
        }

        let wallets = crate::db::wallets::load_all(pool)
            .await
            .map_err(|e| format!("failed to load wallets: {e}"))?;
        let wallet_count = wallets.len();
        for record in wallets {
            self.wallets.insert(*record.id.as_uuid(), record);
        }

        let links = crate::db::wallets::load_all_links(pool)
            .await
            .map_err(|e| format!("failed to load wallet links: {e}"))?;
        let link_count = links.len();
        *self.wallet_links.write() = links;

        let issuers = crate::db::issuers::load_all(pool)
            .await
            .map_err(|e| format!("failed to load issuers: {e}"))?;
        let issuer_count = issuers.len();
        for record in issuers {
            self.issuers.insert(*record.id.as_uuid(), record);
        }

        let issuer_links = crate::db::issuers::load_all_links(pool)
            .await
            .map_err(|e| format!("failed to load issuer links: {e}"))?;
        *self.issuer_links.write() = issuer_links;

        let events = crate::db::events::load_all(pool)
            .await
            .map_err(|e| format!("failed to load events: {e}"))?;
        let event_count = events.len();
        self.events.hydrate(events);

        tracing::info!(
            accounts = account_count,
            wallets = wallet_count,
            wallet_links = link_count,
            issuers = issuer_count,
            events = event_count,
            "hydrated in-memory stores from database"
        );

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
