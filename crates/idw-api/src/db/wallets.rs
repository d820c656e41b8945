//! Wallet and wallet-link persistence operations.
//!
//! Wallet creation and its account link commit in one transaction —
//! that is the transactional boundary of the registration workflow's
//! wallet step. The event-log write is intentionally not part of it.

use chrono::{DateTime, Utc};
use idw_core::{AccountId, Tenant, WalletId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::{AccountWalletLink, WalletPermission, WalletRecord};

/// Insert a wallet and its account link atomically.
pub async fn create_with_link(
    pool: &PgPool,
    wallet: &WalletRecord,
    link: &AccountWalletLink,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO wallets (id, tenant, name, created_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(wallet.id.as_uuid())
    .bind(wallet.tenant.as_str())
    .bind(&wallet.name)
    .bind(wallet.created_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO account_wallets (tenant, account_id, wallet_id, permission, added_on)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(link.tenant.as_str())
    .bind(link.account.as_uuid())
    .bind(link.wallet.as_uuid())
    .bind(link.permission.as_str())
    .bind(link.added_on)
    .execute(&mut *tx)
    .await?;

    tx.commit().await
}

/// Load all wallets from the database on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<WalletRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, WalletRow>(
        "SELECT id, tenant, name, created_at FROM wallets ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(WalletRow::into_record).collect())
}

/// Load all account-wallet links on startup, in insertion order — the
/// listing endpoint surfaces them as stored.
pub async fn load_all_links(pool: &PgPool) -> Result<Vec<AccountWalletLink>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LinkRow>(
        "SELECT tenant, account_id, wallet_id, permission, added_on
         FROM account_wallets ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(LinkRow::into_record).collect())
}

fn parse_permission(raw: &str) -> Option<WalletPermission> {
    match raw {
        "READ_ONLY" => Some(WalletPermission::ReadOnly),
        "USE" => Some(WalletPermission::Use),
        "OWNER" => Some(WalletPermission::Owner),
        _ => None,
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct WalletRow {
    id: Uuid,
    tenant: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl WalletRow {
    fn into_record(self) -> Option<WalletRecord> {
        let tenant = match Tenant::new(&self.tenant) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(wallet = %self.id, error = %e, "skipping wallet with invalid tenant");
                return None;
            }
        };
        Some(WalletRecord {
            id: WalletId::from_uuid(self.id),
            tenant,
            name: self.name,
            created_at: self.created_at,
        })
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct LinkRow {
    tenant: String,
    account_id: Uuid,
    wallet_id: Uuid,
    permission: String,
    added_on: DateTime<Utc>,
}

impl LinkRow {
    fn into_record(self) -> Option<AccountWalletLink> {
        let tenant = Tenant::new(&self.tenant).ok()?;
        let permission = match parse_permission(&self.permission) {
            Some(p) => p,
            None => {
                tracing::error!(
                    account = %self.account_id,
                    wallet = %self.wallet_id,
                    permission = %self.permission,
                    "skipping wallet link with unknown permission"
                );
                return None;
            }
        };
        Some(AccountWalletLink {
            tenant,
            account: AccountId::from_uuid(self.account_id),
            wallet: WalletId::from_uuid(self.wallet_id),
            permission,
            added_on: self.added_on,
        })
    }
}
