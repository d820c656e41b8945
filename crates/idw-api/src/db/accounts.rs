//! Account persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `accounts` table.
//! Accounts are never deleted through this layer.

use chrono::{DateTime, Utc};
use idw_core::{AccountId, EmailAddress, Tenant, WalletAddress};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::{AccountCredentials, AccountRecord};

/// Insert a new account record.
pub async fn insert(pool: &PgPool, record: &AccountRecord) -> Result<(), sqlx::Error> {
    let (kind, email, password_hash, address) = match &record.credentials {
        AccountCredentials::Email {
            email,
            password_hash,
        } => ("email", Some(email.as_str()), Some(password_hash.as_str()), None),
        AccountCredentials::Web3 { address } => ("web3", None, None, Some(address.as_str())),
    };

    sqlx::query(
        "INSERT INTO accounts (id, tenant, name, credential_kind, email,
         password_hash, address, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(record.id.as_uuid())
    .bind(record.tenant.as_str())
    .bind(&record.name)
    .bind(kind)
    .bind(email)
    .bind(password_hash)
    .bind(address)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all accounts from the database into the in-memory store on
/// startup. Rows with unreadable credential material are skipped with an
/// error log rather than failing the whole hydration.
pub async fn load_all(pool: &PgPool) -> Result<Vec<AccountRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AccountRow>(
        "SELECT id, tenant, name, credential_kind, email, password_hash,
         address, created_at
         FROM accounts ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(AccountRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    tenant: String,
    name: Option<String>,
    credential_kind: String,
    email: Option<String>,
    password_hash: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_record(self) -> Option<AccountRecord> {
        let tenant = match Tenant::new(&self.tenant) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(account = %self.id, error = %e, "skipping account with invalid tenant");
                return None;
            }
        };

        let credentials = match self.credential_kind.as_str() {
            "email" => match (self.email.as_deref().map(EmailAddress::new), self.password_hash) {
                (Some(Ok(email)), Some(password_hash)) => AccountCredentials::Email {
                    email,
                    password_hash,
                },
                _ => {
                    tracing::error!(account = %self.id, "skipping email account with invalid credential columns");
                    return None;
                }
            },
            "web3" => match self.address.as_deref().map(WalletAddress::new) {
                Some(Ok(address)) => AccountCredentials::Web3 { address },
                _ => {
                    tracing::error!(account = %self.id, "skipping web3 account with invalid address column");
                    return None;
                }
            },
            other => {
                tracing::error!(account = %self.id, kind = other, "skipping account with unknown credential kind");
                return None;
            }
        };

        Some(AccountRecord {
            id: AccountId::from_uuid(self.id),
            tenant,
            name: self.name,
            credentials,
            created_at: self.created_at,
        })
    }
}
