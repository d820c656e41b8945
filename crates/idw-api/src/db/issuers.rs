//! Issuer-directory and account-issuer-link persistence operations.

use idw_core::{AccountId, IssuerId, Tenant};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::{AccountIssuerLink, IssuerRecord};

/// Upsert an issuer-directory entry by name. Used by bootstrap seeding;
/// an existing entry with the same name is left untouched.
pub async fn upsert(pool: &PgPool, record: &IssuerRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO issuers (id, name, description)
         VALUES ($1, $2, $3)
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(record.id.as_uuid())
    .bind(&record.name)
    .bind(&record.description)
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert an account↔issuer link.
pub async fn insert_account_link(
    pool: &PgPool,
    link: &AccountIssuerLink,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO account_issuers (tenant, account_id, issuer_id)
         VALUES ($1, $2, $3)",
    )
    .bind(link.tenant.as_str())
    .bind(link.account.as_uuid())
    .bind(link.issuer.as_uuid())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the issuer directory on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<IssuerRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, IssuerRow>(
        "SELECT id, name, description FROM issuers ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(IssuerRow::into_record).collect())
}

/// Load all account-issuer links on startup.
pub async fn load_all_links(pool: &PgPool) -> Result<Vec<AccountIssuerLink>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LinkRow>(
        "SELECT tenant, account_id, issuer_id FROM account_issuers ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(LinkRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct IssuerRow {
    id: Uuid,
    name: String,
    description: Option<String>,
}

impl IssuerRow {
    fn into_record(self) -> IssuerRecord {
        IssuerRecord {
            id: IssuerId::from_uuid(self.id),
            name: self.name,
            description: self.description,
        }
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct LinkRow {
    tenant: String,
    account_id: Uuid,
    issuer_id: Uuid,
}

impl LinkRow {
    fn into_record(self) -> Option<AccountIssuerLink> {
        let tenant = Tenant::new(&self.tenant).ok()?;
        Some(AccountIssuerLink {
            tenant,
            account: AccountId::from_uuid(self.account_id),
            issuer: IssuerId::from_uuid(self.issuer_id),
        })
    }
}
