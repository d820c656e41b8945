//! Event persistence operations.
//!
//! Events are immutable once created — there are no update or delete
//! operations. The `seq` column preserves the log's total order across
//! restarts.

use chrono::{DateTime, Utc};
use idw_core::{AccountId, EventId, Tenant, Timestamp, WalletId};
use idw_events::{Event, EventAction};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new event record.
pub async fn insert(pool: &PgPool, event: &Event) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO events (id, seq, action, tenant, originator, account_id,
         wallet_id, data, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(event.id.as_uuid())
    .bind(event.seq as i64)
    .bind(event.action.as_str())
    .bind(event.tenant.as_str())
    .bind(&event.originator)
    .bind(event.account.as_uuid())
    .bind(event.wallet.as_ref().map(|w| *w.as_uuid()))
    .bind(&event.data)
    .bind(event.timestamp.as_datetime())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all events from the database into the in-memory log on startup,
/// in log order.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EventRow>(
        "SELECT id, seq, action, tenant, originator, account_id, wallet_id,
         data, created_at
         FROM events ORDER BY seq",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(EventRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    seq: i64,
    action: String,
    tenant: String,
    originator: String,
    account_id: Uuid,
    wallet_id: Option<Uuid>,
    data: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl EventRow {
    fn into_record(self) -> Option<Event> {
        let action: EventAction = match self.action.parse() {
            Ok(action) => action,
            Err(e) => {
                tracing::error!(event = %self.id, error = %e, "skipping event with unknown action");
                return None;
            }
        };
        let tenant = Tenant::new(&self.tenant).ok()?;
        Some(Event {
            id: EventId::from_uuid(self.id),
            seq: self.seq as u64,
            action,
            tenant,
            originator: self.originator,
            account: AccountId::from_uuid(self.account_id),
            wallet: self.wallet_id.map(WalletId::from_uuid),
            data: self.data,
            timestamp: Timestamp::from_datetime(self.created_at),
        })
    }
}
