//! # Database Persistence Layer
//!
//! Postgres persistence for platform state via SQLx.
//!
//! ## Architecture
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, every
//! account, wallet, link, issuer, and event write is mirrored to
//! Postgres and the in-memory stores are hydrated from it at startup.
//! When absent, the API operates in in-memory-only mode (suitable for
//! development and testing).
//!
//! Transactions bound exactly the statements of one workflow step:
//! wallet creation plus its account link commit together; the event-log
//! write is deliberately outside that transaction.

pub mod accounts;
pub mod events;
pub mod issuers;
pub mod wallets;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(Some(pool))
}
