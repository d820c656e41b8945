//! # idw-api — Axum API Service for the IDW Stack
//!
//! The web tier of the multi-tenant identity-wallet platform: account
//! registration and authentication across credential strategies, wallet
//! provisioning orchestration, and the queryable audit event log.
//!
//! ## API Surface
//!
//! | Route                                | Module               | Auth    |
//! |--------------------------------------|----------------------|---------|
//! | `POST /v1/auth/register`             | [`routes::auth`]     | none    |
//! | `POST /v1/auth/login`                | [`routes::auth`]     | none    |
//! | `POST /v1/auth/logout`               | [`routes::auth`]     | session |
//! | `GET  /v1/accounts/wallets`          | [`routes::wallets`]  | session |
//! | `GET  /v1/eventlog`                  | [`routes::eventlog`] | session |
//! | `GET  /v1/wallets/:id/eventlog`      | [`routes::eventlog`] | session |
//! | `GET  /health/liveness`, `/readiness`| here                 | none    |
//! | `GET  /openapi.json`                 | [`openapi`]          | none    |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → SessionMiddleware (guarded routes only) → Handler
//! ```

pub mod accounts;
pub mod auth;
pub mod bootstrap;
pub mod db;
pub mod error;
pub mod openapi;
pub mod provision;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes, the OpenAPI document, and the register/login endpoints
/// are mounted outside the session middleware; everything else requires
/// a session token.
pub fn app(state: AppState) -> Router {
    // Session-guarded API routes.
    //
    // Body size limit: 1 MiB. Request payloads here are small JSON
    // documents; anything larger is rejected before buffering.
    let guarded = Router::new()
        .merge(routes::auth::session_router())
        .merge(routes::wallets::router())
        .merge(routes::eventlog::router())
        .layer(from_fn_with_state(state.clone(), auth::session_middleware));

    let open = Router::new()
        .merge(routes::auth::router())
        .merge(openapi::router());

    let api = Router::new()
        .merge(open)
        .merge(guarded)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Unauthenticated health probes — readiness checks actual service
    // health.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks:
/// - In-memory stores are accessible (locks acquirable).
/// - Database connection is healthy (when configured).
///
/// Returns 200 "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // Verify stores are accessible (read lock acquirable).
    let _ = state.accounts.len();
    let _ = state.wallets.len();
    let _ = state.events.len();

    // Verify database connection (when configured).
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
