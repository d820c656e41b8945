//! # Event Log API
//!
//! ## Endpoints
//!
//! - `GET /v1/eventlog` — Query the signed-in tenant's event log.
//! - `GET /v1/wallets/:wallet_id/eventlog` — Query one wallet's events;
//!   the caller must be linked to the wallet.
//!
//! ## Query parameters
//!
//! - `limit` — page size; absent or non-numeric means unlimited
//! - `filter` — repeatable `key=value` equality predicates
//! - `startingAfter` — keyset cursor (id of the last record seen)
//! - `sortBy` — field to sort by
//! - `sortOrder` — `ASC` (default) or `DESC`
//!
//! Malformed query input is normalized permissively, never rejected.

use axum::extract::{Path, RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use idw_core::WalletId;
use idw_events::{EventLogFilter, EventLogFilterResult};
use uuid::Uuid;

use crate::auth::CallerSession;
use crate::error::AppError;
use crate::state::AppState;

/// Build the event-log router (session-guarded).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/eventlog", get(tenant_eventlog))
        .route("/v1/wallets/:wallet_id/eventlog", get(wallet_eventlog))
}

/// Parse the raw query string into an [`EventLogFilter`].
///
/// `filter` may repeat; for the scalar parameters the first occurrence
/// wins. Every value is accepted — unparseable pieces fall back to their
/// permissive defaults.
pub fn parse_eventlog_query(raw: Option<&str>) -> EventLogFilter {
    let mut limit: Option<String> = None;
    let mut filter_pairs: Vec<String> = Vec::new();
    let mut starting_after: Option<String> = None;
    let mut sort_by: Option<String> = None;
    let mut sort_order: Option<String> = None;

    if let Some(raw) = raw {
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "limit" => limit.get_or_insert(value.into_owned()),
                "filter" => {
                    filter_pairs.push(value.into_owned());
                    continue;
                }
                "startingAfter" => starting_after.get_or_insert(value.into_owned()),
                "sortBy" => sort_by.get_or_insert(value.into_owned()),
                "sortOrder" => sort_order.get_or_insert(value.into_owned()),
                _ => continue,
            };
        }
    }

    EventLogFilter::from_query_parts(
        limit.as_deref(),
        &filter_pairs,
        starting_after.as_deref(),
        sort_by.as_deref(),
        sort_order.as_deref(),
    )
}

/// GET /v1/eventlog — Query the signed-in tenant's event log.
#[utoipa::path(
    get,
    path = "/v1/eventlog",
    params(
        ("limit" = Option<String>, Query, description = "Page size; non-numeric means unlimited"),
        ("filter" = Option<Vec<String>>, Query, description = "Repeatable key=value predicates"),
        ("startingAfter" = Option<String>, Query, description = "Keyset cursor"),
        ("sortBy" = Option<String>, Query, description = "Field to sort by"),
        ("sortOrder" = Option<String>, Query, description = "ASC or DESC"),
    ),
    responses(
        (status = 200, description = "Event log page", body = EventLogFilterResult),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    tag = "eventlog"
)]
pub async fn tenant_eventlog(
    State(state): State<AppState>,
    session: CallerSession,
    RawQuery(query): RawQuery,
) -> Json<EventLogFilterResult> {
    let filter = parse_eventlog_query(query.as_deref());
    Json(state.events.filter(&session.tenant, None, &filter))
}

/// GET /v1/wallets/:wallet_id/eventlog — Query one wallet's events.
#[utoipa::path(
    get,
    path = "/v1/wallets/{wallet_id}/eventlog",
    params(
        ("wallet_id" = Uuid, Path, description = "Wallet UUID"),
        ("limit" = Option<String>, Query, description = "Page size; non-numeric means unlimited"),
        ("filter" = Option<Vec<String>>, Query, description = "Repeatable key=value predicates"),
        ("startingAfter" = Option<String>, Query, description = "Keyset cursor"),
        ("sortBy" = Option<String>, Query, description = "Field to sort by"),
        ("sortOrder" = Option<String>, Query, description = "ASC or DESC"),
    ),
    responses(
        (status = 200, description = "Event log page", body = EventLogFilterResult),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
        (status = 403, description = "Wallet not linked to the caller", body = crate::error::ErrorBody),
    ),
    tag = "eventlog"
)]
pub async fn wallet_eventlog(
    State(state): State<AppState>,
    session: CallerSession,
    Path(wallet_id): Path<Uuid>,
    RawQuery(query): RawQuery,
) -> Result<Json<EventLogFilterResult>, AppError> {
    let wallet = WalletId::from_uuid(wallet_id);
    let linked = state
        .wallet_links
        .read()
        .iter()
        .any(|l| l.tenant == session.tenant && l.account == session.account && l.wallet == wallet);
    if !linked {
        return Err(AppError::Forbidden(format!(
            "wallet {wallet} is not linked to the signed-in account"
        )));
    }

    let filter = parse_eventlog_query(query.as_deref());
    Ok(Json(state.events.filter(&session.tenant, Some(&wallet), &filter)))
}
