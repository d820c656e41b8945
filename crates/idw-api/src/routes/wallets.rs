//! # Wallet Listing API
//!
//! ## Endpoints
//!
//! - `GET /v1/accounts/wallets` — Wallets linked to the signed-in
//!   account, in storage insertion order.

use axum::routing::get;
use axum::{extract::State, Json, Router};

use crate::accounts::{self, AccountWalletListing};
use crate::auth::CallerSession;
use crate::state::AppState;

/// Build the wallets router (session-guarded).
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/accounts/wallets", get(list_wallets))
}

/// GET /v1/accounts/wallets — Wallets of the signed-in account.
#[utoipa::path(
    get,
    path = "/v1/accounts/wallets",
    responses(
        (status = 200, description = "Wallet listing", body = AccountWalletListing),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    tag = "wallets"
)]
pub async fn list_wallets(
    State(state): State<AppState>,
    session: CallerSession,
) -> Json<AccountWalletListing> {
    Json(accounts::account_wallet_listing(
        &state,
        &session.tenant,
        session.account,
    ))
}
