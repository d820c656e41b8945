//! # OpenAPI Document
//!
//! OpenAPI 3 specification generated from utoipa derive annotations and
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// The API's OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "IDW Stack API",
        description = "Multi-tenant identity-wallet platform: account registration \
                       and authentication across credential strategies, wallet \
                       listings, and the queryable audit event log."
    ),
    paths(
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::wallets::list_wallets,
        crate::routes::eventlog::tenant_eventlog,
        crate::routes::eventlog::wallet_eventlog,
    ),
    components(schemas(
        crate::accounts::requests::AccountRequest,
        crate::accounts::requests::EmailAccountRequest,
        crate::accounts::requests::AddressAccountRequest,
        crate::accounts::RegistrationResult,
        crate::accounts::AuthenticationResult,
        crate::accounts::AccountWalletListing,
        crate::accounts::WalletListing,
        crate::state::WalletPermission,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        idw_events::Event,
        idw_events::EventAction,
        idw_events::AccountEventData,
        idw_events::EventLogFilterResult,
    )),
    tags(
        (name = "auth", description = "Registration, login, logout"),
        (name = "wallets", description = "Wallet listings"),
        (name = "eventlog", description = "Audit event log queries"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
