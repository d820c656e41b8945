//! End-to-end registration workflow invariants, exercised through the
//! public HTTP surface.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use idw_api::accounts::{self, RegistrationResult};
use idw_api::state::{AppState, IssuerRecord, WalletPermission};
use idw_core::{IssuerId, Tenant};
use idw_events::EventAction;
use tower::ServiceExt;

fn register_body(email: &str, name: &str) -> String {
    serde_json::json!({
        "type": "email",
        "name": name,
        "email": email,
        "password": "correct horse battery staple"
    })
    .to_string()
}

async fn post_register(app: &axum::Router, email: &str) -> axum::response::Response {
    let req = Request::builder()
        .method("POST")
        .uri("/v1/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(register_body(email, "Holder")))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

#[tokio::test]
async fn register_creates_exactly_one_of_everything() {
    let state = AppState::new();
    let app = idw_api::app(state.clone());

    let resp = post_register(&app, "holder@example.com").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let result: RegistrationResult = serde_json::from_slice(&bytes).unwrap();

    // Exactly one account.
    assert_eq!(state.accounts.len(), 1);

    // Exactly one wallet with one owner-permission link.
    assert_eq!(state.wallets.len(), 1);
    let links = state.wallet_links.read().clone();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].account, result.id);
    assert_eq!(links[0].permission, WalletPermission::Owner);

    // Exactly one DID, kind "key", marked default.
    let dids = state.dids.read().clone();
    assert_eq!(dids.len(), 1);
    assert_eq!(dids[0].kind, "key");
    assert_eq!(dids[0].alias, "Onboarding");
    assert!(dids[0].default);

    // Exactly one Account.Create event, emitted before the call
    // returned.
    let events = state.events.all_for_tenant(&Tenant::default_tenant());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, EventAction::AccountCreate);
    assert_eq!(events[0].account, result.id);
    assert_eq!(events[0].wallet, Some(links[0].wallet));
}

#[tokio::test]
async fn duplicate_email_registration_creates_no_records() {
    let state = AppState::new();
    let app = idw_api::app(state.clone());

    assert_eq!(
        post_register(&app, "holder@example.com").await.status(),
        StatusCode::CREATED
    );
    let accounts_before = state.accounts.len();
    let wallets_before = state.wallets.len();
    let events_before = state.events.len();

    let resp = post_register(&app, "holder@example.com").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    assert_eq!(state.accounts.len(), accounts_before);
    assert_eq!(state.wallets.len(), wallets_before);
    assert_eq!(state.events.len(), events_before);
}

#[tokio::test]
async fn same_email_registers_in_two_tenants() {
    let state = AppState::new();
    let app = idw_api::app(state.clone());

    for tenant in ["acme", "globex"] {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/auth/register")
            .header("content-type", "application/json")
            .header("x-tenant", tenant)
            .body(Body::from(register_body("holder@example.com", "Holder")))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED, "tenant {tenant}");
    }
    assert_eq!(state.accounts.len(), 2);
    assert_eq!(
        state.events.all_for_tenant(&Tenant::new("acme").unwrap()).len(),
        1
    );
}

#[tokio::test]
async fn issuer_link_is_created_only_when_directory_has_default_issuer() {
    // With the default issuer seeded.
    let state = AppState::new();
    let issuer = IssuerRecord {
        id: IssuerId::new(),
        name: "walt.id".to_string(),
        description: None,
    };
    state.issuers.insert(*issuer.id.as_uuid(), issuer.clone());
    let app = idw_api::app(state.clone());

    post_register(&app, "holder@example.com").await;
    let links = state.issuer_links.read().clone();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].issuer, issuer.id);

    // Without it: registration still succeeds, no link.
    let bare = AppState::new();
    let bare_app = idw_api::app(bare.clone());
    let resp = post_register(&bare_app, "holder@example.com").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(bare.issuer_links.read().is_empty());
}

#[tokio::test]
async fn provisioner_failure_after_account_creation_surfaces_as_internal_error() {
    // Remote provisioner pointed at a dead endpoint: step 1 (account
    // creation) succeeds, step 2 (wallet) fails, and the workflow wraps
    // the cause.
    let client = idw_provision_client::ProvisionerClient::new(
        idw_provision_client::ProvisionerConfig::local_mock("http://127.0.0.1:9", "token")
            .unwrap(),
    )
    .unwrap();
    let state = AppState::with_config(Default::default(), Some(client), None);
    let app = idw_api::app(state.clone());

    let resp = post_register(&app, "holder@example.com").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The account row from step 1 is not rolled back.
    assert_eq!(state.accounts.len(), 1);
    assert!(state.wallets.is_empty());
    assert!(state
        .events
        .all_for_tenant(&Tenant::default_tenant())
        .is_empty());
}

#[tokio::test]
async fn directory_display_name_is_hard_error_for_unknown_account() {
    let state = AppState::new();
    let missing = idw_core::AccountId::new();
    assert!(accounts::account_display_name(&state, missing).is_err());
}
