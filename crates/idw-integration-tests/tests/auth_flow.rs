//! Authentication and session lifecycle, exercised through the public
//! HTTP surface.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use idw_api::accounts::AuthenticationResult;
use idw_api::state::AppState;
use idw_core::Tenant;
use idw_crypto::SigningKey;
use idw_events::EventAction;
use rand_core::OsRng;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(app: &axum::Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

fn email_credentials(password: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "email",
        "email": "holder@example.com",
        "password": password
    })
}

#[tokio::test]
async fn login_returns_matching_identity_and_fresh_tokens() {
    let state = AppState::new();
    let app = idw_api::app(state.clone());

    let registered: idw_api::accounts::RegistrationResult = body_json(
        post_json(&app, "/v1/auth/register", email_credentials("pw-12345678")).await,
    )
    .await;

    let first: AuthenticationResult =
        body_json(post_json(&app, "/v1/auth/login", email_credentials("pw-12345678")).await).await;
    let second: AuthenticationResult =
        body_json(post_json(&app, "/v1/auth/login", email_credentials("pw-12345678")).await).await;

    assert_eq!(first.id, registered.id);
    assert_eq!(first.username, "holder@example.com");
    assert!(!first.token.is_empty());
    assert_ne!(first.token, second.token, "tokens must be distinct per login");

    // Exactly one login event per successful call.
    let logins: Vec<_> = state
        .events
        .all_for_tenant(&Tenant::default_tenant())
        .into_iter()
        .filter(|e| e.action == EventAction::AccountLogin)
        .collect();
    assert_eq!(logins.len(), 2);
    assert!(logins.iter().all(|e| e.wallet.is_none()));
    assert!(logins
        .iter()
        .all(|e| e.data["account_id"] == "holder@example.com"));
}

#[tokio::test]
async fn failed_login_returns_401_and_emits_no_event() {
    let state = AppState::new();
    let app = idw_api::app(state.clone());
    post_json(&app, "/v1/auth/register", email_credentials("right-password")).await;
    let events_before = state.events.len();

    let resp = post_json(&app, "/v1/auth/login", email_credentials("wrong-password")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(state.events.len(), events_before);
}

#[tokio::test]
async fn session_token_grants_access_until_logout() {
    let state = AppState::new();
    let app = idw_api::app(state.clone());
    post_json(&app, "/v1/auth/register", email_credentials("pw-12345678")).await;
    let auth: AuthenticationResult =
        body_json(post_json(&app, "/v1/auth/login", email_credentials("pw-12345678")).await).await;

    // Token works.
    let req = Request::builder()
        .uri("/v1/accounts/wallets")
        .header("Authorization", format!("Bearer {}", auth.token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Logout revokes it.
    let req = Request::builder()
        .method("POST")
        .uri("/v1/auth/logout")
        .header("Authorization", format!("Bearer {}", auth.token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = Request::builder()
        .uri("/v1/accounts/wallets")
        .header("Authorization", format!("Bearer {}", auth.token))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wallet_address_account_registers_and_logs_in() {
    let state = AppState::new();
    let app = idw_api::app(state.clone());

    let key = SigningKey::generate(&mut OsRng);
    let address =
        idw_api::accounts::strategy::derive_address(&key.verifying_key()).to_string();
    let request = |challenge: &str| {
        serde_json::json!({
            "type": "address",
            "address": address,
            "public_key": key.verifying_key().to_hex(),
            "challenge": challenge,
            "signature": key.sign(challenge.as_bytes()).to_hex()
        })
    };

    let resp = post_json(&app, "/v1/auth/register", request("register-challenge")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = post_json(&app, "/v1/auth/login", request("login-challenge")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let auth: AuthenticationResult = body_json(resp).await;
    assert_eq!(auth.username, address);

    // A signature from a different key is rejected.
    let other = SigningKey::generate(&mut OsRng);
    let forged = serde_json::json!({
        "type": "address",
        "address": address,
        "public_key": other.verifying_key().to_hex(),
        "challenge": "login-challenge",
        "signature": other.sign(b"login-challenge").to_hex()
    });
    let resp = post_json(&app, "/v1/auth/login", forged).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
