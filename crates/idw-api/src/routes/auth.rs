//! # Authentication API
//!
//! ## Endpoints
//!
//! - `POST /v1/auth/register` — Register an account (email or address
//!   credentials) and provision its defaults.
//! - `POST /v1/auth/login` — Authenticate and receive a session token.
//! - `POST /v1/auth/logout` — Revoke the current session (authenticated).

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{extract::State, Json, Router};

use crate::accounts::requests::AccountRequest;
use crate::accounts::{self, AuthenticationResult, RegistrationResult};
use crate::auth::{tenant_from_headers, CallerSession};
use crate::error::AppError;
use crate::state::AppState;

/// Build the unauthenticated auth router (register, login).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
}

/// Build the session-guarded auth router (logout).
pub fn session_router() -> Router<AppState> {
    Router::new().route("/v1/auth/logout", post(logout))
}

/// POST /v1/auth/register — Register an account.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Account registered", body = RegistrationResult),
        (status = 409, description = "Duplicate credential", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AccountRequest>,
) -> Result<(StatusCode, Json<RegistrationResult>), AppError> {
    let tenant = tenant_from_headers(&headers)?;
    let result = accounts::register(&state, &tenant, &request).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// POST /v1/auth/login — Authenticate and issue a session token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = AccountRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthenticationResult),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AccountRequest>,
) -> Result<Json<AuthenticationResult>, AppError> {
    let tenant = tenant_from_headers(&headers)?;
    let result = accounts::authenticate(&state, &tenant, &request).await?;
    Ok(Json(result))
}

/// POST /v1/auth/logout — Revoke the current session.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>, session: CallerSession) -> StatusCode {
    crate::auth::revoke_session(&state, &session.token);
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app(state: AppState) -> Router {
        router().with_state(state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn register_body(email: &str) -> String {
        serde_json::json!({
            "type": "email",
            "name": "Holder",
            "email": email,
            "password": "correct horse battery staple"
        })
        .to_string()
    }

    #[tokio::test]
    async fn register_returns_201_with_account_id() {
        let app = test_app(AppState::new());
        let req = Request::builder()
            .method("POST")
            .uri("/v1/auth/register")
            .header("content-type", "application/json")
            .body(Body::from(register_body("holder@example.com")))
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let result: RegistrationResult = body_json(resp).await;
        assert!(!result.id.to_string().is_empty());
    }

    #[tokio::test]
    async fn duplicate_register_returns_409() {
        let state = AppState::new();
        let app = test_app(state);

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = Request::builder()
                .method("POST")
                .uri("/v1/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(register_body("holder@example.com")))
                .unwrap();
            let resp = app.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), expected);
        }
    }

    #[tokio::test]
    async fn register_is_tenant_scoped_by_header() {
        let state = AppState::new();
        let app = test_app(state);

        for tenant in ["acme", "globex"] {
            let req = Request::builder()
                .method("POST")
                .uri("/v1/auth/register")
                .header("content-type", "application/json")
                .header("x-tenant", tenant)
                .body(Body::from(register_body("holder@example.com")))
                .unwrap();
            let resp = app.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }
    }

    #[tokio::test]
    async fn login_returns_token() {
        let state = AppState::new();
        let app = test_app(state);

        let req = Request::builder()
            .method("POST")
            .uri("/v1/auth/register")
            .header("content-type", "application/json")
            .body(Body::from(register_body("holder@example.com")))
            .unwrap();
        app.clone().oneshot(req).await.unwrap();

        let req = Request::builder()
            .method("POST")
            .uri("/v1/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(register_body("holder@example.com")))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let result: AuthenticationResult = body_json(resp).await;
        assert_eq!(result.username, "holder@example.com");
        assert_eq!(result.token.len(), 64);
    }

    #[tokio::test]
    async fn login_with_wrong_password_returns_401() {
        let state = AppState::new();
        let app = test_app(state);

        let req = Request::builder()
            .method("POST")
            .uri("/v1/auth/register")
            .header("content-type", "application/json")
            .body(Body::from(register_body("holder@example.com")))
            .unwrap();
        app.clone().oneshot(req).await.unwrap();

        let wrong = serde_json::json!({
            "type": "email",
            "email": "holder@example.com",
            "password": "nope"
        })
        .to_string();
        let req = Request::builder()
            .method("POST")
            .uri("/v1/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(wrong))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_email_returns_422() {
        let app = test_app(AppState::new());
        let req = Request::builder()
            .method("POST")
            .uri("/v1/auth/register")
            .header("content-type", "application/json")
            .body(Body::from(register_body("not-an-email")))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
