//! # Session Authentication
//!
//! Opaque bearer tokens issued at login. Tokens are 32 random bytes,
//! hex-encoded; the session store keys them by SHA-256 digest so raw
//! tokens are never at rest. The middleware resolves the token to a
//! [`CallerSession`] and injects it into request extensions for
//! handlers.
//!
//! Tenancy: unauthenticated endpoints (register, login) resolve the
//! tenant from the `X-Tenant` header, defaulting to the unnamed tenant.
//! Authenticated endpoints take the tenant from the session.

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use idw_core::{AccountId, Tenant};
use idw_crypto::{hex_encode, sha256_hex};
use rand_core::{OsRng, RngCore};

use crate::error::{AppError, ErrorBody, ErrorDetail};
use crate::state::{AppState, SessionRecord};

/// Name of the tenant-selection header on unauthenticated endpoints.
pub const TENANT_HEADER: &str = "x-tenant";

// ── Token issuance ──────────────────────────────────────────────────────────

/// Generate a fresh opaque session token: 32 random bytes, hex-encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex_encode(&bytes)
}

/// Issue a session for an authenticated account. Returns the raw token;
/// only its digest is stored.
pub fn create_session(
    state: &AppState,
    tenant: &Tenant,
    account: AccountId,
    username: &str,
) -> String {
    let token = generate_token();
    let record = SessionRecord {
        account,
        tenant: tenant.clone(),
        username: username.to_string(),
        created_at: Utc::now(),
    };
    state
        .sessions
        .write()
        .insert(sha256_hex(token.as_bytes()), record);
    token
}

/// Resolve a raw token to its session, if one exists.
pub fn resolve_session(state: &AppState, token: &str) -> Option<SessionRecord> {
    state
        .sessions
        .read()
        .get(&sha256_hex(token.as_bytes()))
        .cloned()
}

/// Revoke the session behind a raw token. Returns whether one existed.
pub fn revoke_session(state: &AppState, token: &str) -> bool {
    state
        .sessions
        .write()
        .remove(&sha256_hex(token.as_bytes()))
        .is_some()
}

// ── Caller session ──────────────────────────────────────────────────────────

/// The authenticated caller, extracted from the session token and
/// available to route handlers via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerSession {
    /// The session's account.
    pub account: AccountId,
    /// Tenant the session belongs to.
    pub tenant: Tenant,
    /// Login identifier captured at authentication time.
    pub username: String,
    /// The raw bearer token (needed for logout).
    pub token: String,
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerSession>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no session in request context".into()))
    }
}

/// Resolve the tenant for an unauthenticated endpoint from the
/// `X-Tenant` header. Absent header means the default tenant.
pub fn tenant_from_headers(headers: &HeaderMap) -> Result<Tenant, AppError> {
    match headers.get(TENANT_HEADER) {
        Some(value) => {
            let label = value
                .to_str()
                .map_err(|_| AppError::Validation("X-Tenant header is not valid UTF-8".into()))?;
            Tenant::new(label).map_err(|e| AppError::Validation(e.to_string()))
        }
        None => Ok(Tenant::default_tenant()),
    }
}

// ── Middleware ──────────────────────────────────────────────────────────────

/// Require a valid session token on the request.
///
/// Expects `Authorization: Bearer <token>`; resolves the token against
/// the session store and injects a [`CallerSession`] for handlers.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) if header_value.starts_with("Bearer ") => {
            let token = header_value[7..].to_string();
            match resolve_session(&state, &token) {
                Some(session) => {
                    request.extensions_mut().insert(CallerSession {
                        account: session.account,
                        tenant: session.tenant,
                        username: session.username,
                        token,
                    });
                    next.run(request).await
                }
                None => {
                    tracing::warn!("authentication failed: unknown or expired session token");
                    unauthorized_response("invalid session token")
                }
            }
        }
        Some(_) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            unauthorized_response("authorization header must use Bearer scheme")
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
