//! # API Route Modules
//!
//! - `auth` — registration, login, and logout.
//! - `wallets` — the signed-in account's wallet listing.
//! - `eventlog` — tenant- and wallet-scoped audit log queries.
//!
//! Registration and login are unauthenticated (tenant selected via the
//! `X-Tenant` header); everything else requires a session token.

pub mod auth;
pub mod eventlog;
pub mod wallets;
