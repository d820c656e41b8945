#![deny(missing_docs)]

//! # idw-core — Foundational Types for the IDW Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `serde_json`,
//! `thiserror`, `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`WalletId`] where an [`AccountId`]
//!    is expected.
//!
//! 2. **Validation at construction.** String-based primitives
//!    ([`EmailAddress`], [`WalletAddress`], [`Did`]) validate format in
//!    their constructors and are valid for their whole lifetime.
//!
//! 3. **[`IdwError`] hierarchy.** Structured errors with `thiserror` — no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{IdwError, ValidationError};
pub use identity::{AccountId, Did, EmailAddress, EventId, IssuerId, Tenant, WalletAddress, WalletId};
pub use temporal::Timestamp;
