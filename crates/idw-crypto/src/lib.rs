#![deny(missing_docs)]

//! # idw-crypto — Cryptographic Primitives for the IDW Stack
//!
//! A thin, opinionated layer over the ecosystem crates this stack signs,
//! hashes, and verifies with:
//!
//! - **Ed25519** ([`SigningKey`], [`VerifyingKey`]) — key material behind
//!   `did:key` identifiers and wallet-address ownership proofs.
//! - **SHA-256** ([`sha256_hex`]) — session-token digests and content
//!   addressing.
//! - **Argon2id** ([`password`]) — password credential hashing for the
//!   email strategy.
//! - **Hex** ([`hex_encode`], [`hex_decode`]) — the stack-wide binary
//!   text encoding.
//!
//! Private key material is zeroized on drop and never exposed through
//! `Debug`.

pub mod ed25519;
pub mod error;
pub mod password;
pub mod sha256;

pub use ed25519::{hex_decode, hex_encode, Signature, SigningKey, VerifyingKey};
pub use error::CryptoError;
pub use sha256::sha256_hex;
