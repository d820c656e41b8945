#![deny(missing_docs)]

//! # idw-events — Append-Only Audit Event Log
//!
//! The activity log behind the wallet platform's audit trail and UI
//! history. Three pieces:
//!
//! - [`Event`] / [`EventAction`] — immutable, typed audit records with a
//!   JSON data payload and a per-log sequence number.
//! - [`EventLog`] — the append-only in-memory store. Events are totally
//!   ordered per tenant by their sequence number; appends assign the
//!   sequence under the write lock. Records are never mutated or deleted.
//! - [`EventLogFilter`] / [`filter_events`] — a small ad-hoc query engine:
//!   equality predicates over a unified field view (logical AND), a
//!   sortable field, and cursor-based keyset pagination that is stable
//!   under concurrent appends.
//!
//! Query-input parsing is deliberately permissive: a non-numeric `limit`
//! means "unlimited", a filter pair without `=` maps the whole token to
//! the empty string, and an unknown sort order falls back to ascending.
//! Malformed query input is never an error.

pub mod event;
pub mod filter;
pub mod log;
pub mod query;

pub use event::{AccountEventData, Event, EventAction, ORIGINATOR_WALLET};
pub use filter::{parse_filter_pairs, parse_limit, EventLogFilter, SortOrder};
pub use log::EventLog;
pub use query::{filter_events, EventLogFilterResult};
