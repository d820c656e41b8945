//! The event-log query engine.
//!
//! Operates on a tenant-scoped snapshot of events: applies equality
//! predicates, sorts by a named field, and pages with a keyset cursor.
//!
//! ## Field view
//!
//! Predicates and sort keys address a unified string view of each event:
//! the intrinsic fields `id`, `action`, `tenant`, `originator`, `account`,
//! `wallet`, `timestamp`, plus every top-level key of the JSON payload
//! whose value is a string, number, or boolean.
//!
//! ## Cursor stability
//!
//! The engine's total order is (sort key, seq). The cursor names a record
//! by id; everything at or before that record's position in the total
//! order is excluded from the page. Because seq is append-monotonic and
//! records are immutable, repeated paging never re-sees a record, even
//! when unrelated events are appended between fetches.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::event::Event;
use crate::filter::{EventLogFilter, SortOrder};

/// One page of query results.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventLogFilterResult {
    /// The page of matching events, in query order.
    pub events: Vec<Event>,
    /// Total number of records matching the predicates (all pages).
    pub total: usize,
    /// Cursor for the next page; `None` when this page exhausts the
    /// result set.
    pub next_starting_after: Option<String>,
}

/// Resolve a named field of the unified field view to a string.
///
/// Returns `None` when the event has no such field (e.g. `wallet` on a
/// login event, or an absent payload key).
pub fn field_value(event: &Event, field: &str) -> Option<String> {
    match field {
        "id" => Some(event.id.to_string()),
        "action" => Some(event.action.as_str().to_string()),
        "tenant" => Some(event.tenant.as_str().to_string()),
        "originator" => Some(event.originator.clone()),
        "account" => Some(event.account.to_string()),
        "wallet" => event.wallet.map(|w| w.to_string()),
        "timestamp" => Some(event.timestamp.to_canonical_string()),
        key => match event.data.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        },
    }
}

/// Whether an event satisfies every equality predicate.
fn matches(event: &Event, predicates: &HashMap<String, String>) -> bool {
    predicates
        .iter()
        .all(|(field, expected)| field_value(event, field).as_deref() == Some(expected.as_str()))
}

/// Total-order comparator for the current sort: (sort key, seq), reversed
/// wholesale for descending. Records missing the sort key order before
/// records that have it (ascending).
fn compare(a: &Event, b: &Event, sort_by: Option<&str>, order: SortOrder) -> Ordering {
    let ord = match sort_by {
        Some(field) => field_value(a, field)
            .cmp(&field_value(b, field))
            .then(a.seq.cmp(&b.seq)),
        None => a.seq.cmp(&b.seq),
    };
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

/// Run a query against a snapshot of events.
///
/// The snapshot is expected to be tenant-scoped (and wallet-scoped when
/// applicable) already; this function applies predicates, ordering, and
/// pagination only.
pub fn filter_events(snapshot: Vec<Event>, filter: &EventLogFilter) -> EventLogFilterResult {
    let mut matching: Vec<Event> = snapshot
        .into_iter()
        .filter(|e| matches(e, &filter.data))
        .collect();
    matching.sort_by(|a, b| compare(a, b, filter.sort_by.as_deref(), filter.sort_order));

    let total = matching.len();

    // Keyset cursor: drop everything at or before the cursor record's
    // position in the total order. An unknown cursor starts from the top.
    let after_cursor: Vec<Event> = match &filter.starting_after {
        Some(cursor) => match matching.iter().position(|e| e.id.to_string() == *cursor) {
            Some(pos) => matching.split_off(pos + 1),
            None => matching,
        },
        None => matching,
    };

    let (page, has_more) = if filter.limit < 0 {
        (after_cursor, false)
    } else {
        let limit = filter.limit as usize;
        let has_more = after_cursor.len() > limit;
        let page: Vec<Event> = after_cursor.into_iter().take(limit).collect();
        (page, has_more)
    };

    let next_starting_after = if has_more {
        page.last().map(|e| e.id.to_string())
    } else {
        None
    };

    EventLogFilterResult {
        events: page,
        total,
        next_starting_after,
    }
}
