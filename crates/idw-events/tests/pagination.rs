//! Property tests for keyset pagination.
//!
//! The contract under test: concatenating pages obtained via repeated
//! `starting_after` cursors yields exactly the sequence of one unbounded
//! query with the same predicates and sort — no duplicates, no gaps —
//! regardless of page size, sort field, or direction.

use idw_core::{AccountId, EventId, Tenant};
use idw_events::{
    filter_events, Event, EventAction, EventLogFilter, SortOrder, ORIGINATOR_WALLET,
};
use proptest::prelude::*;

fn build_events(names: &[String]) -> Vec<Event> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut event = Event::new(
                if i % 3 == 0 {
                    EventAction::AccountLogin
                } else {
                    EventAction::AccountCreate
                },
                Tenant::default_tenant(),
                ORIGINATOR_WALLET,
                AccountId::new(),
                None,
                serde_json::json!({ "account_id": name }),
            );
            event.seq = i as u64;
            event
        })
        .collect()
}

fn page_through(events: &[Event], filter: &EventLogFilter) -> Vec<EventId> {
    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;
    // Bounded loop: every page with a next-cursor is non-empty, so the
    // number of iterations is bounded by the event count.
    for _ in 0..=events.len() {
        let page = filter_events(
            events.to_vec(),
            &EventLogFilter {
                starting_after: cursor.clone(),
                ..filter.clone()
            },
        );
        collected.extend(page.events.iter().map(|e| e.id));
        match page.next_starting_after {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    collected
}

proptest! {
    #[test]
    fn paged_equals_unbounded(
        names in proptest::collection::vec("[a-d]{1,2}", 0..40),
        limit in 1i64..7,
        sort_by_payload in any::<bool>(),
        descending in any::<bool>(),
    ) {
        let events = build_events(&names);
        let base = EventLogFilter {
            limit,
            sort_by: sort_by_payload.then(|| "account_id".to_string()),
            sort_order: if descending { SortOrder::Desc } else { SortOrder::Asc },
            ..Default::default()
        };

        let unbounded = filter_events(events.clone(), &EventLogFilter {
            limit: -1,
            ..base.clone()
        });
        let expected: Vec<EventId> = unbounded.events.iter().map(|e| e.id).collect();

        let paged = page_through(&events, &base);
        prop_assert_eq!(paged, expected);
    }

    #[test]
    fn pages_never_exceed_limit(
        names in proptest::collection::vec("[a-c]{1}", 0..30),
        limit in 1i64..5,
    ) {
        let events = build_events(&names);
        let mut cursor: Option<String> = None;
        for _ in 0..=events.len() {
            let page = filter_events(events.clone(), &EventLogFilter {
                limit,
                starting_after: cursor.clone(),
                ..Default::default()
            });
            prop_assert!(page.events.len() <= limit as usize);
            match page.next_starting_after {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
    }
}
