//! The append-only event log store.
//!
//! In-memory, thread-safe, cloneable. Appends assign the per-log sequence
//! number under the write lock, which makes the sequence the per-tenant
//! total order required by the audit trail. Records are never mutated or
//! deleted. The lock is `parking_lot` and is never held across `.await`
//! points.

use std::sync::Arc;

use idw_core::{Tenant, WalletId};
use parking_lot::RwLock;

use crate::event::Event;
use crate::filter::EventLogFilter;
use crate::query::{filter_events, EventLogFilterResult};

#[derive(Debug, Default)]
struct Inner {
    events: Vec<Event>,
    next_seq: u64,
}

/// Thread-safe, append-only event log.
#[derive(Debug, Default)]
pub struct EventLog {
    inner: Arc<RwLock<Inner>>,
}

impl Clone for EventLog {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, assigning its sequence number. Returns the stored
    /// record.
    pub fn append(&self, mut event: Event) -> Event {
        let mut inner = self.inner.write();
        event.seq = inner.next_seq;
        inner.next_seq += 1;
        inner.events.push(event.clone());
        event
    }

    /// Snapshot all events for a tenant, in log order.
    pub fn all_for_tenant(&self, tenant: &Tenant) -> Vec<Event> {
        self.inner
            .read()
            .events
            .iter()
            .filter(|e| &e.tenant == tenant)
            .cloned()
            .collect()
    }

    /// Run a query scoped to a tenant and, optionally, a wallet.
    pub fn filter(
        &self,
        tenant: &Tenant,
        wallet: Option<&WalletId>,
        filter: &EventLogFilter,
    ) -> EventLogFilterResult {
        let snapshot: Vec<Event> = self
            .inner
            .read()
            .events
            .iter()
            .filter(|e| &e.tenant == tenant)
            .filter(|e| match wallet {
                Some(w) => e.wallet.as_ref() == Some(w),
                None => true,
            })
            .cloned()
            .collect();
        filter_events(snapshot, filter)
    }

    /// Replace the log contents from persisted records, preserving their
    /// sequence numbers. Used once at startup to hydrate from the
    /// database.
    pub fn hydrate(&self, mut events: Vec<Event>) {
        events.sort_by_key(|e| e.seq);
        let next_seq = events.last().map(|e| e.seq + 1).unwrap_or(0);
        let mut inner = self.inner.write();
        inner.events = events;
        inner.next_seq = next_seq;
    }

    /// Number of events across all tenants.
    pub fn len(&self) -> usize {
        self.inner.read().events.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AccountEventData, EventAction, ORIGINATOR_WALLET};
    use idw_core::AccountId;

    fn event_for(tenant: &Tenant, wallet: Option<WalletId>) -> Event {
        Event::new(
            EventAction::AccountCreate,
            tenant.clone(),
            ORIGINATOR_WALLET,
            AccountId::new(),
            wallet,
            AccountEventData::new("holder@example.com").to_value(),
        )
    }

    #[test]
    fn append_assigns_monotonic_seq() {
        let log = EventLog::new();
        let tenant = Tenant::default_tenant();
        let a = log.append(event_for(&tenant, None));
        let b = log.append(event_for(&tenant, None));
        assert_eq!(a.seq, 0);
        assert_eq!(b.seq, 1);
    }

    #[test]
    fn tenants_are_isolated() {
        let log = EventLog::new();
        let acme = Tenant::new("acme").unwrap();
        let globex = Tenant::new("globex").unwrap();
        log.append(event_for(&acme, None));
        log.append(event_for(&globex, None));
        log.append(event_for(&acme, None));

        assert_eq!(log.all_for_tenant(&acme).len(), 2);
        assert_eq!(log.all_for_tenant(&globex).len(), 1);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn wallet_scope_excludes_other_wallets_and_walletless_events() {
        let log = EventLog::new();
        let tenant = Tenant::default_tenant();
        let wallet = WalletId::new();
        log.append(event_for(&tenant, Some(wallet)));
        log.append(event_for(&tenant, Some(WalletId::new())));
        log.append(event_for(&tenant, None));

        let result = log.filter(&tenant, Some(&wallet), &EventLogFilter::default());
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].wallet, Some(wallet));
    }

    #[test]
    fn clone_shares_the_log() {
        let log = EventLog::new();
        let clone = log.clone();
        clone.append(event_for(&Tenant::default_tenant(), None));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn hydrate_restores_order_and_next_seq() {
        let log = EventLog::new();
        let tenant = Tenant::default_tenant();
        let mut a = event_for(&tenant, None);
        a.seq = 7;
        let mut b = event_for(&tenant, None);
        b.seq = 3;
        log.hydrate(vec![a, b]);

        let all = log.all_for_tenant(&tenant);
        assert_eq!(all[0].seq, 3);
        assert_eq!(all[1].seq, 7);

        let appended = log.append(event_for(&tenant, None));
        assert_eq!(appended.seq, 8);
    }

    #[test]
    fn hydrate_empty_resets_seq() {
        let log = EventLog::new();
        log.hydrate(vec![]);
        let appended = log.append(event_for(&Tenant::default_tenant(), None));
        assert_eq!(appended.seq, 0);
    }
}
