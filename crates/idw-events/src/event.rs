//! Audit event records.
//!
//! Events are immutable once appended. Each record names the action, the
//! tenant it happened in, the subsystem that reported it, the affected
//! account, optionally the affected wallet, and an action-specific JSON
//! payload.

use idw_core::{AccountId, EventId, Tenant, Timestamp, WalletId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Originator label for events emitted by the account/wallet core.
pub const ORIGINATOR_WALLET: &str = "wallet";

/// The typed action an event records.
///
/// Serialized in dotted `Domain.Verb` form (`Account.Create`), which is
/// also the value matched by event-log `action` filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EventAction {
    /// An account was registered and its initial wallet provisioned.
    #[serde(rename = "Account.Create")]
    AccountCreate,
    /// An account authenticated successfully.
    #[serde(rename = "Account.Login")]
    AccountLogin,
}

impl EventAction {
    /// Return the dotted string form of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountCreate => "Account.Create",
            Self::AccountLogin => "Account.Login",
        }
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Account.Create" => Ok(Self::AccountCreate),
            "Account.Login" => Ok(Self::AccountLogin),
            other => Err(format!("unknown event action: {other}")),
        }
    }
}

/// Payload for account-domain events.
///
/// `account_id` carries the account's display identifier (email, address,
/// or chosen name) — not the UUID, which is already on the event itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountEventData {
    /// Display identifier of the affected account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl AccountEventData {
    /// Build a payload from a display identifier.
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
        }
    }

    /// Convert to the event's JSON payload representation.
    pub fn to_value(&self) -> serde_json::Value {
        // Serialization of this struct cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// An immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Unique event identifier. Doubles as the pagination cursor.
    #[schema(value_type = String)]
    pub id: EventId,
    /// Position in the log's total order. Assigned by [`crate::EventLog`]
    /// on append; zero until then.
    pub seq: u64,
    /// The action this event records.
    pub action: EventAction,
    /// Tenant the event belongs to.
    #[schema(value_type = String)]
    pub tenant: Tenant,
    /// Free-text name of the subsystem that emitted the event.
    pub originator: String,
    /// The affected account.
    #[schema(value_type = String)]
    pub account: AccountId,
    /// The affected wallet, when the action concerns one.
    #[schema(value_type = Option<String>)]
    pub wallet: Option<WalletId>,
    /// Action-specific JSON payload.
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    /// When the event was recorded.
    #[schema(value_type = String)]
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a new event record, stamped with the current time.
    ///
    /// The sequence number is assigned when the event is appended to a
    /// log.
    pub fn new(
        action: EventAction,
        tenant: Tenant,
        originator: impl Into<String>,
        account: AccountId,
        wallet: Option<WalletId>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            seq: 0,
            action,
            tenant,
            originator: originator.into(),
            account,
            wallet,
            data,
            timestamp: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_dotted_form() {
        assert_eq!(EventAction::AccountCreate.as_str(), "Account.Create");
        assert_eq!(EventAction::AccountLogin.as_str(), "Account.Login");
    }

    #[test]
    fn action_serializes_dotted() {
        let json = serde_json::to_string(&EventAction::AccountCreate).unwrap();
        assert_eq!(json, "\"Account.Create\"");
    }

    #[test]
    fn action_deserializes_dotted() {
        let action: EventAction = serde_json::from_str("\"Account.Login\"").unwrap();
        assert_eq!(action, EventAction::AccountLogin);
    }

    #[test]
    fn action_parses_from_str() {
        assert_eq!(
            "Account.Create".parse::<EventAction>().unwrap(),
            EventAction::AccountCreate
        );
        assert!("Account.Delete".parse::<EventAction>().is_err());
    }

    #[test]
    fn account_event_data_payload_shape() {
        let data = AccountEventData::new("holder@example.com").to_value();
        assert_eq!(data["account_id"], "holder@example.com");
    }

    #[test]
    fn new_event_has_zero_seq() {
        let event = Event::new(
            EventAction::AccountCreate,
            Tenant::default_tenant(),
            ORIGINATOR_WALLET,
            AccountId::new(),
            None,
            serde_json::json!({}),
        );
        assert_eq!(event.seq, 0);
        assert_eq!(event.originator, "wallet");
    }

    #[test]
    fn events_get_distinct_ids() {
        let mk = || {
            Event::new(
                EventAction::AccountLogin,
                Tenant::default_tenant(),
                ORIGINATOR_WALLET,
                AccountId::new(),
                None,
                serde_json::Value::Null,
            )
        };
        assert_ne!(mk().id, mk().id);
    }
}
