//! Event-log query filters and their permissive parsing.
//!
//! The web layer hands the engine raw query-parameter strings. Parsing
//! never fails: unparseable limits become "unlimited", filter pairs
//! without `=` map the whole token to the empty string, and unknown sort
//! orders fall back to ascending.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sentinel limit meaning "no limit".
pub const UNLIMITED: i64 = -1;

/// Sort direction for event-log queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending (the default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Parse a sort order, case-insensitively. Absent or unrecognized
    /// input yields ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    /// Return the canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A parsed event-log query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventLogFilter {
    /// Maximum records per page. [`UNLIMITED`] (−1) means no limit.
    pub limit: i64,
    /// Cursor: id of the last record of the previous page. Only records
    /// strictly after it in the current sort order are returned.
    pub starting_after: Option<String>,
    /// Field to sort by; `None` means insertion order.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Equality predicates over the event field view, ANDed together.
    pub data: HashMap<String, String>,
}

impl Default for EventLogFilter {
    fn default() -> Self {
        Self {
            limit: UNLIMITED,
            starting_after: None,
            sort_by: None,
            sort_order: SortOrder::Asc,
            data: HashMap::new(),
        }
    }
}

impl EventLogFilter {
    /// Assemble a filter from raw query-parameter values, applying the
    /// permissive parsing rules for each piece.
    pub fn from_query_parts(
        limit: Option<&str>,
        filter_pairs: &[String],
        starting_after: Option<&str>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> Self {
        Self {
            limit: parse_limit(limit),
            starting_after: starting_after.map(str::to_string),
            sort_by: sort_by.map(str::to_string),
            sort_order: SortOrder::parse(sort_order),
            data: parse_filter_pairs(filter_pairs),
        }
    }
}

/// Parse a limit parameter. Absent or non-numeric input yields
/// [`UNLIMITED`], never an error.
pub fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(UNLIMITED)
}

/// Parse `key=value` filter pairs into an equality-predicate map.
///
/// The split is at the first `=`; a token without one maps the whole
/// token to the empty string. Later duplicates of a key win.
pub fn parse_filter_pairs(pairs: &[String]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.clone(), String::new()),
        })
        .collect()
}
