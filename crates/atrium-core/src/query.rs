//! # Query Engine
//!
//! Filter, search and paginate a snapshot of the customer collection.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    List Pipeline                                        │
//! │                                                                         │
//! │  snapshot (insertion order)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  status filter   exact match, only if a status was given               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  search filter   case-insensitive substring in name | email | company  │
//! │       │                                                                 │
//! │       ├──► total = number of matches                                   │
//! │       ▼                                                                 │
//! │  skip(offset).take(limit)  →  Page { items, total, limit, offset }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here sorts: matches keep the order they have in the snapshot.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Customer;

/// Page size when the caller gives none.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Largest page a caller may ask for.
pub const MAX_PAGE_LIMIT: usize = 500;

// =============================================================================
// List Query
// =============================================================================

/// Filters and pagination for a listing.
///
/// Missing fields take their defaults when deserialized; `run` caps the
/// limit however the query was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Exact status to keep.
    pub status: Option<String>,
    /// Case-insensitive substring to look for.
    pub search: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            status: None,
            search: None,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl ListQuery {
    /// Creates a query with no filters and default pagination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only customers with this exact status.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = non_blank(Some(status.into()));
        self
    }

    /// Keeps only customers whose name, email or company contain `term`.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = non_blank(Some(term.into()));
        self
    }

    /// Sets the page size (capped at [`MAX_PAGE_LIMIT`]).
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_PAGE_LIMIT);
        self
    }

    /// Sets how many matches to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Builds a query from raw transport values (e.g. URL query strings).
    ///
    /// ## Coercion Rules
    /// ```text
    /// limit   missing / non-numeric / negative  → 50
    ///         above 500                         → 500
    /// offset  missing / non-numeric             → 0
    ///         negative                          → 0
    /// status, search  blank                     → no filter
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use atrium_core::query::ListQuery;
    ///
    /// let q = ListQuery::from_raw(None, Some(" acme "), Some("-5"), Some("abc"));
    /// assert_eq!(q.search.as_deref(), Some("acme"));
    /// assert_eq!(q.limit, 50);
    /// assert_eq!(q.offset, 0);
    /// ```
    pub fn from_raw(
        status: Option<&str>,
        search: Option<&str>,
        limit: Option<&str>,
        offset: Option<&str>,
    ) -> Self {
        let limit = match parse_int(limit) {
            Some(n) if n >= 0 => (n as u64).min(MAX_PAGE_LIMIT as u64) as usize,
            _ => DEFAULT_PAGE_LIMIT,
        };
        let offset = match parse_int(offset) {
            Some(n) if n >= 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => 0,
        };

        ListQuery {
            status: non_blank(status.map(str::to_string)),
            search: non_blank(search.map(str::to_string)),
            limit,
            offset,
        }
    }

    /// Returns true if `customer` passes the status and search filters.
    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(status) = &self.status {
            if &customer.status != status {
                return false;
            }
        }

        match &self.search {
            Some(term) => matches_search(customer, &term.to_lowercase()),
            None => true,
        }
    }

    /// Runs the query over a snapshot.
    pub fn run(&self, customers: &[Customer]) -> Page<Customer> {
        let limit = self.limit.min(MAX_PAGE_LIMIT);
        let matches: Vec<&Customer> = customers.iter().filter(|c| self.matches(c)).collect();
        let total = matches.len();

        let items = matches
            .into_iter()
            .skip(self.offset)
            .take(limit)
            .cloned()
            .collect();

        Page {
            items,
            total,
            limit,
            offset: self.offset,
        }
    }
}

/// `needle` must already be lowercase.
fn matches_search(customer: &Customer, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&customer.name)
        || contains(&customer.email)
        || customer.company.as_deref().is_some_and(contains)
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Page
// =============================================================================

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matches before pagination.
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

// =============================================================================
// Unit Tests
// =============================================================================
