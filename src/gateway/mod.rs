//! Persistence port for contacts and its adapters.
//!
//! Handlers only see [`ContactGateway`]; the PostgreSQL adapter is wired in at
//! startup and tests substitute an in-memory one.

use async_trait::async_trait;

use crate::contact::{Contact, NewContact};
use crate::error::StorageError;

#[cfg(test)]
pub(crate) mod memory;
mod postgres;

pub use postgres::{connect_pool, PgContactGateway};

/// Rows returned when the caller gives no `limit`.
pub const DEFAULT_LIMIT: i64 = 10_000;
/// Hard cap applied to any requested `limit`.
pub const MAX_LIMIT: i64 = 10_000;

/// Equality filters, combined with AND. `None` means unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub external_id: Option<i32>,
    pub phone_number: Option<String>,
}

impl ContactFilter {
    pub fn matches(&self, contact: &Contact) -> bool {
        self.external_id.map_or(true, |id| contact.external_id == id)
            && self
                .phone_number
                .as_deref()
                .map_or(true, |phone| contact.phone_number == phone)
    }
}

/// Offset/limit window, always within `0..=MAX_LIMIT` rows and a
/// non-negative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(0, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Create and query operations against the backing store.
///
/// `insert` is not idempotent: every call yields a new record with its own id.
#[async_trait]
pub trait ContactGateway: Send + Sync {
    async fn insert(&self, contact: NewContact) -> Result<Contact, StorageError>;

    async fn query(&self, filter: &ContactFilter, page: Page) -> Result<Vec<Contact>, StorageError>;
}
