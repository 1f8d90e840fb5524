use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{ContactFilter, ContactGateway, Page};
use crate::contact::{Contact, NewContact};
use crate::error::StorageError;

/// Vec-backed gateway that keeps insertion order.
#[derive(Debug, Default)]
pub(crate) struct InMemoryContacts {
    rows: Mutex<Vec<Contact>>,
}

#[async_trait]
impl ContactGateway for InMemoryContacts {
    async fn insert(&self, contact: NewContact) -> Result<Contact, StorageError> {
        let contact = contact.into_contact(Utc::now());
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| StorageError::unavailable("in-memory store poisoned"))?;
        rows.push(contact.clone());
        Ok(contact)
    }

    async fn query(&self, filter: &ContactFilter, page: Page) -> Result<Vec<Contact>, StorageError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| StorageError::unavailable("in-memory store poisoned"))?;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(rows
            .iter()
            .filter(|contact| filter.matches(contact))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }
}

/// Gateway whose every call fails as an unreachable database would.
#[derive(Debug, Default)]
pub(crate) struct UnavailableContacts;

#[async_trait]
impl ContactGateway for UnavailableContacts {
    async fn insert(&self, _contact: NewContact) -> Result<Contact, StorageError> {
        Err(StorageError::unavailable("connection refused"))
    }

    async fn query(&self, _filter: &ContactFilter, _page: Page) -> Result<Vec<Contact>, StorageError> {
        Err(StorageError::unavailable("connection refused"))
    }
}
