//! The contact record and the validated input used to create one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{ValidationCode, ValidationError};

pub const EXTERNAL_ID: &str = "external_id";
pub const PHONE_NUMBER: &str = "phone_number";

/// A stored contact, as returned by the gateway and serialised to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub external_id: i32,
    pub phone_number: String,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// Input for [`crate::gateway::ContactGateway::insert`].
///
/// Only constructible through [`NewContact::new`], so a value of this type
/// always carries a present phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    external_id: i32,
    phone_number: String,
}

impl NewContact {
    pub fn new(external_id: i32, phone_number: impl Into<String>) -> Result<Self, ValidationError> {
        let phone_number = phone_number.into();
        if phone_number.trim().is_empty() {
            return Err(ValidationError::new(
                PHONE_NUMBER,
                ValidationCode::MissingField,
                "phone_number must not be empty",
            ));
        }
        Ok(Self {
            external_id,
            phone_number,
        })
    }

    pub fn external_id(&self) -> i32 {
        self.external_id
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Materialise the record with a fresh id, stamping both dates with `now`.
    pub fn into_contact(self, now: DateTime<Utc>) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            external_id: self.external_id,
            phone_number: self.phone_number,
            date_created: now,
            date_updated: now,
        }
    }
}
