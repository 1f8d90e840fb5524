//! Contact management HTTP service: create, list and filter contacts stored
//! in PostgreSQL.

pub mod config;
pub mod contact;
pub mod error;
pub mod gateway;
pub mod http;
pub mod validate;

pub use config::{AppConfig, ConfigError};
pub use contact::{Contact, NewContact};
pub use error::{ApiError, StorageError, ValidationError};
pub use gateway::{ContactFilter, ContactGateway, Page, PgContactGateway};
