use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::{ContactFilter, ContactGateway, Page};
use crate::config::DatabaseConfig;
use crate::contact::{Contact, NewContact};
use crate::error::StorageError;

const CONTACT_COLUMNS: &str = "id, external_id, phone_number, date_created, date_updated";

/// Build the bounded connection pool described by `config`.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;
    info!(
        max_connections = config.pool_size,
        acquire_timeout_secs = config.acquire_timeout_secs,
        "database pool ready"
    );
    Ok(pool)
}

/// [`ContactGateway`] backed by the `contacts` table.
#[derive(Debug, Clone)]
pub struct PgContactGateway {
    pool: PgPool,
}

impl PgContactGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| StorageError::query(format!("migration failed: {err}")))
    }
}

#[async_trait]
impl ContactGateway for PgContactGateway {
    async fn insert(&self, contact: NewContact) -> Result<Contact, StorageError> {
        let sql = format!(
            "INSERT INTO contacts (id, external_id, phone_number) VALUES ($1, $2, $3) \
             RETURNING {CONTACT_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Contact>(&sql)
            .bind(Uuid::new_v4())
            .bind(contact.external_id())
            .bind(contact.phone_number())
            .fetch_one(&self.pool)
            .await?;
        debug!(id = %inserted.id, external_id = inserted.external_id, "contact inserted");
        Ok(inserted)
    }

    async fn query(&self, filter: &ContactFilter, page: Page) -> Result<Vec<Contact>, StorageError> {
        let mut builder = select_contacts(filter, page);
        let contacts = builder
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;
        debug!(rows = contacts.len(), "contacts queried");
        Ok(contacts)
    }
}

fn select_contacts<'a>(filter: &'a ContactFilter, page: Page) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE TRUE"));
    if let Some(external_id) = filter.external_id {
        builder.push(" AND external_id = ").push_bind(external_id);
    }
    if let Some(phone_number) = filter.phone_number.as_deref() {
        builder.push(" AND phone_number = ").push_bind(phone_number);
    }
    builder
        .push(" ORDER BY seq LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    builder
}
