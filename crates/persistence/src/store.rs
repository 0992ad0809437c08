//! Contact store: schema bootstrap plus transactional CRUD over clients and
//! their phones.
//!
//! Every mutating operation is its own transaction. On failure the
//! transaction is rolled back explicitly and the classified error is returned
//! to the caller; nothing is printed and nothing is swallowed.

use std::collections::HashMap;

use domain::models::{ClientFilter, ClientUpdate, ClientWithPhones, FieldUpdate, NewClient, Phone};
use shared::validation::validate_phone_number;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, error, info, warn};
use validator::{Validate, ValidationErrors};

use crate::db::{create_pool, DatabaseConfig};
use crate::error::StoreError;
use crate::metrics::record_pool_metrics;
use crate::repositories::{ClientRepository, PhoneRepository};
use crate::schema;

/// Owns the connection pool and exposes every client/phone operation.
///
/// Cloning is cheap and clones share the pool, so closing one clone closes
/// them all.
#[derive(Clone)]
pub struct ContactStore {
    pool: PgPool,
    clients: ClientRepository,
    phones: PhoneRepository,
}

impl ContactStore {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            clients: ClientRepository::new(pool.clone()),
            phones: PhoneRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connects to the configured database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = create_pool(config).await?;
        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connected to database"
        );
        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.pool.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        self.ensure_open()?;
        let tx = self.pool.begin().await?;
        record_pool_metrics(&self.pool);
        Ok(tx)
    }

    /// Creates the client and phone tables if they do not exist yet.
    ///
    /// Safe to call on an initialized database. Failures (for example a role
    /// without CREATE privilege) are returned, not ignored.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        self.ensure_open()?;
        if let Err(e) = schema::create_schema(&self.pool).await {
            error!(error = %e, "Failed to create contact tables");
            return Err(e.into());
        }
        info!("Contact tables are ready");
        Ok(())
    }

    /// Creates a client and all of its phones atomically.
    ///
    /// A duplicate e-mail or phone number rolls back the whole insert and
    /// yields `StoreError::Conflict`.
    pub async fn add_client(&self, new_client: &NewClient) -> Result<ClientWithPhones, StoreError> {
        new_client.validate()?;
        let mut tx = self.begin().await?;
        let result = insert_client_with_phones(&mut tx, new_client).await;
        let created = finish(tx, result, "add_client").await?;

        info!(
            client_id = created.client.id,
            phones = created.phones.len(),
            "Client {} {} added",
            created.client.first_name,
            created.client.last_name
        );
        Ok(created)
    }

    /// Adds a phone to an existing client.
    ///
    /// Returns `StoreError::NotFound` and inserts nothing when the client does
    /// not exist.
    pub async fn add_phone(&self, client_id: i32, phone: &str) -> Result<Phone, StoreError> {
        let phone = phone.trim();
        if let Err(e) = validate_phone_number(phone) {
            let mut errors = ValidationErrors::new();
            errors.add("phone", e);
            return Err(errors.into());
        }

        let mut tx = self.begin().await?;
        let result = insert_phone_for_existing_client(&mut tx, client_id, phone).await;
        let created = finish(tx, result, "add_phone").await?;

        info!(client_id, phone_id = created.id, "Phone added");
        Ok(created)
    }

    /// Applies a partial update to a client.
    ///
    /// Each provided field is written with its own UPDATE; a phone list
    /// replaces every existing phone. Everything happens in one transaction,
    /// and the returned client is read back inside it before the commit.
    /// An empty update is a plain read.
    pub async fn change_client(
        &self,
        client_id: i32,
        update: &ClientUpdate,
    ) -> Result<ClientWithPhones, StoreError> {
        update.validate()?;
        if update.is_empty() {
            debug!(client_id, "Empty client update");
            return self.get_client(client_id).await;
        }

        let mut tx = self.begin().await?;
        let result = apply_client_update(&mut tx, client_id, update).await;
        let updated = finish(tx, result, "change_client").await?;

        info!(client_id, "Client updated");
        Ok(updated)
    }

    /// Deletes one phone of a client, or every phone when `phone` is `None`.
    ///
    /// Unconditional: callers that want a confirmation step must ask before
    /// calling. Returns the number of deleted rows; a phone that belongs to
    /// another client is simply not deleted.
    pub async fn delete_phone(&self, client_id: i32, phone: Option<&str>) -> Result<u64, StoreError> {
        let mut tx = self.begin().await?;
        let result = match phone {
            Some(number) => PhoneRepository::delete(&mut tx, client_id, number.trim()).await,
            None => PhoneRepository::delete_all_by_client_id(&mut tx, client_id).await,
        }
        .map_err(StoreError::from);
        let deleted = finish(tx, result, "delete_phone").await?;

        info!(client_id, deleted, "Phones deleted");
        Ok(deleted)
    }

    /// Loads a client with its phones.
    pub async fn get_client(&self, client_id: i32) -> Result<ClientWithPhones, StoreError> {
        self.ensure_open()?;
        let client = self
            .clients
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| StoreError::client_not_found(client_id))?;
        let phones = self.list_phones(client_id).await?;
        Ok(client.with_phones(phones))
    }

    /// Lists a client's phones ordered by ID; empty for unknown clients.
    pub async fn list_phones(&self, client_id: i32) -> Result<Vec<Phone>, StoreError> {
        self.ensure_open()?;
        let phones = self.phones.find_by_client_id(client_id).await?;
        Ok(phones.into_iter().map(Into::into).collect())
    }

    /// Finds clients matching every field of the filter, each with its phones.
    pub async fn find_clients(
        &self,
        filter: &ClientFilter,
    ) -> Result<Vec<ClientWithPhones>, StoreError> {
        self.ensure_open()?;
        let clients = self.clients.find(filter).await?;
        let ids: Vec<i32> = clients.iter().map(|c| c.id).collect();

        let mut phones_by_client: HashMap<i32, Vec<Phone>> = HashMap::new();
        for phone in self.phones.find_by_client_ids(&ids).await? {
            phones_by_client
                .entry(phone.client_id)
                .or_default()
                .push(phone.into());
        }

        debug!(matches = clients.len(), "Client search finished");
        Ok(clients
            .into_iter()
            .map(|c| {
                let phones = phones_by_client.remove(&c.id).unwrap_or_default();
                c.with_phones(phones)
            })
            .collect())
    }

    /// Closes the pool. Every later call on this store (or its clones)
    /// returns `StoreError::Closed`.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        record_pool_metrics(&self.pool);
        self.pool.close().await;
        info!("Database connection closed");
    }
}

/// Commits on success, rolls back explicitly on failure.
async fn finish<T>(
    tx: Transaction<'static, Postgres>,
    result: Result<T, StoreError>,
    operation: &'static str,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(operation, error = %rollback_err, "Rollback failed");
            }
            warn!(operation, error = %err, "Transaction rolled back");
            Err(err)
        }
    }
}

async fn insert_client_with_phones(
    conn: &mut PgConnection,
    new_client: &NewClient,
) -> Result<ClientWithPhones, StoreError> {
    let client = ClientRepository::insert(&mut *conn, new_client).await?;
    let phones = PhoneRepository::insert_all(&mut *conn, client.id, &new_client.phones).await?;
    Ok(client.with_phones(phones.into_iter().map(Into::into).collect()))
}

async fn insert_phone_for_existing_client(
    conn: &mut PgConnection,
    client_id: i32,
    phone: &str,
) -> Result<Phone, StoreError> {
    if !ClientRepository::exists(&mut *conn, client_id).await? {
        return Err(StoreError::client_not_found(client_id));
    }
    let phone = PhoneRepository::insert(&mut *conn, client_id, phone).await?;
    Ok(phone.into())
}

async fn apply_client_update(
    conn: &mut PgConnection,
    client_id: i32,
    update: &ClientUpdate,
) -> Result<ClientWithPhones, StoreError> {
    if ClientRepository::lock(&mut *conn, client_id).await?.is_none() {
        return Err(StoreError::client_not_found(client_id));
    }

    if let Some(first_name) = &update.first_name {
        ClientRepository::set_first_name(&mut *conn, client_id, first_name).await?;
    }
    if let Some(last_name) = &update.last_name {
        ClientRepository::set_last_name(&mut *conn, client_id, last_name).await?;
    }
    match &update.email {
        FieldUpdate::Keep => {}
        FieldUpdate::Set(email) => {
            ClientRepository::set_email(&mut *conn, client_id, Some(email.as_str())).await?;
        }
        FieldUpdate::Clear => {
            ClientRepository::set_email(&mut *conn, client_id, None).await?;
        }
    }
    if let Some(phones) = &update.phones {
        let removed = PhoneRepository::delete_all_by_client_id(&mut *conn, client_id).await?;
        PhoneRepository::insert_all(&mut *conn, client_id, phones).await?;
        debug!(client_id, removed, added = phones.len(), "Phones replaced");
    }

    let client = ClientRepository::fetch(&mut *conn, client_id).await?;
    let phones = PhoneRepository::list_by_client_id(&mut *conn, client_id).await?;
    Ok(client.with_phones(phones.into_iter().map(Into::into).collect()))
}
