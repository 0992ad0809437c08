//! Client repository for database operations.
//!
//! Reads go through the pool. Writes take a `PgConnection` so the store can
//! run several of them inside one transaction.

use domain::models::{ClientFilter, NewClient};
use sqlx::{PgConnection, PgPool};

use crate::entities::ClientEntity;
use crate::metrics::QueryTimer;

/// Repository for client-related database operations.
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    /// Creates a new ClientRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a client by ID.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_client_by_id");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            SELECT id, first_name, last_name, email
            FROM client
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find clients matching every provided filter field, ordered by ID.
    /// An empty filter returns all clients.
    pub async fn find(&self, filter: &ClientFilter) -> Result<Vec<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_clients");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            SELECT c.id, c.first_name, c.last_name, c.email
            FROM client c
            WHERE ($1::VARCHAR IS NULL OR c.first_name = $1)
              AND ($2::VARCHAR IS NULL OR c.last_name = $2)
              AND ($3::VARCHAR IS NULL OR c.email = $3)
              AND ($4::VARCHAR IS NULL OR EXISTS (
                  SELECT 1 FROM phone p
                  WHERE p.client_id = c.id AND p.phone_number = $4
              ))
            ORDER BY c.id
            "#,
        )
        .bind(filter.first_name.as_deref())
        .bind(filter.last_name.as_deref())
        .bind(filter.email.as_deref())
        .bind(filter.phone.as_deref())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a client row and return it with its generated ID.
    pub async fn insert(
        conn: &mut PgConnection,
        client: &NewClient,
    ) -> Result<ClientEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_client");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            INSERT INTO client (first_name, last_name, email)
            VALUES ($1, $2, $3)
            RETURNING id, first_name, last_name, email
            "#,
        )
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(client.email.as_deref())
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }

    /// Check whether a client exists.
    pub async fn exists(conn: &mut PgConnection, id: i32) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("client_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM client WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }

    /// Read a client row through the given connection, so a transaction sees
    /// its own uncommitted writes.
    pub async fn fetch(conn: &mut PgConnection, id: i32) -> Result<ClientEntity, sqlx::Error> {
        let timer = QueryTimer::new("fetch_client");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            SELECT id, first_name, last_name, email
            FROM client
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }

    /// Lock a client row for the rest of the transaction.
    /// Returns `None` when the client does not exist.
    pub async fn lock(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_client");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            SELECT id, first_name, last_name, email
            FROM client
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await;
        timer.record();
        result
    }

    pub async fn set_first_name(
        conn: &mut PgConnection,
        id: i32,
        first_name: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_client_first_name");
        let result = sqlx::query(
            r#"
            UPDATE client SET first_name = $2 WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(first_name)
        .execute(conn)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    pub async fn set_last_name(
        conn: &mut PgConnection,
        id: i32,
        last_name: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_client_last_name");
        let result = sqlx::query(
            r#"
            UPDATE client SET last_name = $2 WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(last_name)
        .execute(conn)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Set or clear (`None`) the e-mail address.
    pub async fn set_email(
        conn: &mut PgConnection,
        id: i32,
        email: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_client_email");
        let result = sqlx::query(
            r#"
            UPDATE client SET email = $2 WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(email)
        .execute(conn)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

