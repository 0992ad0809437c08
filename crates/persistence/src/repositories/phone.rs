//! Phone repository for database operations.

use sqlx::{PgConnection, PgPool};

use crate::entities::PhoneEntity;
use crate::metrics::QueryTimer;

/// Repository for phone-related database operations.
#[derive(Clone)]
pub struct PhoneRepository {
    pool: PgPool,
}

impl PhoneRepository {
    /// Creates a new PhoneRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find all phones of a client, ordered by ID.
    pub async fn find_by_client_id(
        &self,
        client_id: i32,
    ) -> Result<Vec<PhoneEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_phones_by_client");
        let result = sqlx::query_as::<_, PhoneEntity>(
            r#"
            SELECT id, client_id, phone_number
            FROM phone
            WHERE client_id = $1
            ORDER BY id
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Same as `find_by_client_id`, on the caller's connection.
    pub async fn list_by_client_id(
        conn: &mut PgConnection,
        client_id: i32,
    ) -> Result<Vec<PhoneEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_phones_by_client");
        let result = sqlx::query_as::<_, PhoneEntity>(
            r#"
            SELECT id, client_id, phone_number
            FROM phone
            WHERE client_id = $1
            ORDER BY id
            "#,
        )
        .bind(client_id)
        .fetch_all(conn)
        .await;
        timer.record();
        result
    }

    /// Find all phones of several clients at once, ordered by ID.
    pub async fn find_by_client_ids(
        &self,
        client_ids: &[i32],
    ) -> Result<Vec<PhoneEntity>, sqlx::Error> {
        if client_ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("find_phones_by_clients");
        let result = sqlx::query_as::<_, PhoneEntity>(
            r#"
            SELECT id, client_id, phone_number
            FROM phone
            WHERE client_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(client_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a phone for a client.
    pub async fn insert(
        conn: &mut PgConnection,
        client_id: i32,
        phone_number: &str,
    ) -> Result<PhoneEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_phone");
        let result = sqlx::query_as::<_, PhoneEntity>(
            r#"
            INSERT INTO phone (client_id, phone_number)
            VALUES ($1, $2)
            RETURNING id, client_id, phone_number
            "#,
        )
        .bind(client_id)
        .bind(phone_number)
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }

    /// Insert several phones for a client, in order.
    pub async fn insert_all(
        conn: &mut PgConnection,
        client_id: i32,
        phone_numbers: &[String],
    ) -> Result<Vec<PhoneEntity>, sqlx::Error> {
        let mut phones = Vec::with_capacity(phone_numbers.len());
        for number in phone_numbers {
            phones.push(Self::insert(&mut *conn, client_id, number).await?);
        }
        Ok(phones)
    }

    /// Delete one phone of a client.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(
        conn: &mut PgConnection,
        client_id: i32,
        phone_number: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_phone");
        let result = sqlx::query(
            r#"
            DELETE FROM phone WHERE client_id = $1 AND phone_number = $2
            "#,
        )
        .bind(client_id)
        .bind(phone_number)
        .execute(conn)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete all phones of a client.
    /// Returns the number of rows deleted.
    pub async fn delete_all_by_client_id(
        conn: &mut PgConnection,
        client_id: i32,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_all_phones_by_client");
        let result = sqlx::query(
            r#"
            DELETE FROM phone WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .execute(conn)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
