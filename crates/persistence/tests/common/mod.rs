//! Common test utilities for integration tests.
//!
//! These helpers connect to a real PostgreSQL database named by the
//! `TEST_DATABASE_URL` environment variable. When it is not set the tests
//! return early instead of failing.

#![allow(dead_code)]

use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use persistence::ContactStore;
use rand::Rng;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Connect to the test database and make sure the schema exists.
///
/// Returns `None` (and the calling test passes vacuously) when
/// `TEST_DATABASE_URL` is not set.
pub async fn test_store() -> Option<ContactStore> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL is not set, skipping database test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    let store = ContactStore::new(pool);
    store
        .initialize_schema()
        .await
        .expect("Failed to create contact tables");
    Some(store)
}

/// Remove every client and phone.
pub async fn cleanup_all_test_data(pool: &PgPool) {
    sqlx::query("TRUNCATE phone, client")
        .execute(pool)
        .await
        .expect("Failed to clean up test data");
}

pub async fn count_phones(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM phone")
        .fetch_one(pool)
        .await
        .expect("Failed to count phones")
}

pub async fn count_phone_number(pool: &PgPool, phone_number: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM phone WHERE phone_number = $1")
        .bind(phone_number)
        .fetch_one(pool)
        .await
        .expect("Failed to count phone number")
}

pub async fn max_client_id(pool: &PgPool) -> i32 {
    sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM client")
        .fetch_one(pool)
        .await
        .expect("Failed to read max client id")
}

pub fn first_name() -> String {
    FirstName().fake()
}

pub fn last_name() -> String {
    LastName().fake()
}

pub fn unique_email() -> String {
    format!("client{}@example.com", rand::random::<u32>())
}

pub fn unique_phone() -> String {
    format!("+7{}", rand::thread_rng().gen_range(100_000_000u64..1_000_000_000))
}

/// Number of columns of the client and phone tables.
pub async fn count_schema_columns(pool: &PgPool) -> i64 {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name IN ('client', 'phone')
        "#,
    )
    .fetch_one(pool)
    .await
    .expect("Failed to count schema columns")
}
