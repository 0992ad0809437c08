//! SQL DDL for the contact tables.
//!
//! Every statement is guarded with `IF NOT EXISTS` so bootstrapping an
//! already initialized database is a no-op.

use sqlx::PgPool;

/// Clients. `email` is optional but unique when present.
pub const CREATE_CLIENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS client (
    id SERIAL PRIMARY KEY,
    first_name VARCHAR(50) NOT NULL,
    last_name VARCHAR(50) NOT NULL,
    email VARCHAR(100) UNIQUE
)
"#;

/// Phones. Removing a client removes its phones.
pub const CREATE_PHONE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS phone (
    id SERIAL PRIMARY KEY,
    client_id INT NOT NULL REFERENCES client(id) ON DELETE CASCADE,
    phone_number VARCHAR(20) NOT NULL UNIQUE
)
"#;

pub const CREATE_PHONE_CLIENT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_phone_client_id ON phone (client_id)
"#;

/// Statements in the order they must run.
pub const SCHEMA_STATEMENTS: [&str; 3] = [
    CREATE_CLIENT_TABLE,
    CREATE_PHONE_TABLE,
    CREATE_PHONE_CLIENT_INDEX,
];

/// Creates the client and phone tables if absent, in one transaction.
pub async fn create_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await
}
