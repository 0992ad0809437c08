//! Persistence layer for the contact manager.
//!
//! This crate contains:
//! - Database connection management
//! - Schema bootstrap for the client and phone tables
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The `ContactStore`, which runs every operation in its own transaction

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod repositories;
pub mod schema;
pub mod store;

pub use db::DatabaseConfig;
pub use error::StoreError;
pub use store::ContactStore;
