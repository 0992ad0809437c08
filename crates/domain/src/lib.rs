//! Domain layer for the contact manager.
//!
//! This crate contains:
//! - Domain models (Client, Phone)
//! - Commands for creating, changing and searching clients, with validation

pub mod models;

pub use models::{Client, ClientFilter, ClientUpdate, ClientWithPhones, FieldUpdate, NewClient, Phone};
