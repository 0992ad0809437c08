//! Domain models for the contact manager.

pub mod client;
pub mod phone;

pub use client::{Client, ClientFilter, ClientUpdate, ClientWithPhones, FieldUpdate, NewClient};
pub use phone::Phone;
