//! Shared utilities for the contact manager.
//!
//! This crate provides common functionality used across the other crates:
//! - Field validation for names, e-mail addresses and phone numbers

pub mod validation;
