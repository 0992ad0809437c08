//! Command-line front end for the contact store.
//!
//! Owns everything the store deliberately does not: configuration, logging
//! setup, confirmation of destructive commands and rendering of results.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
