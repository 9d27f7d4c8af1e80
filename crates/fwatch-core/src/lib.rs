//! Core logic for the forum notification watcher.
//!
//! This crate is framework-agnostic. The HTTP client and the SMTP mailer live
//! behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod fetch;
pub mod logging;
pub mod ports;
pub mod retry;
pub mod scrape;
pub mod state;
pub mod watcher;

pub use errors::{Error, Result};
