//! # folio-test
//!
//! Integration tests for folio.
//!
//! This crate contains:
//! - A small SQLite book catalog with the standard schema
//! - Test utilities (logging setup)
//!
//! The tests themselves live under `tests/`.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// SQLite catalog fixtures
pub mod fixtures;

/// Test utilities and helpers
pub mod utils;
