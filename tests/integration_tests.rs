//! Integration Tests Entry Point
//!
//! Tests are organized by module:
//! - `api/` - HTTP tests against the real router; no database required
//! - `repositories/` - PostgreSQL tests, run with `cargo test -- --ignored`
//! - `common/` - Shared test utilities

mod api;
mod common;
mod repositories;

pub use common::*;
