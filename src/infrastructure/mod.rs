//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database pool and migrations (PostgreSQL)
//! - Repository implementations (sqlx)
//! - Prometheus metrics

pub mod database;
pub mod metrics;
pub mod repositories;
