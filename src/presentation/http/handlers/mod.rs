//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod analytics;
pub mod applicants;
pub mod applications;
pub mod auth;
pub mod customers;
pub mod health;
pub mod jobs;
pub mod orders;
pub mod products;
