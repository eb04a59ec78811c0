//! # Recruit Sales API
//!
//! This crate provides two JSON REST APIs sharing one server:
//! - Job-application tracking: applicants, jobs and applications
//! - Sales analytics: customers, products, orders and aggregate reports
//!
//! Both are protected by JWT access tokens with rotating refresh tokens.
//!
//! ## Architecture
//!
//! - **Domain Layer**: Entities, value objects and repository traits
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: PostgreSQL repositories and Prometheus metrics
//! - **Presentation Layer**: HTTP routes, handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! recruit_sales_api/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities, value objects, and traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Database and metrics implementations
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Errors, pagination, validation helpers
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
