//! # Domain Layer
//!
//! The domain layer contains the core business types of the recruiting and
//! sales APIs. It is independent of any external frameworks or
//! infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (Applicant, Job, Order, etc.) and repository traits
//! - **value_objects**: Immutable value types (ApplicationStatus, DateRange)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
