//! # Value Objects
//!
//! Immutable value types with validation at construction.

mod application_status;
mod date_range;

pub use application_status::{ApplicationStatus, InvalidStatus};
pub use date_range::{DateRange, DateRangeEcho};
