//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! This module provides concrete implementations of the repository traits
//! defined in the domain layer. Each repository handles data access for
//! a specific entity type.
//!
//! ## Available Repositories
//!
//! - **UserRepository** / **SessionRepository** - API accounts and refresh tokens
//! - **ApplicantRepository** - Applicants with name/email search
//! - **JobRepository** - Job postings with application counts
//! - **ApplicationRepository** - Applications with nested applicant and job
//! - **CustomerRepository** - Customers with spend statistics
//! - **ProductRepository** - Products
//! - **OrderRepository** - Orders and lines, written transactionally
//! - **AnalyticsRepository** - Sales aggregates and leaderboards
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgApplicantRepository, PgOrderRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let applicant_repo = PgApplicantRepository::new(pool.clone());
//!     let order_repo = PgOrderRepository::new(pool.clone());
//! }
//! ```

pub mod analytics_repository;
pub mod applicant_repository;
pub mod application_repository;
pub mod customer_repository;
pub mod job_repository;
pub mod order_repository;
pub mod product_repository;
pub mod session_repository;
pub mod user_repository;

pub use analytics_repository::PgAnalyticsRepository;
pub use applicant_repository::PgApplicantRepository;
pub use application_repository::PgApplicationRepository;
pub use customer_repository::PgCustomerRepository;
pub use job_repository::PgJobRepository;
pub use order_repository::PgOrderRepository;
pub use product_repository::PgProductRepository;
pub use session_repository::PgSessionRepository;
pub use user_repository::PgUserRepository;

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ann"), "%ann%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
