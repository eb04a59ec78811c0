//! # Domain Entities
//!
//! Core domain entities. All entities map directly to their database tables.
//!
//! ## Recruiting
//!
//! - **Applicant**: A person applying for jobs
//! - **Job**: An opening that applicants apply to
//! - **Application**: One applicant's application for one job
//!
//! ## Sales
//!
//! - **Customer**: A buyer with derived spend statistics
//! - **Product**: A priced product
//! - **Order**: A customer's order with one or more lines
//! - **Analytics**: Read-only aggregates over orders
//!
//! ## Accounts
//!
//! - **User**: API account used to obtain tokens
//! - **Session**: Refresh-token session
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod analytics;
mod applicant;
mod application;
mod customer;
mod job;
mod order;
mod product;
mod session;
mod user;

pub use user::{User, UserRepository};
pub use session::{Session, SessionRepository};

pub use applicant::{
    Applicant, ApplicantDraft, ApplicantFilter, ApplicantPatch, ApplicantRepository,
    DUPLICATE_APPLICANT_EMAIL,
};
pub use job::{Job, JobDraft, JobFilter, JobPatch, JobRepository, JobSummary};
pub use application::{
    Application, ApplicationDetails, ApplicationDraft, ApplicationFilter, ApplicationPatch,
    ApplicationRepository, DUPLICATE_APPLICATION,
};

pub use customer::{
    Customer, CustomerDraft, CustomerPatch, CustomerRepository, CustomerSummary,
    DUPLICATE_CUSTOMER_EMAIL,
};
pub use product::{Product, ProductDraft, ProductPatch, ProductRepository};
pub use order::{
    LineDraft, Order, OrderDraft, OrderFilter, OrderItem, OrderLine, OrderRepository,
    OrderSummary, OrderUpdate, OrderWithLines,
};
pub use analytics::{AnalyticsRepository, CustomerSpend, ProductSales, SalesSummary};

#[cfg(test)]
pub use analytics::MockAnalyticsRepository;
#[cfg(test)]
pub use applicant::MockApplicantRepository;
#[cfg(test)]
pub use application::MockApplicationRepository;
#[cfg(test)]
pub use customer::MockCustomerRepository;
#[cfg(test)]
pub use job::MockJobRepository;
#[cfg(test)]
pub use order::MockOrderRepository;
#[cfg(test)]
pub use product::MockProductRepository;
#[cfg(test)]
pub use session::MockSessionRepository;
#[cfg(test)]
pub use user::MockUserRepository;
