//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Credentials, JWT access tokens, refresh rotation
//! - **ApplicantService** / **JobService**: Recruiting CRUD
//! - **ApplicationService**: Apply flow, duplicate checks, status updates
//! - **CustomerService** / **ProductService**: Sales CRUD
//! - **OrderService**: Orders with nested lines
//! - **AnalyticsService**: Sales summary and leaderboards

pub mod analytics_service;
pub mod applicant_service;
pub mod application_service;
pub mod auth_service;
pub mod customer_service;
pub mod job_service;
pub mod order_service;
pub mod product_service;

pub use analytics_service::{AnalyticsService, AnalyticsServiceImpl, TOP_LIMIT};
pub use applicant_service::{ApplicantError, ApplicantService, ApplicantServiceImpl};
pub use application_service::{ApplicationError, ApplicationService, ApplicationServiceImpl};
pub use auth_service::{
    decode_access_token, hash_password, issue_access_token, AuthError, AuthService,
    AuthServiceImpl, AuthTokens, Claims,
};
pub use customer_service::{CustomerError, CustomerService, CustomerServiceImpl};
pub use job_service::{JobError, JobService, JobServiceImpl};
pub use order_service::{OrderChanges, OrderDetails, OrderError, OrderService, OrderServiceImpl};
pub use product_service::{ProductError, ProductService, ProductServiceImpl};
