//! Customer entity and repository trait.
//!
//! Maps to the `customers` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

pub const DUPLICATE_CUSTOMER_EMAIL: &str = "customer with this email already exists.";

/// A buyer.
///
/// Maps to the `customers` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL
/// - email: VARCHAR(254) NOT NULL UNIQUE (stored lower-case)
/// - joined_on: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub joined_on: DateTime<Utc>,
}

/// A customer with lifetime order statistics at current product prices.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub customer: Customer,
    pub total_spent: Decimal,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CustomerDraft {
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_lowercase();
        self
    }

    pub fn from_existing(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
        }
    }

    pub fn apply(mut self, patch: CustomerPatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        self
    }
}

/// Repository trait for Customer data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<CustomerSummary>, AppError>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<CustomerSummary>, AppError>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, draft: &CustomerDraft) -> Result<CustomerSummary, AppError>;

    async fn update(&self, id: i64, draft: &CustomerDraft) -> Result<CustomerSummary, AppError>;

    /// Deletes the customer and, by cascade, their orders.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool, AppError>;
}
