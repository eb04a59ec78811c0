//! Customer Service
//!
//! CRUD for customers. Reads include lifetime spend and order count.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    CustomerDraft, CustomerPatch, CustomerRepository, CustomerSummary, DUPLICATE_CUSTOMER_EMAIL,
};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait CustomerService: Send + Sync {
    async fn list(&self, page: PageRequest) -> Result<Page<CustomerSummary>, CustomerError>;

    async fn get(&self, id: i64) -> Result<CustomerSummary, CustomerError>;

    async fn create(&self, draft: CustomerDraft) -> Result<CustomerSummary, CustomerError>;

    async fn update(&self, id: i64, patch: CustomerPatch) -> Result<CustomerSummary, CustomerError>;

    async fn delete(&self, id: i64) -> Result<(), CustomerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Customer not found")]
    NotFound,

    #[error("{}", DUPLICATE_CUSTOMER_EMAIL)]
    EmailTaken,

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound => AppError::NotFound("Customer not found".into()),
            CustomerError::EmailTaken => AppError::Conflict(DUPLICATE_CUSTOMER_EMAIL.into()),
            CustomerError::Storage(e) => e,
        }
    }
}

fn classify(err: AppError) -> CustomerError {
    match err {
        AppError::NotFound(_) => CustomerError::NotFound,
        AppError::Conflict(_) => CustomerError::EmailTaken,
        other => other.into(),
    }
}

pub struct CustomerServiceImpl<R: CustomerRepository> {
    repo: Arc<R>,
}

impl<R: CustomerRepository> CustomerServiceImpl<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: CustomerRepository + 'static> CustomerService for CustomerServiceImpl<R> {
    async fn list(&self, page: PageRequest) -> Result<Page<CustomerSummary>, CustomerError> {
        Ok(self.repo.list(page).await?)
    }

    async fn get(&self, id: i64) -> Result<CustomerSummary, CustomerError> {
        self.repo.find_by_id(id).await?.ok_or(CustomerError::NotFound)
    }

    async fn create(&self, draft: CustomerDraft) -> Result<CustomerSummary, CustomerError> {
        let draft = draft.normalized();
        if self.repo.email_taken(&draft.email, None).await? {
            return Err(CustomerError::EmailTaken);
        }

        let customer = self.repo.create(&draft).await.map_err(classify)?;
        tracing::info!(customer_id = customer.customer.id, "Customer created");
        Ok(customer)
    }

    async fn update(&self, id: i64, patch: CustomerPatch) -> Result<CustomerSummary, CustomerError> {
        let existing = self.get(id).await?.customer;
        let draft = CustomerDraft::from_existing(&existing).apply(patch).normalized();

        if draft.email != existing.email && self.repo.email_taken(&draft.email, Some(id)).await? {
            return Err(CustomerError::EmailTaken);
        }

        self.repo.update(id, &draft).await.map_err(classify)
    }

    async fn delete(&self, id: i64) -> Result<(), CustomerError> {
        self.repo.delete(id).await.map_err(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, MockCustomerRepository};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn summary(id: i64, email: &str) -> CustomerSummary {
        CustomerSummary {
            customer: Customer {
                id,
                name: "Acme".into(),
                email: email.into(),
                joined_on: Utc::now(),
            },
            total_spent: Decimal::ZERO,
            order_count: 0,
        }
    }

    #[tokio::test]
    async fn email_change_to_taken_address_conflicts() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(summary(id, "old@example.com"))));
        repo.expect_email_taken()
            .withf(|email, except| email == "new@example.com" && *except == Some(4))
            .returning(|_, _| Ok(true));
        repo.expect_update().never();

        let service = CustomerServiceImpl::new(Arc::new(repo));
        let err = service
            .update(
                4,
                CustomerPatch {
                    email: Some("NEW@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::EmailTaken));
        assert!(matches!(
            AppError::from(err),
            AppError::Conflict(message) if message == DUPLICATE_CUSTOMER_EMAIL
        ));
    }

    #[tokio::test]
    async fn create_returns_zeroed_stats() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_email_taken().returning(|_, _| Ok(false));
        repo.expect_create()
            .returning(|d| Ok(summary(1, &d.email)));

        let service = CustomerServiceImpl::new(Arc::new(repo));
        let created = service
            .create(CustomerDraft {
                name: "Acme".into(),
                email: "buyer@example.com".into(),
            })
            .await
            .unwrap();

        assert_eq!(created.total_spent, Decimal::ZERO);
        assert_eq!(created.order_count, 0);
    }
}
