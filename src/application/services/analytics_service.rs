//! Analytics Service
//!
//! Sales summary and the top-customer / top-product leaderboards.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{AnalyticsRepository, CustomerSpend, DateRange, ProductSales, SalesSummary};
use crate::shared::error::AppError;

/// Leaderboard length.
pub const TOP_LIMIT: i64 = 5;

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn sales_summary(&self, range: &DateRange) -> Result<SalesSummary, AppError>;

    async fn top_customers(&self, range: &DateRange) -> Result<Vec<CustomerSpend>, AppError>;

    async fn top_products(&self, range: &DateRange) -> Result<Vec<ProductSales>, AppError>;
}

pub struct AnalyticsServiceImpl<R: AnalyticsRepository> {
    repo: Arc<R>,
}

impl<R: AnalyticsRepository> AnalyticsServiceImpl<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: AnalyticsRepository + 'static> AnalyticsService for AnalyticsServiceImpl<R> {
    async fn sales_summary(&self, range: &DateRange) -> Result<SalesSummary, AppError> {
        self.repo.sales_summary(range).await
    }

    async fn top_customers(&self, range: &DateRange) -> Result<Vec<CustomerSpend>, AppError> {
        let mut ranked = self.repo.top_customers(range, TOP_LIMIT).await?;
        ranked.truncate(TOP_LIMIT as usize);
        Ok(ranked)
    }

    async fn top_products(&self, range: &DateRange) -> Result<Vec<ProductSales>, AppError> {
        let mut ranked = self.repo.top_products(range, TOP_LIMIT).await?;
        ranked.truncate(TOP_LIMIT as usize);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockAnalyticsRepository;
    use mockall::predicate::{always, eq};
    use rust_decimal::Decimal;

    fn spend(id: i64, total: i64) -> CustomerSpend {
        CustomerSpend {
            id,
            name: format!("Customer {}", id),
            email: format!("c{}@example.com", id),
            total_spent: Decimal::from(total),
        }
    }

    #[tokio::test]
    async fn leaderboards_request_five_entries() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_top_customers()
            .with(always(), eq(TOP_LIMIT))
            .returning(|_, _| Ok(vec![spend(2, 150), spend(1, 100)]));

        let service = AnalyticsServiceImpl::new(Arc::new(repo));
        let ranked = service.top_customers(&DateRange::unbounded()).await.unwrap();

        let ids: Vec<i64> = ranked.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn range_is_passed_through() {
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        let expected = range.clone();

        let mut repo = MockAnalyticsRepository::new();
        repo.expect_sales_summary()
            .withf(move |r| *r == expected)
            .returning(|_| {
                Ok(SalesSummary {
                    total_sales: Decimal::ZERO,
                    total_orders: 0,
                    total_customers: 0,
                    total_products_sold: 0,
                })
            });

        let service = AnalyticsServiceImpl::new(Arc::new(repo));
        let summary = service.sales_summary(&range).await.unwrap();
        assert_eq!(summary.total_orders, 0);
    }

    #[tokio::test]
    async fn oversized_repository_result_is_truncated() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_top_customers()
            .returning(|_, _| Ok((1..=7).map(|id| spend(id, 10)).collect()));

        let service = AnalyticsServiceImpl::new(Arc::new(repo));
        let ranked = service.top_customers(&DateRange::unbounded()).await.unwrap();
        assert_eq!(ranked.len(), 5);
    }
}
