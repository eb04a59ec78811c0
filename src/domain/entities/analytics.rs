//! Sales analytics read models and repository trait.
//!
//! Revenue is always quantity times the product's current price.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::value_objects::DateRange;
use crate::shared::error::AppError;

/// Aggregate sales over a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub total_sales: Decimal,
    pub total_orders: i64,
    /// Distinct customers with at least one order in range.
    pub total_customers: i64,
    pub total_products_sold: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSpend {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub total_quantity_sold: i64,
    pub total_revenue: Decimal,
}

/// Rankings are ordered by the ranked amount descending, then id ascending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn sales_summary(&self, range: &DateRange) -> Result<SalesSummary, AppError>;

    /// Customers with at least one order in range, ranked by spend.
    async fn top_customers(
        &self,
        range: &DateRange,
        limit: i64,
    ) -> Result<Vec<CustomerSpend>, AppError>;

    /// Products sold in range, ranked by quantity.
    async fn top_products(
        &self,
        range: &DateRange,
        limit: i64,
    ) -> Result<Vec<ProductSales>, AppError>;
}
