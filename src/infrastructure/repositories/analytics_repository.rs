//! Analytics Repository Implementation
//!
//! Aggregate queries over orders. All three queries share the same
//! half-open `[from, until)` window on `orders.order_date`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{AnalyticsRepository, CustomerSpend, DateRange, ProductSales, SalesSummary};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_sales: Decimal,
    total_orders: i64,
    total_customers: i64,
    total_products_sold: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerSpendRow {
    id: i64,
    name: String,
    email: String,
    total_spent: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductSalesRow {
    id: i64,
    name: String,
    price: Decimal,
    total_quantity_sold: i64,
    total_revenue: Decimal,
}

/// PostgreSQL analytics repository implementation.
#[derive(Clone)]
pub struct PgAnalyticsRepository {
    pool: PgPool,
}

impl PgAnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn sales_summary(&self, range: &DateRange) -> Result<SalesSummary, AppError> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT COALESCE(SUM(oi.quantity * p.price), 0) AS total_sales,
                   COUNT(DISTINCT o.id) AS total_orders,
                   COUNT(DISTINCT o.customer_id) AS total_customers,
                   COALESCE(SUM(oi.quantity), 0)::bigint AS total_products_sold
            FROM orders o
            LEFT JOIN order_items oi ON oi.order_id = o.id
            LEFT JOIN products p ON p.id = oi.product_id
            WHERE ($1::timestamptz IS NULL OR o.order_date >= $1)
              AND ($2::timestamptz IS NULL OR o.order_date < $2)
            "#,
        )
        .bind(range.from)
        .bind(range.until)
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesSummary {
            total_sales: row.total_sales,
            total_orders: row.total_orders,
            total_customers: row.total_customers,
            total_products_sold: row.total_products_sold,
        })
    }

    async fn top_customers(
        &self,
        range: &DateRange,
        limit: i64,
    ) -> Result<Vec<CustomerSpend>, AppError> {
        let rows = sqlx::query_as::<_, CustomerSpendRow>(
            r#"
            SELECT c.id, c.name, c.email,
                   COALESCE(SUM(oi.quantity * p.price), 0) AS total_spent
            FROM customers c
            JOIN orders o ON o.customer_id = c.id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            LEFT JOIN products p ON p.id = oi.product_id
            WHERE ($1::timestamptz IS NULL OR o.order_date >= $1)
              AND ($2::timestamptz IS NULL OR o.order_date < $2)
            GROUP BY c.id
            ORDER BY total_spent DESC, c.id ASC
            LIMIT $3
            "#,
        )
        .bind(range.from)
        .bind(range.until)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CustomerSpend {
                id: r.id,
                name: r.name,
                email: r.email,
                total_spent: r.total_spent,
            })
            .collect())
    }

    async fn top_products(
        &self,
        range: &DateRange,
        limit: i64,
    ) -> Result<Vec<ProductSales>, AppError> {
        let rows = sqlx::query_as::<_, ProductSalesRow>(
            r#"
            SELECT p.id, p.name, p.price,
                   SUM(oi.quantity)::bigint AS total_quantity_sold,
                   SUM(oi.quantity * p.price) AS total_revenue
            FROM products p
            JOIN order_items oi ON oi.product_id = p.id
            JOIN orders o ON o.id = oi.order_id
            WHERE ($1::timestamptz IS NULL OR o.order_date >= $1)
              AND ($2::timestamptz IS NULL OR o.order_date < $2)
            GROUP BY p.id
            ORDER BY total_quantity_sold DESC, p.id ASC
            LIMIT $3
            "#,
        )
        .bind(range.from)
        .bind(range.until)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ProductSales {
                id: r.id,
                name: r.name,
                price: r.price,
                total_quantity_sold: r.total_quantity_sold,
                total_revenue: r.total_revenue,
            })
            .collect())
    }
}
