//! Customer Repository Implementation
//!
//! PostgreSQL implementation of the CustomerRepository trait. Spend totals
//! are computed from order lines at current product prices.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{
    Customer, CustomerDraft, CustomerRepository, CustomerSummary, DUPLICATE_CUSTOMER_EMAIL,
};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

const STATS_COLUMNS: &str = r#"
    COALESCE((
        SELECT SUM(oi.quantity * p.price)
        FROM orders o
        JOIN order_items oi ON oi.order_id = o.id
        JOIN products p ON p.id = oi.product_id
        WHERE o.customer_id = c.id
    ), 0) AS total_spent,
    (SELECT COUNT(*) FROM orders o WHERE o.customer_id = c.id) AS order_count
"#;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    email: String,
    joined_on: DateTime<Utc>,
    total_spent: Decimal,
    order_count: i64,
}

impl CustomerRow {
    fn into_summary(self) -> CustomerSummary {
        CustomerSummary {
            customer: Customer {
                id: self.id,
                name: self.name,
                email: self.email,
                joined_on: self.joined_on,
            },
            total_spent: self.total_spent,
            order_count: self.order_count,
        }
    }
}

/// PostgreSQL customer repository implementation.
#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<CustomerSummary>, AppError> {
        let sql = format!(
            "SELECT c.id, c.name, c.email, c.joined_on, {} FROM customers c WHERE c.id = $1",
            STATS_COLUMNS
        );
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CustomerRow::into_summary))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<CustomerSummary>, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            r#"
            SELECT c.id, c.name, c.email, c.joined_on, {}
            FROM customers c
            ORDER BY c.joined_on DESC, c.id DESC
            LIMIT $1 OFFSET $2
            "#,
            STATS_COLUMNS
        );
        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(
            rows.into_iter().map(CustomerRow::into_summary).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, draft: &CustomerDraft) -> Result<CustomerSummary, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, joined_on,
                      0::numeric AS total_spent, 0::bigint AS order_count
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_CUSTOMER_EMAIL))?;

        Ok(row.into_summary())
    }

    async fn update(&self, id: i64, draft: &CustomerDraft) -> Result<CustomerSummary, AppError> {
        let sql = format!(
            r#"
            WITH c AS (
                UPDATE customers SET name = $2, email = $3
                WHERE id = $1
                RETURNING id, name, email, joined_on
            )
            SELECT c.id, c.name, c.email, c.joined_on, {} FROM c
            "#,
            STATS_COLUMNS
        );
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_CUSTOMER_EMAIL))?
            .ok_or_else(|| AppError::NotFound(format!("Customer with id {} not found", id)))?;

        Ok(row.into_summary())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Customer with id {} not found", id)));
        }

        Ok(())
    }

    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM customers
                WHERE email = $1 AND ($2::bigint IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }
}
