//! Order Repository Implementation
//!
//! PostgreSQL implementation of the OrderRepository trait. Orders and their
//! lines are written inside a single transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{
    LineDraft, Order, OrderDraft, OrderFilter, OrderItem, OrderLine, OrderRepository,
    OrderSummary, OrderUpdate, OrderWithLines, Product,
};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    order_date: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i32,
    product_name: String,
    product_price: Decimal,
}

impl LineRow {
    fn into_line(self) -> OrderLine {
        OrderLine {
            item: OrderItem {
                id: self.id,
                order_id: self.order_id,
                product_id: self.product_id,
                quantity: self.quantity,
            },
            product: Product {
                id: self.product_id,
                name: self.product_name,
                price: self.product_price,
            },
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    customer_id: i64,
    customer_name: String,
    order_date: DateTime<Utc>,
    total_price: Decimal,
    item_count: i64,
}

impl SummaryRow {
    fn into_summary(self) -> OrderSummary {
        OrderSummary {
            id: self.id,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            order_date: self.order_date,
            total_price: self.total_price,
            item_count: self.item_count,
        }
    }
}

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::bigint IS NULL OR o.customer_id = $1)
      AND ($2::timestamptz IS NULL OR o.order_date >= $2)
      AND ($3::timestamptz IS NULL OR o.order_date < $3)
"#;

/// Insert all lines of an order with one statement.
async fn insert_lines(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i64,
    items: &[LineDraft],
) -> Result<(), AppError> {
    let product_ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();

    sqlx::query(
        r#"
        INSERT INTO order_items (order_id, product_id, quantity)
        SELECT $1, product_id, quantity
        FROM UNNEST($2::bigint[], $3::int[]) AS t(product_id, quantity)
        "#,
    )
    .bind(order_id)
    .bind(&product_ids)
    .bind(&quantities)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// PostgreSQL order repository implementation.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<OrderWithLines>, AppError> {
        let Some(order) = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_id, order_date FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, LineRow>(
            r#"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity,
                   p.name AS product_name, p.price AS product_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(OrderWithLines {
            order: Order {
                id: order.id,
                customer_id: order.customer_id,
                order_date: order.order_date,
            },
            lines: lines.into_iter().map(LineRow::into_line).collect(),
        }))
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Page<OrderSummary>, AppError> {
        let count_sql = format!("SELECT COUNT(*) FROM orders o {}", FILTER_CLAUSE);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.customer_id)
            .bind(filter.range.from)
            .bind(filter.range.until)
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!(
            r#"
            SELECT o.id, o.customer_id, c.name AS customer_name, o.order_date,
                   COALESCE(SUM(oi.quantity * p.price), 0) AS total_price,
                   COUNT(oi.id) AS item_count
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            LEFT JOIN products p ON p.id = oi.product_id
            {}
            GROUP BY o.id, c.name
            ORDER BY o.order_date DESC, o.id DESC
            LIMIT $4 OFFSET $5
            "#,
            FILTER_CLAUSE
        );
        let rows = sqlx::query_as::<_, SummaryRow>(&list_sql)
            .bind(filter.customer_id)
            .bind(filter.range.from)
            .bind(filter.range.until)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(
            rows.into_iter().map(SummaryRow::into_summary).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, draft: &OrderDraft) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO orders (customer_id) VALUES ($1) RETURNING id",
        )
        .bind(draft.customer_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_lines(&mut tx, order_id, &draft.items).await?;

        tx.commit().await?;
        Ok(order_id)
    }

    async fn update(&self, id: i64, update: &OrderUpdate) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE orders SET customer_id = $2 WHERE id = $1")
            .bind(id)
            .bind(update.customer_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Order with id {} not found", id)));
        }

        if let Some(items) = &update.items {
            sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            insert_lines(&mut tx, id, items).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Order with id {} not found", id)));
        }

        Ok(())
    }
}
