//! Order entity, order lines and repository trait.
//!
//! Maps to the `orders` and `order_items` tables. An order and its lines
//! are always written together in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::Product;
use crate::domain::value_objects::DateRange;
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

/// An order placed by a customer.
///
/// Maps to the `orders` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - customer_id: BIGINT NOT NULL REFERENCES customers(id) ON DELETE CASCADE
/// - order_date: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub order_date: DateTime<Utc>,
}

/// One line of an order.
///
/// Maps to the `order_items` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - order_id: BIGINT NOT NULL REFERENCES orders(id) ON DELETE CASCADE
/// - product_id: BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE
/// - quantity: INTEGER NOT NULL CHECK (quantity > 0)
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

/// An order line joined with its product.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub item: OrderItem,
    pub product: Product,
}

impl OrderLine {
    /// Quantity times the product's current price.
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.item.quantity)
    }
}

/// An order with all of its lines.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

impl OrderWithLines {
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(OrderLine::subtotal).sum()
    }
}

/// A row of the order list.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub item_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDraft {
    pub product_id: i64,
    pub quantity: i32,
}

/// A new order with at least one line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub customer_id: i64,
    pub items: Vec<LineDraft>,
}

/// Update: `items: Some(..)` replaces all existing lines.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpdate {
    pub customer_id: i64,
    pub items: Option<Vec<LineDraft>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub customer_id: Option<i64>,
    pub range: DateRange,
}

/// Repository trait for Order data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<OrderWithLines>, AppError>;

    /// Newest first.
    async fn list(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Page<OrderSummary>, AppError>;

    /// Inserts the order and its lines atomically, returning the new id.
    async fn create(&self, draft: &OrderDraft) -> Result<i64, AppError>;

    /// Fails with `NotFound` for an unknown id. Line replacement is atomic.
    async fn update(&self, id: i64, update: &OrderUpdate) -> Result<(), AppError>;

    /// Deletes the order and its lines.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
