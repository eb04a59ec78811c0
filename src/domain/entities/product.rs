//! Product entity and repository trait.
//!
//! Maps to the `products` table.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

/// A sellable product.
///
/// Maps to the `products` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL
/// - price: NUMERIC(10, 2) NOT NULL CHECK (price > 0)
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl ProductDraft {
    pub fn from_existing(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
        }
    }

    pub fn apply(mut self, patch: ProductPatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self
    }
}

/// Repository trait for Product data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError>;

    /// Products among `ids` that exist; unknown ids are simply absent.
    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Product>, AppError>;

    /// Ordered by name.
    async fn list(&self, page: PageRequest) -> Result<Page<Product>, AppError>;

    async fn create(&self, draft: &ProductDraft) -> Result<Product, AppError>;

    async fn update(&self, id: i64, draft: &ProductDraft) -> Result<Product, AppError>;

    /// Deletes the product and, by cascade, order lines referencing it.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
