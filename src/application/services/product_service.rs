//! Product Service

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Product, ProductDraft, ProductPatch, ProductRepository};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};
use crate::shared::validation::check_price;

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list(&self, page: PageRequest) -> Result<Page<Product>, ProductError>;

    async fn get(&self, id: i64) -> Result<Product, ProductError>;

    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductError>;

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product, ProductError>;

    async fn delete(&self, id: i64) -> Result<(), ProductError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound,

    #[error("{0}")]
    InvalidPrice(String),

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound => AppError::NotFound("Product not found".into()),
            ProductError::InvalidPrice(message) => AppError::field("price", message),
            ProductError::Storage(e) => e,
        }
    }
}

fn not_found_as_product(err: AppError) -> ProductError {
    match err {
        AppError::NotFound(_) => ProductError::NotFound,
        other => other.into(),
    }
}

pub struct ProductServiceImpl<R: ProductRepository> {
    repo: Arc<R>,
}

impl<R: ProductRepository> ProductServiceImpl<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: ProductRepository + 'static> ProductService for ProductServiceImpl<R> {
    async fn list(&self, page: PageRequest) -> Result<Page<Product>, ProductError> {
        Ok(self.repo.list(page).await?)
    }

    async fn get(&self, id: i64) -> Result<Product, ProductError> {
        self.repo.find_by_id(id).await?.ok_or(ProductError::NotFound)
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductError> {
        check_price(&draft.price).map_err(ProductError::InvalidPrice)?;
        Ok(self.repo.create(&draft).await?)
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> Result<Product, ProductError> {
        let existing = self.get(id).await?;
        let draft = ProductDraft::from_existing(&existing).apply(patch);
        check_price(&draft.price).map_err(ProductError::InvalidPrice)?;

        self.repo.update(id, &draft).await.map_err(not_found_as_product)
    }

    async fn delete(&self, id: i64) -> Result<(), ProductError> {
        self.repo.delete(id).await.map_err(not_found_as_product)
    }
}
