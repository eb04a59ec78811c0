//! Order Service
//!
//! Orders with nested lines. Every referenced customer and product is
//! checked before anything is written; the write itself is one transaction.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    CustomerRepository, CustomerSummary, LineDraft, OrderDraft, OrderFilter, OrderRepository,
    OrderSummary, OrderUpdate, OrderWithLines, ProductRepository,
};
use crate::infrastructure::metrics;
use crate::shared::error::{AppError, FieldError};
use crate::shared::pagination::{Page, PageRequest};

/// An order with its lines and the customer who placed it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order: OrderWithLines,
    pub customer: CustomerSummary,
}

/// Changes for an existing order; absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub customer_id: Option<i64>,
    pub items: Option<Vec<LineDraft>>,
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn list(&self, filter: OrderFilter, page: PageRequest)
        -> Result<Page<OrderSummary>, OrderError>;

    async fn get(&self, id: i64) -> Result<OrderDetails, OrderError>;

    async fn create(&self, draft: OrderDraft) -> Result<OrderDetails, OrderError>;

    /// `items`, when given, replace every existing line.
    async fn update(&self, id: i64, changes: OrderChanges) -> Result<OrderDetails, OrderError>;

    async fn delete(&self, id: i64) -> Result<(), OrderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found")]
    NotFound,

    #[error("Invalid order")]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound => AppError::NotFound("Order not found".into()),
            OrderError::Invalid(errors) => AppError::Validation(errors),
            OrderError::Storage(e) => e,
        }
    }
}

fn not_found_as_order(err: AppError) -> OrderError {
    match err {
        AppError::NotFound(_) => OrderError::NotFound,
        other => other.into(),
    }
}

fn missing_pk(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

pub struct OrderServiceImpl<O, C, P>
where
    O: OrderRepository,
    C: CustomerRepository,
    P: ProductRepository,
{
    order_repo: Arc<O>,
    customer_repo: Arc<C>,
    product_repo: Arc<P>,
}

impl<O, C, P> OrderServiceImpl<O, C, P>
where
    O: OrderRepository,
    C: CustomerRepository,
    P: ProductRepository,
{
    pub fn new(order_repo: Arc<O>, customer_repo: Arc<C>, product_repo: Arc<P>) -> Self {
        Self {
            order_repo,
            customer_repo,
            product_repo,
        }
    }

    async fn check_customer(&self, customer_id: i64, errors: &mut Vec<FieldError>) -> Result<(), OrderError> {
        if self.customer_repo.find_by_id(customer_id).await?.is_none() {
            errors.push(FieldError::new("customer", missing_pk(customer_id)));
        }
        Ok(())
    }

    /// Line rules: at least one line, quantity >= 1, every product exists.
    async fn check_items(&self, items: &[LineDraft], errors: &mut Vec<FieldError>) -> Result<(), OrderError> {
        if items.is_empty() {
            errors.push(FieldError::new("items", "An order must contain at least one item."));
            return Ok(());
        }

        let ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
        let known: HashSet<i64> = self
            .product_repo
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        for (index, item) in items.iter().enumerate() {
            if !known.contains(&item.product_id) {
                errors.push(FieldError::new(
                    format!("items[{}].product", index),
                    missing_pk(item.product_id),
                ));
            }
            if item.quantity < 1 {
                errors.push(FieldError::new(
                    format!("items[{}].quantity", index),
                    "Quantity must be at least 1.",
                ));
            }
        }
        Ok(())
    }

    async fn load(&self, id: i64) -> Result<OrderDetails, OrderError> {
        let order = self
            .order_repo
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;

        let customer = self
            .customer_repo
            .find_by_id(order.order.customer_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Order {} references a missing customer", id))
            })?;

        Ok(OrderDetails { order, customer })
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<(), OrderError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(OrderError::Invalid(errors))
    }
}

#[async_trait]
impl<O, C, P> OrderService for OrderServiceImpl<O, C, P>
where
    O: OrderRepository + 'static,
    C: CustomerRepository + 'static,
    P: ProductRepository + 'static,
{
    async fn list(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Page<OrderSummary>, OrderError> {
        Ok(self.order_repo.list(&filter, page).await?)
    }

    async fn get(&self, id: i64) -> Result<OrderDetails, OrderError> {
        self.load(id).await
    }

    async fn create(&self, draft: OrderDraft) -> Result<OrderDetails, OrderError> {
        let mut errors = Vec::new();
        self.check_customer(draft.customer_id, &mut errors).await?;
        self.check_items(&draft.items, &mut errors).await?;
        into_result(errors)?;

        let id = self.order_repo.create(&draft).await?;

        metrics::record_order_created();
        tracing::info!(
            order_id = id,
            customer_id = draft.customer_id,
            lines = draft.items.len(),
            "Order created"
        );

        self.load(id).await
    }

    async fn update(&self, id: i64, changes: OrderChanges) -> Result<OrderDetails, OrderError> {
        let existing = self
            .order_repo
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;

        let mut errors = Vec::new();
        let customer_id = changes.customer_id.unwrap_or(existing.order.customer_id);
        if changes.customer_id.is_some() {
            self.check_customer(customer_id, &mut errors).await?;
        }
        if let Some(items) = &changes.items {
            self.check_items(items, &mut errors).await?;
        }
        into_result(errors)?;

        let update = OrderUpdate {
            customer_id,
            items: changes.items,
        };
        self.order_repo
            .update(id, &update)
            .await
            .map_err(not_found_as_order)?;

        self.load(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), OrderError> {
        self.order_repo.delete(id).await.map_err(not_found_as_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Customer, MockCustomerRepository, MockOrderRepository, MockProductRepository, Order,
        OrderItem, OrderLine, Product,
    };
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn customer(id: i64) -> CustomerSummary {
        CustomerSummary {
            customer: Customer {
                id,
                name: "Acme".into(),
                email: "acme@example.com".into(),
                joined_on: Utc::now(),
            },
            total_spent: Decimal::ZERO,
            order_count: 0,
        }
    }

    fn product(id: i64, price: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price: Decimal::from(price),
        }
    }

    fn stored_order(id: i64, customer_id: i64, lines: &[(i64, i64, i32)]) -> OrderWithLines {
        OrderWithLines {
            order: Order {
                id,
                customer_id,
                order_date: Utc::now(),
            },
            lines: lines
                .iter()
                .enumerate()
                .map(|(n, &(product_id, price, quantity))| OrderLine {
                    item: OrderItem {
                        id: n as i64 + 1,
                        order_id: id,
                        product_id,
                        quantity,
                    },
                    product: product(product_id, price),
                })
                .collect(),
        }
    }

    fn known_customers() -> MockCustomerRepository {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_find_by_id()
            .returning(|id| Ok(Some(customer(id))));
        customers
    }

    #[tokio::test]
    async fn create_returns_total_from_current_prices() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_many()
            .returning(|ids| Ok(ids.iter().map(|&id| product(id, 10)).collect()));

        let mut orders = MockOrderRepository::new();
        orders
            .expect_create()
            .withf(|d| d.items.len() == 2)
            .times(1)
            .returning(|_| Ok(50));
        orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_order(id, 1, &[(1, 10, 2), (2, 10, 3)]))));

        let service = OrderServiceImpl::new(Arc::new(orders), Arc::new(known_customers()), Arc::new(products));
        let created = service
            .create(OrderDraft {
                customer_id: 1,
                items: vec![
                    LineDraft { product_id: 1, quantity: 2 },
                    LineDraft { product_id: 2, quantity: 3 },
                ],
            })
            .await
            .unwrap();

        assert_eq!(created.order.order.id, 50);
        assert_eq!(created.order.total_price(), Decimal::from(50));
        assert_eq!(created.customer.customer.id, 1);
    }

    #[tokio::test]
    async fn invalid_lines_are_reported_by_index_and_nothing_is_written() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_many()
            .returning(|_| Ok(vec![product(1, 10)]));

        let mut orders = MockOrderRepository::new();
        orders.expect_create().never();

        let service = OrderServiceImpl::new(Arc::new(orders), Arc::new(known_customers()), Arc::new(products));
        let err = service
            .create(OrderDraft {
                customer_id: 1,
                items: vec![
                    LineDraft { product_id: 1, quantity: 0 },
                    LineDraft { product_id: 99, quantity: 1 },
                ],
            })
            .await
            .unwrap_err();

        let OrderError::Invalid(errors) = err else {
            panic!("expected validation failure, got {:?}", err);
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["items[0].quantity", "items[1].product"]);
    }

    #[tokio::test]
    async fn order_without_items_is_rejected() {
        let mut orders = MockOrderRepository::new();
        orders.expect_create().never();

        let service = OrderServiceImpl::new(
            Arc::new(orders),
            Arc::new(known_customers()),
            Arc::new(MockProductRepository::new()),
        );
        let err = service
            .create(OrderDraft {
                customer_id: 1,
                items: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::Invalid(ref e) if e[0].field == "items"));
    }

    #[tokio::test]
    async fn unknown_customer_is_a_field_error() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_find_by_id().returning(|_| Ok(None));
        let mut products = MockProductRepository::new();
        products
            .expect_find_many()
            .returning(|ids| Ok(ids.iter().map(|&id| product(id, 1)).collect()));

        let service = OrderServiceImpl::new(
            Arc::new(MockOrderRepository::new()),
            Arc::new(customers),
            Arc::new(products),
        );
        let err = service
            .create(OrderDraft {
                customer_id: 404,
                items: vec![LineDraft { product_id: 1, quantity: 1 }],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::Invalid(ref e) if e[0].field == "customer"));
    }

    #[tokio::test]
    async fn update_without_items_keeps_lines() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_order(id, 1, &[(1, 5, 1)]))));
        orders
            .expect_update()
            .withf(|id, u| *id == 7 && u.customer_id == 2 && u.items.is_none())
            .times(1)
            .returning(|_, _| Ok(()));

        let service = OrderServiceImpl::new(
            Arc::new(orders),
            Arc::new(known_customers()),
            Arc::new(MockProductRepository::new()),
        );
        service
            .update(
                7,
                OrderChanges {
                    customer_id: Some(2),
                    items: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_unknown_order_is_not_found() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().returning(|_| Ok(None));

        let service = OrderServiceImpl::new(
            Arc::new(orders),
            Arc::new(MockCustomerRepository::new()),
            Arc::new(MockProductRepository::new()),
        );
        let err = service.update(1, OrderChanges::default()).await.unwrap_err();
        assert!(matches!(err, OrderError::NotFound));
    }
}
