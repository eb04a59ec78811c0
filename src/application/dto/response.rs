//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::services::{AuthTokens, OrderDetails};
use crate::domain::{
    Applicant, ApplicationDetails, ApplicationStatus, CustomerSpend, CustomerSummary,
    DateRangeEcho, JobSummary, OrderLine, OrderSummary, Product, ProductSales, SalesSummary,
};

/// Money values are always rendered with two decimal places.
fn money(mut amount: Decimal) -> Decimal {
    amount.rescale(2);
    amount
}

/// Authentication tokens response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access: tokens.access_token,
            refresh: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicantResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub applied_on: DateTime<Utc>,
}

impl From<Applicant> for ApplicantResponse {
    fn from(applicant: Applicant) -> Self {
        Self {
            id: applicant.id,
            name: applicant.name,
            email: applicant.email,
            phone: applicant.phone,
            applied_on: applicant.applied_on,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub posted_on: DateTime<Utc>,
    pub application_count: i64,
}

impl From<JobSummary> for JobResponse {
    fn from(summary: JobSummary) -> Self {
        Self {
            id: summary.job.id,
            title: summary.job.title,
            description: summary.job.description,
            posted_on: summary.job.posted_on,
            application_count: summary.application_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub id: i64,
    pub applicant: i64,
    pub applicant_details: ApplicantResponse,
    pub job: i64,
    pub job_details: JobResponse,
    pub status: ApplicationStatus,
    pub applied_on: DateTime<Utc>,
}

impl From<ApplicationDetails> for ApplicationResponse {
    fn from(details: ApplicationDetails) -> Self {
        let application = details.application;
        Self {
            id: application.id,
            applicant: application.applicant_id,
            applicant_details: details.applicant.into(),
            job: application.job_id,
            job_details: details.job.into(),
            status: application.status,
            applied_on: application.applied_on,
        }
    }
}

/// Response of `POST /api/apply/`
#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub message: &'static str,
    pub application: ApplicationResponse,
}

impl From<ApplicationDetails> for ApplyResponse {
    fn from(details: ApplicationDetails) -> Self {
        Self {
            message: "Application submitted successfully",
            application: details.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub joined_on: DateTime<Utc>,
    pub total_spent: Decimal,
    pub order_count: i64,
}

impl From<CustomerSummary> for CustomerResponse {
    fn from(summary: CustomerSummary) -> Self {
        Self {
            id: summary.customer.id,
            name: summary.customer.name,
            email: summary.customer.email,
            joined_on: summary.customer.joined_on,
            total_spent: money(summary.total_spent),
            order_count: summary.order_count,
        }
    }
}

/// Price serializes as a decimal string such as `"19.99"`.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: money(product.price),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: i64,
    pub product: i64,
    pub product_details: ProductResponse,
    pub quantity: i32,
    pub subtotal: Decimal,
}

impl From<OrderLine> for OrderItemResponse {
    fn from(line: OrderLine) -> Self {
        let subtotal = money(line.subtotal());
        Self {
            id: line.item.id,
            product: line.item.product_id,
            product_details: line.product.into(),
            quantity: line.item.quantity,
            subtotal,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub customer: i64,
    pub customer_details: CustomerResponse,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
    pub total_price: Decimal,
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let total_price = money(details.order.total_price());
        let order = details.order.order;
        Self {
            id: order.id,
            customer: order.customer_id,
            customer_details: details.customer.into(),
            order_date: order.order_date,
            items: details.order.lines.into_iter().map(Into::into).collect(),
            total_price,
        }
    }
}

/// Row of the order list
#[derive(Debug, Serialize)]
pub struct OrderListItemResponse {
    pub id: i64,
    pub customer: i64,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub item_count: i64,
}

impl From<OrderSummary> for OrderListItemResponse {
    fn from(summary: OrderSummary) -> Self {
        Self {
            id: summary.id,
            customer: summary.customer_id,
            customer_name: summary.customer_name,
            order_date: summary.order_date,
            total_price: money(summary.total_price),
            item_count: summary.item_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Analytics: money fields are JSON numbers here.
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SalesSummaryResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    pub total_orders: i64,
    pub total_customers: i64,
    pub total_products_sold: i64,
    pub date_range: Option<DateRangeEcho>,
}

impl SalesSummaryResponse {
    pub fn new(summary: SalesSummary, date_range: Option<DateRangeEcho>) -> Self {
        Self {
            total_sales: summary.total_sales,
            total_orders: summary.total_orders,
            total_customers: summary.total_customers,
            total_products_sold: summary.total_products_sold,
            date_range,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerSpendResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

impl From<CustomerSpend> for CustomerSpendResponse {
    fn from(spend: CustomerSpend) -> Self {
        Self {
            id: spend.id,
            name: spend.name,
            email: spend.email,
            total_spent: spend.total_spent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopCustomersResponse {
    pub top_customers: Vec<CustomerSpendResponse>,
    pub date_range: Option<DateRangeEcho>,
}

#[derive(Debug, Serialize)]
pub struct ProductSalesResponse {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub total_quantity_sold: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

impl From<ProductSales> for ProductSalesResponse {
    fn from(sales: ProductSales) -> Self {
        Self {
            id: sales.id,
            name: sales.name,
            price: sales.price,
            total_quantity_sold: sales.total_quantity_sold,
            total_revenue: sales.total_revenue,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopProductsResponse {
    pub top_products: Vec<ProductSalesResponse>,
    pub date_range: Option<DateRangeEcho>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, Order, OrderItem, OrderWithLines};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn product(id: i64, price: &str) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price: dec(price),
        }
    }

    #[test]
    fn prices_render_as_two_place_strings() {
        let body = serde_json::to_value(ProductResponse::from(product(1, "5"))).unwrap();
        assert_eq!(body["price"], json!("5.00"));
    }

    #[test]
    fn analytics_money_renders_as_numbers() {
        let summary = SalesSummary {
            total_sales: dec("250.50"),
            total_orders: 3,
            total_customers: 2,
            total_products_sold: 7,
        };
        let body = serde_json::to_value(SalesSummaryResponse::new(summary, None)).unwrap();

        assert_eq!(body["total_sales"], json!(250.5));
        assert_eq!(body["date_range"], json!(null));
    }

    #[test]
    fn order_detail_carries_subtotals_and_total() {
        let now = Utc::now();
        let line = |id: i64, quantity: i32, product: Product| OrderLine {
            item: OrderItem {
                id,
                order_id: 9,
                product_id: product.id,
                quantity,
            },
            product,
        };
        let details = OrderDetails {
            order: OrderWithLines {
                order: Order {
                    id: 9,
                    customer_id: 4,
                    order_date: now,
                },
                lines: vec![line(1, 2, product(1, "10.00")), line(2, 1, product(2, "5.50"))],
            },
            customer: CustomerSummary {
                customer: Customer {
                    id: 4,
                    name: "Ann".into(),
                    email: "ann@example.com".into(),
                    joined_on: now,
                },
                total_spent: dec("25.50"),
                order_count: 1,
            },
        };

        let body = serde_json::to_value(OrderResponse::from(details)).unwrap();

        assert_eq!(body["total_price"], json!("25.50"));
        assert_eq!(body["items"][0]["subtotal"], json!("20.00"));
        assert_eq!(body["customer_details"]["order_count"], json!(1));
    }

    #[test]
    fn token_response_uses_short_field_names() {
        let body = serde_json::to_value(TokenResponse::from(AuthTokens {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_in: 3600,
            token_type: "Bearer".into(),
        }))
        .unwrap();

        assert_eq!(body["access"], json!("a"));
        assert_eq!(body["refresh"], json!("r"));
    }
}
