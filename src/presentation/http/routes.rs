//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{auth_middleware, logging};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(logging::track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics::gather_metrics(),
    )
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(token_routes())
        .merge(recruiting_routes(state.clone()))
        .merge(sales_routes(state))
}

/// Token issuance and refresh (public)
fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/token/", post(handlers::auth::obtain_token))
        .route("/token/refresh/", post(handlers::auth::refresh_token))
}

/// Applicants, jobs and applications (protected)
fn recruiting_routes(state: AppState) -> Router<AppState> {
    use handlers::{applicants, applications, jobs};

    Router::new()
        .route(
            "/applicants/",
            get(applicants::list_applicants).post(applicants::create_applicant),
        )
        .route(
            "/applicants/{id}/",
            get(applicants::get_applicant)
                .put(applicants::replace_applicant)
                .patch(applicants::update_applicant)
                .delete(applicants::delete_applicant),
        )
        .route("/jobs/", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/jobs/{id}/",
            get(jobs::get_job)
                .put(jobs::replace_job)
                .patch(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route(
            "/applications/",
            get(applications::list_applications).post(applications::create_application),
        )
        .route(
            "/applications/{id}/",
            get(applications::get_application)
                .put(applications::replace_application)
                .patch(applications::update_application)
                .delete(applications::delete_application),
        )
        .route(
            "/applications/{id}/status/",
            patch(applications::update_application_status),
        )
        .route("/apply/", post(applications::apply))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Customers, products, orders and analytics (protected)
fn sales_routes(state: AppState) -> Router<AppState> {
    use handlers::{analytics, customers, orders, products};

    Router::new()
        .route(
            "/customers/",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/{id}/",
            get(customers::get_customer)
                .put(customers::replace_customer)
                .patch(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route(
            "/products/",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}/",
            get(products::get_product)
                .put(products::replace_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/orders/", get(orders::list_orders).post(orders::create_order))
        .route(
            "/orders/{id}/",
            get(orders::get_order)
                .put(orders::replace_order)
                .patch(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/analytics/sales-summary/", get(analytics::sales_summary))
        .route("/analytics/top-customers/", get(analytics::top_customers))
        .route("/analytics/top-products/", get(analytics::top_products))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
