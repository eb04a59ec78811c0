//! Analytics Handlers
//!
//! Read-only aggregates over orders, optionally restricted by `from`/`to`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::request::DateRangeQuery;
use crate::application::dto::response::{
    SalesSummaryResponse, TopCustomersResponse, TopProductsResponse,
};
use crate::application::services::{AnalyticsService, AnalyticsServiceImpl};
use crate::infrastructure::repositories::PgAnalyticsRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn analytics_service(state: &AppState) -> AnalyticsServiceImpl<PgAnalyticsRepository> {
    AnalyticsServiceImpl::new(Arc::new(PgAnalyticsRepository::new(state.db.clone())))
}

pub async fn sales_summary(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<SalesSummaryResponse>, AppError> {
    let range = query.range()?;
    let summary = analytics_service(&state).sales_summary(&range).await?;

    Ok(Json(SalesSummaryResponse::new(summary, range.echo())))
}

pub async fn top_customers(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<TopCustomersResponse>, AppError> {
    let range = query.range()?;
    let customers = analytics_service(&state).top_customers(&range).await?;

    Ok(Json(TopCustomersResponse {
        top_customers: customers.into_iter().map(Into::into).collect(),
        date_range: range.echo(),
    }))
}

pub async fn top_products(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<TopProductsResponse>, AppError> {
    let range = query.range()?;
    let products = analytics_service(&state).top_products(&range).await?;

    Ok(Json(TopProductsResponse {
        top_products: products.into_iter().map(Into::into).collect(),
        date_range: range.echo(),
    }))
}
