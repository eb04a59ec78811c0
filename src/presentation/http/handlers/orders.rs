//! Order Handlers

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{OrderListQuery, OrderPatchRequest, OrderRequest};
use crate::application::dto::response::{OrderListItemResponse, OrderResponse};
use crate::application::services::{OrderService, OrderServiceImpl};
use crate::infrastructure::repositories::{
    PgCustomerRepository, PgOrderRepository, PgProductRepository,
};
use crate::presentation::http::extractors::{ResourceId, ValidatedJson};
use crate::shared::error::AppError;
use crate::shared::pagination::Paginated;
use crate::startup::AppState;

type Service = OrderServiceImpl<PgOrderRepository, PgCustomerRepository, PgProductRepository>;

fn order_service(state: &AppState) -> Service {
    OrderServiceImpl::new(
        Arc::new(PgOrderRepository::new(state.db.clone())),
        Arc::new(PgCustomerRepository::new(state.db.clone())),
        Arc::new(PgProductRepository::new(state.db.clone())),
    )
}

/// List orders filtered by customer and date range
pub async fn list_orders(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Paginated<OrderListItemResponse>>, AppError> {
    let (filter, page) = query.into_parts()?;
    let orders = order_service(&state).list(filter, page).await?;

    Ok(Json(Paginated::from_page(
        orders.map(OrderListItemResponse::from),
        &uri,
    )?))
}

/// Create an order with its lines in one transaction
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<OrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let details = order_service(&state).create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

pub async fn get_order(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<OrderResponse>, AppError> {
    Ok(Json(order_service(&state).get(id).await?.into()))
}

/// Full replace: customer and the whole item list
pub async fn replace_order(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<OrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let details = order_service(&state).update(id, body.into()).await?;
    Ok(Json(details.into()))
}

/// Partial update; supplied `items` replace the existing lines
pub async fn update_order(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<OrderPatchRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let details = order_service(&state).update(id, body.into()).await?;
    Ok(Json(details.into()))
}

pub async fn delete_order(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, AppError> {
    order_service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
