//! Customer Handlers

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{CustomerPatchRequest, CustomerRequest, PageQuery};
use crate::application::dto::response::CustomerResponse;
use crate::application::services::{CustomerService, CustomerServiceImpl};
use crate::infrastructure::repositories::PgCustomerRepository;
use crate::presentation::http::extractors::{ResourceId, ValidatedJson};
use crate::shared::error::AppError;
use crate::shared::pagination::Paginated;
use crate::startup::AppState;

fn customer_service(state: &AppState) -> CustomerServiceImpl<PgCustomerRepository> {
    CustomerServiceImpl::new(Arc::new(PgCustomerRepository::new(state.db.clone())))
}

pub async fn list_customers(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<CustomerResponse>>, AppError> {
    let customers = customer_service(&state).list(query.page()?).await?;

    Ok(Json(Paginated::from_page(
        customers.map(CustomerResponse::from),
        &uri,
    )?))
}

pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let customer = customer_service(&state).create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

pub async fn get_customer(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<CustomerResponse>, AppError> {
    Ok(Json(customer_service(&state).get(id).await?.into()))
}

pub async fn replace_customer(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<CustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = customer_service(&state).update(id, body.into()).await?;
    Ok(Json(customer.into()))
}

pub async fn update_customer(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<CustomerPatchRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = customer_service(&state).update(id, body.into()).await?;
    Ok(Json(customer.into()))
}

/// Deleting a customer removes its orders too.
pub async fn delete_customer(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, AppError> {
    customer_service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
