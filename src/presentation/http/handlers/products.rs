//! Product Handlers

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{PageQuery, ProductPatchRequest, ProductRequest};
use crate::application::dto::response::ProductResponse;
use crate::application::services::{ProductService, ProductServiceImpl};
use crate::infrastructure::repositories::PgProductRepository;
use crate::presentation::http::extractors::{ResourceId, ValidatedJson};
use crate::shared::error::AppError;
use crate::shared::pagination::Paginated;
use crate::startup::AppState;

fn product_service(state: &AppState) -> ProductServiceImpl<PgProductRepository> {
    ProductServiceImpl::new(Arc::new(PgProductRepository::new(state.db.clone())))
}

pub async fn list_products(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<ProductResponse>>, AppError> {
    let products = product_service(&state).list(query.page()?).await?;

    Ok(Json(Paginated::from_page(
        products.map(ProductResponse::from),
        &uri,
    )?))
}

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let product = product_service(&state).create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn get_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<ProductResponse>, AppError> {
    Ok(Json(product_service(&state).get(id).await?.into()))
}

pub async fn replace_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = product_service(&state).update(id, body.into()).await?;
    Ok(Json(product.into()))
}

pub async fn update_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<ProductPatchRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = product_service(&state).update(id, body.into()).await?;
    Ok(Json(product.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, AppError> {
    product_service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
