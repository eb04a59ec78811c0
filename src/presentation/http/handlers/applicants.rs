//! Applicant Handlers

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{ApplicantListQuery, ApplicantPatchRequest, ApplicantRequest};
use crate::application::dto::response::ApplicantResponse;
use crate::application::services::{ApplicantService, ApplicantServiceImpl};
use crate::infrastructure::repositories::PgApplicantRepository;
use crate::presentation::http::extractors::{ResourceId, ValidatedJson};
use crate::shared::error::AppError;
use crate::shared::pagination::Paginated;
use crate::startup::AppState;

fn applicant_service(state: &AppState) -> ApplicantServiceImpl<PgApplicantRepository> {
    ApplicantServiceImpl::new(Arc::new(PgApplicantRepository::new(state.db.clone())))
}

/// List applicants, optionally searching name and email
pub async fn list_applicants(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ApplicantListQuery>,
) -> Result<Json<Paginated<ApplicantResponse>>, AppError> {
    let (filter, page) = query.into_parts()?;
    let applicants = applicant_service(&state).list(filter, page).await?;

    Ok(Json(Paginated::from_page(
        applicants.map(ApplicantResponse::from),
        &uri,
    )?))
}

pub async fn create_applicant(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ApplicantRequest>,
) -> Result<(StatusCode, Json<ApplicantResponse>), AppError> {
    let applicant = applicant_service(&state).create(body.into()).await?;

    Ok((StatusCode::CREATED, Json(applicant.into())))
}

pub async fn get_applicant(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<ApplicantResponse>, AppError> {
    let applicant = applicant_service(&state).get(id).await?;
    Ok(Json(applicant.into()))
}

/// Full replace (`PUT`)
pub async fn replace_applicant(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<ApplicantRequest>,
) -> Result<Json<ApplicantResponse>, AppError> {
    let applicant = applicant_service(&state).update(id, body.into_patch()).await?;
    Ok(Json(applicant.into()))
}

/// Partial update (`PATCH`)
pub async fn update_applicant(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<ApplicantPatchRequest>,
) -> Result<Json<ApplicantResponse>, AppError> {
    let applicant = applicant_service(&state).update(id, body.into()).await?;
    Ok(Json(applicant.into()))
}

pub async fn delete_applicant(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, AppError> {
    applicant_service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
