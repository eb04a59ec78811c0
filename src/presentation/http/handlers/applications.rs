//! Application Handlers
//!
//! CRUD for job applications plus the apply and status shortcuts.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{
    ApplicationListQuery, ApplicationPatchRequest, ApplicationRequest, ApplyRequest,
    StatusUpdateRequest,
};
use crate::application::dto::response::{ApplicationResponse, ApplyResponse};
use crate::application::services::{ApplicationService, ApplicationServiceImpl};
use crate::infrastructure::repositories::{
    PgApplicantRepository, PgApplicationRepository, PgJobRepository,
};
use crate::presentation::http::extractors::{ResourceId, ValidatedJson};
use crate::shared::error::AppError;
use crate::shared::pagination::Paginated;
use crate::startup::AppState;

type Service =
    ApplicationServiceImpl<PgApplicantRepository, PgJobRepository, PgApplicationRepository>;

fn application_service(state: &AppState) -> Service {
    ApplicationServiceImpl::new(
        Arc::new(PgApplicantRepository::new(state.db.clone())),
        Arc::new(PgJobRepository::new(state.db.clone())),
        Arc::new(PgApplicationRepository::new(state.db.clone())),
    )
}

/// Apply an applicant to a job
pub async fn apply(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    let details = application_service(&state)
        .apply(body.applicant_id, body.job_id)
        .await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

/// List applications filtered by status, applicant or job
pub async fn list_applications(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<Paginated<ApplicationResponse>>, AppError> {
    let (filter, page) = query.into_parts()?;
    let applications = application_service(&state).list(filter, page).await?;

    Ok(Json(Paginated::from_page(
        applications.map(ApplicationResponse::from),
        &uri,
    )?))
}

pub async fn create_application(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationResponse>), AppError> {
    let draft = body.into_draft()?;
    let details = application_service(&state).create(draft).await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

pub async fn get_application(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<ApplicationResponse>, AppError> {
    Ok(Json(application_service(&state).get(id).await?.into()))
}

pub async fn replace_application(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<ApplicationRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let patch = body.into_patch()?;
    let details = application_service(&state).update(id, patch).await?;
    Ok(Json(details.into()))
}

pub async fn update_application(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<ApplicationPatchRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let patch = body.into_patch()?;
    let details = application_service(&state).update(id, patch).await?;
    Ok(Json(details.into()))
}

/// Change an application's status only
pub async fn update_application_status(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<StatusUpdateRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let status = body.status()?;
    let details = application_service(&state).update_status(id, status).await?;
    Ok(Json(details.into()))
}

pub async fn delete_application(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, AppError> {
    application_service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
