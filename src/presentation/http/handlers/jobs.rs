//! Job Handlers

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{JobListQuery, JobPatchRequest, JobRequest};
use crate::application::dto::response::JobResponse;
use crate::application::services::{JobService, JobServiceImpl};
use crate::infrastructure::repositories::PgJobRepository;
use crate::presentation::http::extractors::{ResourceId, ValidatedJson};
use crate::shared::error::AppError;
use crate::shared::pagination::Paginated;
use crate::startup::AppState;

fn job_service(state: &AppState) -> JobServiceImpl<PgJobRepository> {
    JobServiceImpl::new(Arc::new(PgJobRepository::new(state.db.clone())))
}

/// List jobs, optionally filtered by title substring
pub async fn list_jobs(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Paginated<JobResponse>>, AppError> {
    let (filter, page) = query.into_parts()?;
    let jobs = job_service(&state).list(filter, page).await?;

    Ok(Json(Paginated::from_page(jobs.map(JobResponse::from), &uri)?))
}

pub async fn create_job(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<JobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let job = job_service(&state).create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(job.into())))
}

pub async fn get_job(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<JobResponse>, AppError> {
    Ok(Json(job_service(&state).get(id).await?.into()))
}

pub async fn replace_job(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<JobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let job = job_service(&state).update(id, body.into()).await?;
    Ok(Json(job.into()))
}

pub async fn update_job(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<JobPatchRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let job = job_service(&state).update(id, body.into()).await?;
    Ok(Json(job.into()))
}

pub async fn delete_job(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, AppError> {
    job_service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
